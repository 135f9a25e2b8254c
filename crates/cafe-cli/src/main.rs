//! Cafe console client binary.
//!
//! Connects to the database named on the command line, creates any missing
//! tables, and runs the interactive menus on stdin/stdout until the user
//! exits. Logs go to stderr.

use std::io;
use std::process::ExitCode;

use cafe_cli::app::App;
use cafe_cli::args::{CliArgs, USAGE};
use cafe_cli::config::{self, LoggingConfig};
use cafe_db::Database;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

fn greeting() {
    println!(
        "\n\n*******************************************************\n\
         \x20             User Interface\n\
         *******************************************************\n"
    );
}

fn main() -> ExitCode {
    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let (config_path, config_source) = config::resolve_config_path();
    let (config, config_origin) = match config::load_config(Some(&config_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    tracing::info!(
        source = config_source,
        path = %config_path,
        origin = config_origin.as_str(),
        "resolved startup configuration"
    );

    greeting();

    let options = args.connect_options(&config.database.data_dir);
    println!("Connecting to database...");
    println!("Connection URL: {}\n", options.url());

    let db = match Database::connect(&options, config.database.runtime_settings()) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error - Unable to Connect to Database: {e}");
            eprintln!(
                "Make sure {} exists and is writable",
                config.database.data_dir.display()
            );
            return ExitCode::FAILURE;
        }
    };
    println!("Done");

    if config.database.bootstrap_schema {
        if let Err(e) = db.apply_schema() {
            eprintln!("{e}");
            db.cleanup();
            return ExitCode::FAILURE;
        }
    }

    let outcome = App::new(&db, io::stdin().lock(), io::stdout(), io::stderr())
        .with_default_user_type(config.accounts.default_user_type)
        .run();
    if let Err(e) = &outcome {
        tracing::error!(error = %e, "session ended with an error");
        eprintln!("{e}");
    }

    println!("Disconnecting from database...");
    db.cleanup();
    println!("Done\n\nBye !");

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
