//! Positional command-line arguments.

use std::path::Path;

use cafe_db::ConnectOptions;
use thiserror::Error;

/// Printed when the command line cannot be parsed.
pub const USAGE: &str = "Usage: cafe <dbname> <port> <user>";

/// The three positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub dbname: String,
    pub port: u16,
    pub user: String,
}

/// Errors produced when the command line is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("expected 3 arguments, got {0}")]
    ArgumentCount(usize),
    #[error("invalid port: {0:?}")]
    InvalidPort(String),
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let [dbname, port, user] = <[String; 3]>::try_from(args)
            .map_err(|rest| UsageError::ArgumentCount(rest.len()))?;

        let port = port
            .trim()
            .parse()
            .map_err(|_| UsageError::InvalidPort(port.clone()))?;

        Ok(Self { dbname, port, user })
    }

    /// Connection options rooted at `data_dir`.
    pub fn connect_options(&self, data_dir: &Path) -> ConnectOptions {
        ConnectOptions::new(self.dbname.clone(), self.port, self.user.clone())
            .with_data_dir(data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_three_positional_arguments() {
        let parsed = CliArgs::parse(args(&["cafe_db", "5432", "alice"])).unwrap();
        assert_eq!(
            parsed,
            CliArgs {
                dbname: "cafe_db".to_string(),
                port: 5432,
                user: "alice".to_string(),
            }
        );
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert_eq!(
            CliArgs::parse(args(&["cafe_db", "5432"])),
            Err(UsageError::ArgumentCount(2))
        );
        assert_eq!(
            CliArgs::parse(args(&["a", "1", "b", "extra"])),
            Err(UsageError::ArgumentCount(4))
        );
        assert_eq!(CliArgs::parse(Vec::new()), Err(UsageError::ArgumentCount(0)));
    }

    #[test]
    fn rejects_unparsable_port() {
        assert_eq!(
            CliArgs::parse(args(&["cafe_db", "http", "alice"])),
            Err(UsageError::InvalidPort("http".to_string()))
        );
        assert_eq!(
            CliArgs::parse(args(&["cafe_db", "70000", "alice"])),
            Err(UsageError::InvalidPort("70000".to_string()))
        );
    }

    #[test]
    fn connect_options_resolve_under_data_dir() {
        let parsed = CliArgs::parse(args(&["cafe_db", "5432", "alice"])).unwrap();
        let options = parsed.connect_options(Path::new("/var/lib/cafe"));
        assert_eq!(options.url(), "sqlite://localhost:5432/cafe_db");
        assert_eq!(
            options.database_path(),
            Some(Path::new("/var/lib/cafe/cafe_db.db").to_path_buf())
        );
        assert_eq!(options.user, "alice");
    }
}
