use cafe_db::{params, ConnectOptions, Database, DbError, DbRuntimeSettings, MEMORY_DATABASE};
use tempfile::TempDir;

fn options_in(dir: &TempDir) -> ConnectOptions {
    ConnectOptions::new("cafe", 5432, "postgres").with_data_dir(dir.path())
}

#[test]
fn connect_creates_database_file_and_persists_rows() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let options = options_in(&dir);

    let db = Database::connect(&options, DbRuntimeSettings::default())
        .expect("failed to connect");
    assert!(dir.path().join("cafe.db").exists(), "database file should exist");

    let created = db.apply_schema().expect("failed to apply schema");
    assert_eq!(created, 3);
    db.execute_update(
        "INSERT INTO Menu (itemName, type, price, description, imageURL) VALUES (?1, ?2, ?3, ?4, ?5)",
        params!["Scone", "Bakery", 2.25, "Blueberry", "scone.png"],
    )
    .expect("failed to insert item");
    db.cleanup();

    let reopened = Database::connect(&options, DbRuntimeSettings::default())
        .expect("failed to reconnect");
    assert_eq!(reopened.apply_schema().expect("failed to re-apply schema"), 0);

    let rows = reopened
        .execute_query_and_return_result("SELECT itemName, type FROM Menu", [])
        .expect("failed to query menu");
    assert_eq!(rows, vec![vec!["Scone".to_string(), "Bakery".to_string()]]);
}

#[test]
fn connect_fails_when_directory_is_missing() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let options = ConnectOptions::new("cafe", 5432, "postgres")
        .with_data_dir(dir.path().join("does-not-exist"));

    let err = Database::connect(&options, DbRuntimeSettings::default())
        .expect_err("connect should fail");
    match err {
        DbError::Connect { target, .. } => assert!(target.ends_with("cafe.db")),
        other => panic!("unexpected error type: {other:?}"),
    }
}

#[test]
fn connect_fails_on_a_file_that_is_not_a_database() {
    let dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cafe.db"), vec![b'x'; 4096])
        .expect("failed to write junk file");

    let err = Database::connect(&options_in(&dir), DbRuntimeSettings::default())
        .expect_err("connect should fail");
    assert!(matches!(err, DbError::Connect { .. }), "unexpected error: {err:?}");
    assert!(err.to_string().starts_with("unable to connect to database at"));
}

#[test]
fn memory_database_name_skips_the_filesystem() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let options = ConnectOptions::new(MEMORY_DATABASE, 5432, "postgres").with_data_dir(dir.path());
    assert_eq!(options.database_path(), None);

    let db = Database::connect(&options, DbRuntimeSettings::default())
        .expect("failed to connect");
    assert_eq!(db.target(), MEMORY_DATABASE);
    assert_eq!(
        std::fs::read_dir(dir.path()).expect("read dir").count(),
        0,
        "no files should be created"
    );
}

#[test]
fn connection_url_uses_fixed_host_and_given_port() {
    let options = ConnectOptions::new("cafe_db", 6543, "manager");
    assert_eq!(options.url(), "sqlite://localhost:6543/cafe_db");
    assert_eq!(
        options.database_path(),
        Some(std::path::PathBuf::from("./cafe_db.db"))
    );
}
