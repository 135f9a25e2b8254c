//! Embedded schema bootstrap.
//!
//! The console expects `USERS`, `Menu` and `Orders` to exist. The DDL is
//! compiled into the binary and applied with `CREATE ... IF NOT EXISTS`
//! inside one transaction, so running it against a populated database is a
//! no-op. There is no version tracking: the schema is a single snapshot.

use rusqlite::Connection;

use crate::error::DbError;

const SCHEMA_SQL: &str = include_str!("schema/cafe.sql");

/// Tables created by [`SCHEMA_SQL`], in creation order.
pub(crate) const SCHEMA_TABLES: &[&str] = &["USERS", "Menu", "Orders"];

/// Applies the embedded schema and returns how many of its tables were
/// missing beforehand.
pub(crate) fn apply(conn: &Connection) -> Result<usize, DbError> {
    let mut missing = 0;
    for table in SCHEMA_TABLES {
        if !table_exists(conn, table).map_err(DbError::Schema)? {
            missing += 1;
        }
    }

    if missing == 0 {
        tracing::debug!("schema already present, skipping bootstrap");
        return Ok(0);
    }

    let tx = conn.unchecked_transaction().map_err(DbError::Schema)?;
    tx.execute_batch(SCHEMA_SQL).map_err(DbError::Schema)?;
    tx.commit().map_err(DbError::Schema)?;

    tracing::info!(created = missing, "applied cafe schema");
    Ok(missing)
}

/// SQLite compares table names case-insensitively, so `users` finds `USERS`.
pub(crate) fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE)",
        [name],
        |row| row.get(0),
    )
}
