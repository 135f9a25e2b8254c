//! Error type for the database access layer.

use thiserror::Error;

/// Errors returned by [`crate::Database`] operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The connection could not be opened or configured.
    #[error("unable to connect to database at {target}: {source}")]
    Connect {
        /// Where the connection was pointed (file path or `:memory:`).
        target: String,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },

    /// A statement failed to prepare or execute.
    #[error("database error: {0}")]
    Query(#[from] rusqlite::Error),

    /// The embedded schema could not be applied.
    #[error("failed to apply schema: {0}")]
    Schema(rusqlite::Error),

    /// Writing query output failed.
    #[error("failed to write query output: {0}")]
    Output(#[from] std::io::Error),
}
