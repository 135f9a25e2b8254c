//! The single-connection database handle and its execution primitives.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};

use crate::error::DbError;
use crate::render::render_value;
use crate::schema;

/// Host reported in connection URLs. The engine is embedded, so this never varies.
pub const DEFAULT_HOST: &str = "localhost";

/// Database name that selects a private in-memory database instead of a file.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Runtime tunables for the SQLite connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for the connection, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
        }
    }
}

/// Where and as whom to connect.
///
/// Mirrors the `<dbname> <port> <user>` command line. SQLite has no network
/// listener or login, so the database name picks a file under `data_dir`
/// while the port and user only label the session in the connection URL
/// and in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Database name; resolves to `<data_dir>/<database>.db`.
    pub database: String,
    /// Server port; only shown in the connection URL.
    pub port: u16,
    /// Session user; only shown in the connection URL and logs.
    pub user: String,
    /// Directory holding database files.
    pub data_dir: PathBuf,
}

impl ConnectOptions {
    /// Options for `database` in the current directory.
    pub fn new(database: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            port,
            user: user.into(),
            data_dir: PathBuf::from("."),
        }
    }

    /// Replaces the directory database files are resolved against.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// The connection URL printed at startup.
    pub fn url(&self) -> String {
        format!("sqlite://{DEFAULT_HOST}:{}/{}", self.port, self.database)
    }

    /// The database file, or `None` for [`MEMORY_DATABASE`].
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.database == MEMORY_DATABASE {
            None
        } else {
            Some(self.data_dir.join(format!("{}.db", self.database)))
        }
    }
}

/// An open database connection.
///
/// Owns exactly one `rusqlite::Connection` from [`Database::connect`] until
/// [`Database::cleanup`] (or drop). Every primitive binds its parameters
/// positionally (`?1`, `?2`, ...).
pub struct Database {
    conn: Connection,
    target: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Opens the database described by `options`.
    ///
    /// The file is created if missing, but its directory must exist. The
    /// connection is probed before returning, so a file that is not a
    /// SQLite database fails here rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connect` if the connection cannot be opened,
    /// configured, or probed.
    pub fn connect(options: &ConnectOptions, settings: DbRuntimeSettings) -> Result<Self, DbError> {
        let db = match options.database_path() {
            Some(path) => {
                let target = path.display().to_string();
                let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                let conn = Connection::open_with_flags(&path, flags).map_err(|source| {
                    DbError::Connect {
                        target: target.clone(),
                        source,
                    }
                })?;
                Self::configure(conn, target, settings)?
            }
            None => Self::open_in_memory(settings)?,
        };

        tracing::info!(
            url = %options.url(),
            user = %options.user,
            target = %db.target,
            "connected to database"
        );
        Ok(db)
    }

    /// Opens a private in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connect` if SQLite cannot allocate the database.
    pub fn open_in_memory(settings: DbRuntimeSettings) -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Connect {
            target: MEMORY_DATABASE.to_string(),
            source,
        })?;
        Self::configure(conn, MEMORY_DATABASE.to_string(), settings)
    }

    fn configure(
        conn: Connection,
        target: String,
        settings: DbRuntimeSettings,
    ) -> Result<Self, DbError> {
        let setup = conn
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
            .and_then(|()| conn.execute_batch("PRAGMA foreign_keys = ON;"))
            .and_then(|()| {
                conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
                    row.get::<_, i64>(0)
                })
            });

        match setup {
            Ok(_) => Ok(Self { conn, target }),
            Err(source) => Err(DbError::Connect { target, source }),
        }
    }

    /// The file path (or `:memory:`) this connection points at.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Creates the `USERS`, `Menu` and `Orders` tables if they are missing.
    ///
    /// Returns the number of tables that had to be created.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if the DDL fails; nothing is created then.
    pub fn apply_schema(&self) -> Result<usize, DbError> {
        schema::apply(&self.conn)
    }

    /// Runs a mutating statement (`INSERT`, `UPDATE`, `DELETE`, DDL).
    ///
    /// Returns the number of rows the statement changed.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the statement fails.
    pub fn execute_update<P: Params>(&self, sql: &str, params: P) -> Result<usize, DbError> {
        tracing::debug!(sql, "executing update");
        let affected = self.conn.execute(sql, params)?;
        tracing::debug!(affected, "update finished");
        Ok(affected)
    }

    /// Runs a query and writes its result to `out`.
    ///
    /// When the query returns at least one row, the column names are
    /// written once as a header line; every row follows on its own line.
    /// Values are tab-separated and rendered with [`render_value`].
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the query fails, or `DbError::Output`
    /// if writing to `out` fails.
    pub fn execute_query_and_print_result<P, W>(
        &self,
        sql: &str,
        params: P,
        out: &mut W,
    ) -> Result<usize, DbError>
    where
        P: Params,
        W: Write + ?Sized,
    {
        tracing::debug!(sql, "executing query for print");
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params)?;

        let mut row_count = 0;
        while let Some(row) = rows.next()? {
            if row_count == 0 {
                writeln!(out, "{}", columns.join("\t"))?;
            }
            writeln!(out, "{}", render_row(row, columns.len())?.join("\t"))?;
            row_count += 1;
        }
        Ok(row_count)
    }

    /// Runs a query and returns its rows, each rendered as text.
    ///
    /// Rows keep result-set order and every row has one entry per result
    /// column. Only data rows are returned; use [`Database::column_names`]
    /// for the header.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the query fails.
    pub fn execute_query_and_return_result<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Vec<String>>, DbError> {
        tracing::debug!(sql, "executing query for result");
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(render_row(row, width)?);
        }
        Ok(result)
    }

    /// Returns the column names a query would produce, without running it.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the query does not prepare.
    pub fn column_names(&self, sql: &str) -> Result<Vec<String>, DbError> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    /// Runs a query and returns how many rows it produced.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the query fails.
    pub fn execute_query<P: Params>(&self, sql: &str, params: P) -> Result<usize, DbError> {
        tracing::debug!(sql, "executing query for count");
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut row_count = 0;
        while rows.next()?.is_some() {
            row_count += 1;
        }
        Ok(row_count)
    }

    /// Returns the current value of the auto-increment sequence `name`.
    ///
    /// SQLite keeps one sequence per `AUTOINCREMENT` table, keyed by table
    /// name, and only records it after the first insert. Returns `-1` when
    /// there is no such row.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the lookup fails.
    pub fn current_sequence_value(&self, name: &str) -> Result<i64, DbError> {
        if !schema::table_exists(&self.conn, "sqlite_sequence")? {
            return Ok(-1);
        }

        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = ?1 COLLATE NOCASE",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(-1))
    }

    /// Closes the connection. Close-time errors are logged and ignored.
    pub fn cleanup(self) {
        let Self { conn, target } = self;
        match conn.close() {
            Ok(()) => tracing::debug!(%target, "database connection closed"),
            Err((_conn, e)) => {
                tracing::debug!(%target, error = %e, "ignoring error while closing connection");
            }
        }
    }
}

fn render_row(row: &Row<'_>, width: usize) -> rusqlite::Result<Vec<String>> {
    (0..width)
        .map(|idx| row.get_ref(idx).map(render_value))
        .collect()
}
