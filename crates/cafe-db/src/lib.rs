//! Database access layer for the cafe console client.
//!
//! Wraps a single SQLite connection (via `rusqlite`) and exposes the handful
//! of execution primitives the console needs: run an update, run a query and
//! print it, run a query and collect its rows as text, count a query's rows,
//! and read an auto-increment sequence. The schema the console relies on is
//! embedded at compile time and can be bootstrapped on a fresh database.
//!
//! # Design decisions
//!
//! - **One connection, held for the process lifetime**: the console is
//!   single-threaded and synchronous, so there is nothing to pool.
//! - **Positional parameters only**: every primitive takes `rusqlite::Params`,
//!   so user input is bound rather than spliced into SQL text.
//! - **Rows as text**: result values are rendered to strings at the boundary
//!   (see [`render_value`]), matching what a console prints.

mod connection;
mod error;
mod render;
mod schema;

pub use connection::{ConnectOptions, Database, DbRuntimeSettings, DEFAULT_HOST, MEMORY_DATABASE};
pub use error::DbError;
pub use render::render_value;
pub use rusqlite::{params, Params};
