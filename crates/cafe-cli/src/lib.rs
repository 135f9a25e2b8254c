//! Console client for the cafe database.
//!
//! Parses the `<dbname> <port> <user>` command line, loads configuration,
//! and drives the nested text menus (account, main, item) over a single
//! [`cafe_db::Database`] connection. The menu driver is generic over its
//! input and output streams so whole sessions can be scripted in tests.

pub mod app;
pub mod args;
pub mod config;
pub mod console;
