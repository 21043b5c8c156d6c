//! Bookstore storage bootstrap.
//!
//! `open_db` / `open_db_in_memory` are the only way the server obtains a
//! connection; both return a connection whose `books` schema is current.
//! Schema versions live in `PRAGMA user_version`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating the bookstore database.
///
/// Every variant except `Sqlite` is a startup failure: the server must not
/// accept traffic after receiving one.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("cannot open bookstore database ({target}): {source}")]
    Open {
        target: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("bookstore schema migration {version} failed: {source}")]
    Migration {
        version: u32,
        #[source]
        source: rusqlite::Error,
    },
    #[error(
        "bookstore database is at schema version {db_version}, this build only knows up to {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("bookstore storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
