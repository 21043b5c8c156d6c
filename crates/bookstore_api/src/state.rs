//! Shared handler state.
//!
//! # Invariants
//! - One connection per process, built at startup and injected into the router.
//! - The connection's schema is verified once, in `AppState::try_new`.
//! - The lock is held for one service call and never across an `.await`.
//! - Service calls run on tokio's blocking pool, never on a runtime worker.

use std::sync::{Arc, Mutex};

use bookstore_core::{BookService, RepoResult, SqliteBookRepository};
use log::warn;
use rusqlite::Connection;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Takes ownership of a migrated connection.
    ///
    /// # Errors
    /// Returns the repository schema error when `conn` was not opened through
    /// `bookstore_core::db::open_db` (or an equivalent migration).
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        SqliteBookRepository::try_new(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `op` on the blocking thread pool against a service bound to
    /// the shared connection.
    ///
    /// SQLite calls and lock waits stay off the async worker threads.
    pub async fn with_books<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&BookService<SqliteBookRepository<'_>>) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            // A panicking call poisons the lock; its transaction has already
            // rolled back on drop, so the connection stays usable.
            let conn = conn.lock().unwrap_or_else(|poisoned| {
                warn!("event=db_lock module=api status=recovered reason=poisoned");
                poisoned.into_inner()
            });
            let service = BookService::new(SqliteBookRepository::new(&conn));
            op(&service)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?;

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::db::open_db_in_memory;
    use bookstore_core::NewBook;
    use tokio::task::JoinSet;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let state = AppState::try_new(open_db_in_memory().unwrap()).unwrap();

        let mut tasks = JoinSet::new();
        for index in 0..8 {
            let state = state.clone();
            tasks.spawn(async move {
                let new_book = NewBook::new(format!("title {index}"), "author").unwrap();
                state
                    .with_books(move |service| service.create(&new_book))
                    .await
                    .unwrap()
                    .id
            });
        }

        let mut ids = Vec::new();
        while let Some(id) = tasks.join_next().await {
            ids.push(id.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);

        let books = state.with_books(|service| service.find_all()).await.unwrap();
        assert_eq!(books.len(), 8);
    }

    #[tokio::test]
    async fn test_panicking_call_is_reported_and_lock_recovers() {
        let state = AppState::try_new(open_db_in_memory().unwrap()).unwrap();

        let err = state
            .with_books(|_service| -> RepoResult<()> { panic!("storage call exploded") })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));

        let books = state.with_books(|service| service.find_all()).await.unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn test_try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(AppState::try_new(conn).is_err());
    }
}
