//! Book use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for HTTP callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Log lines carry ids only, never titles or authors.

use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult};
use log::{debug, error, info};

/// Use-case service wrapper for book CRUD operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored book.
    pub fn find_all(&self) -> RepoResult<Vec<Book>> {
        let books = self.repo.list_books()?;
        debug!(
            "event=book_list module=service status=ok count={}",
            books.len()
        );
        Ok(books)
    }

    /// Gets one book by id.
    ///
    /// Returns `RepoError::NotFound` when no row matches.
    pub fn find_by_id(&self, id: BookId) -> RepoResult<Book> {
        self.repo.get_book(id)
    }

    /// Persists a validated create request and returns the stored record.
    pub fn create(&self, new_book: &NewBook) -> RepoResult<Book> {
        let book = self.repo.create_book(new_book)?;
        info!("event=book_create module=service status=ok id={}", book.id);
        Ok(book)
    }

    /// Applies `patch` with merge semantics.
    ///
    /// An empty patch is legal and returns the unmodified record.
    pub fn update(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        let book = self.repo.update_book(id, patch)?;
        info!(
            "event=book_update module=service status=ok id={} noop={}",
            id,
            patch.is_empty()
        );
        Ok(book)
    }

    /// Hard-deletes a book.
    ///
    /// # Contract
    /// - Returns `Ok(true)` once the row is gone.
    /// - Deleting an absent id reports `NotFound` every time.
    pub fn delete(&self, id: BookId) -> RepoResult<bool> {
        match self.repo.delete_book(id) {
            Ok(()) => {
                info!("event=book_delete module=service status=ok id={id}");
                Ok(true)
            }
            Err(err @ RepoError::NotFound(_)) => Err(err),
            Err(err) => {
                error!(
                    "event=book_delete module=service status=error id={} error={}",
                    id,
                    err
                );
                Err(err)
            }
        }
    }
}
