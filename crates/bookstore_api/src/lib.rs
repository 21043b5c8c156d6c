//! HTTP surface for the bookstore.
//!
//! # Responsibility
//! - Map the five `/books` routes onto `bookstore_core::BookService`.
//! - Wrap every response in the `{"data": ..}` / `{"error": ..}` envelope.
//!
//! # Endpoints
//!
//! - `GET /books` - list every book
//! - `GET /books/:id` - fetch one book
//! - `POST /books` - create a book
//! - `PUT|PATCH /books/:id` - merge-update a book
//! - `DELETE /books/:id` - hard-delete a book

pub mod book_routes;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{router, serve};
pub use state::AppState;
