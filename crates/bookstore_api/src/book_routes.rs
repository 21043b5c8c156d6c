//! Book HTTP routes.
//!
//! Each handler is a thin composition: parse the path id, validate the body,
//! call `BookService`, wrap the result in an `Envelope`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookstore_core::{Book, BookId};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::payload::{CreateBookInput, UpdateBookInput};
use crate::response::Envelope;
use crate::state::AppState;

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Create book routes
pub fn book_routes(state: AppState) -> Router {
    Router::new()
        .route("/books", get(find_books).post(create_book))
        .route(
            "/books/:id",
            get(find_book)
                .put(update_book)
                .patch(update_book)
                .delete(delete_book),
        )
        .with_state(state)
}

/// A non-numeric id cannot match any row, so it is reported as not found.
fn parse_book_id(raw: &str) -> Result<BookId, ApiError> {
    raw.parse::<BookId>().map_err(|_| ApiError::NotFound)
}

/// Decodes a JSON body regardless of the request's `Content-Type`.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Validation(err.to_string()))
}

pub async fn find_books(State(state): State<AppState>) -> ApiResult<Vec<Book>> {
    let books = state.with_books(|service| service.find_all()).await?;
    Ok(Json(Envelope::new(books)))
}

pub async fn find_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Book> {
    let id = parse_book_id(&id)?;
    let book = state
        .with_books(move |service| service.find_by_id(id))
        .await?;
    Ok(Json(Envelope::new(book)))
}

pub async fn create_book(State(state): State<AppState>, body: Bytes) -> ApiResult<Book> {
    let input: CreateBookInput = decode_body(&body)?;
    let new_book = input.into_new_book()?;
    let book = state
        .with_books(move |service| service.create(&new_book))
        .await?;
    Ok(Json(Envelope::new(book)))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Book> {
    let input: UpdateBookInput = decode_body(&body)?;
    let patch = input.into_patch();
    let id = parse_book_id(&id)?;
    let book = state
        .with_books(move |service| service.update(id, &patch))
        .await?;
    Ok(Json(Envelope::new(book)))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    let id = parse_book_id(&id)?;
    let deleted = state.with_books(move |service| service.delete(id)).await?;
    Ok(Json(Envelope::new(deleted)))
}
