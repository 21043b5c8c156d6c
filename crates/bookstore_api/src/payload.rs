//! Request body schemas.
//!
//! Fields are declared optional so that presence is checked here, with a
//! stable message, rather than by the JSON decoder.

use bookstore_core::{BookPatch, BookValidationError, NewBook};
use serde::Deserialize;

/// Body of `POST /books`. Both fields are required and non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl CreateBookInput {
    pub fn into_new_book(self) -> Result<NewBook, BookValidationError> {
        NewBook::new(
            self.title.unwrap_or_default(),
            self.author.unwrap_or_default(),
        )
    }
}

/// Body of `PUT|PATCH /books/:id`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl UpdateBookInput {
    pub fn into_patch(self) -> BookPatch {
        BookPatch::new(self.title, self.author)
    }
}
