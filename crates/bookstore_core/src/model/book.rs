//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical `Book` record and its wire shape.
//! - Provide validated create input (`NewBook`) and merge patches (`BookPatch`).
//!
//! # Invariants
//! - `id` is assigned by storage, positive, and never changes.
//! - `title` and `author` are non-empty at creation time.
//! - Patches only overwrite fields they carry; omitted fields keep their value.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned primary key of a book row.
pub type BookId = i64;

/// Validation failures for book inputs and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required field was absent or empty.
    MissingField(&'static str),
    /// A persisted row carries an id outside the positive range.
    NonPositiveId(BookId),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::NonPositiveId(id) => write!(f, "book id must be positive, got {id}"),
        }
    }
}

impl Error for BookValidationError {}

/// Canonical persisted book record.
///
/// Serialized as `{"id": .., "title": .., "author": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

impl Book {
    /// Checks invariants that must hold for every stored row.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.id <= 0 {
            return Err(BookValidationError::NonPositiveId(self.id));
        }
        require_non_empty("title", &self.title)?;
        require_non_empty("author", &self.author)?;
        Ok(())
    }

    /// Merges `patch` into this record.
    ///
    /// Fields absent from the patch keep their current value.
    pub fn apply_patch(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
    }
}

/// Validated input for creating a book. Storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    title: String,
    author: String,
}

impl NewBook {
    /// Builds a create request, rejecting absent-equivalent (empty) fields.
    ///
    /// # Errors
    /// - `MissingField("title")` when `title` is empty.
    /// - `MissingField("author")` when `author` is empty.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, BookValidationError> {
        let new_book = Self {
            title: title.into(),
            author: author.into(),
        };
        new_book.validate()?;
        Ok(new_book)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Re-checks the create invariant.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("author", &self.author)?;
        Ok(())
    }
}

/// Partial update input with merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookPatch {
    /// Builds a patch; empty strings count as "not provided".
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        Self {
            title: title.filter(|value| !value.is_empty()),
            author: author.filter(|value| !value.is_empty()),
        }
    }

    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), BookValidationError> {
    if value.is_empty() {
        return Err(BookValidationError::MissingField(field));
    }
    Ok(())
}
