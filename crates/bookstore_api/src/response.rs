//! Response envelopes shared by every route.

use serde::Serialize;

/// Success envelope: `{"data": ..}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope: `{"error": ..}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
