//! Result envelopes returned to the boundary layer.

use serde::{Deserialize, Serialize};

/// One page of a list query together with the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListViewModel<E> {
    /// Rows matching the filter across all pages
    pub count: i64,
    /// Rows of the requested page, in the requested order
    pub items: Vec<E>,
}

/// Outcome of a mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultViewModel<E> {
    pub success: bool,
    pub message: String,
    /// The affected entity; `None` after a delete
    pub data: Option<E>,
}

impl<E> ResultViewModel<E> {
    pub fn success(message: impl Into<String>, data: Option<E>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
