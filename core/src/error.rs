//! Failure categories for item operations.
//!
//! # Design
//! Every way an item operation can fail lands in one `ItemError` variant, and
//! each variant maps to exactly one HTTP status in the server crate. Store
//! implementations report backend trouble as `Unknown`; lookups that find
//! nothing return `Ok(None)` and handlers turn that into `NotFound`.

use thiserror::Error;

use crate::id::ItemId;
use crate::validation::ValidationError;

pub type ItemResult<T> = Result<T, ItemError>;

#[derive(Debug, Error)]
pub enum ItemError {
    /// The request-supplied id is not a 24-hex-character item id.
    #[error("malformed item id {value:?}: expected 24 hex characters")]
    MalformedIdentifier { value: String },

    /// One or more payload fields violate their constraints.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No item exists with the given id.
    #[error("item {id} not found")]
    NotFound { id: ItemId },

    /// The operation is declared but has no behavior yet.
    #[error("{operation} is not yet implemented")]
    NotImplemented { operation: &'static str },

    /// Anything else, typically a store failure.
    #[error("item store failure: {0}")]
    Unknown(String),
}

impl ItemError {
    pub fn malformed_identifier(value: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            value: value.into(),
        }
    }

    pub fn not_implemented(operation: &'static str) -> Self {
        Self::NotImplemented { operation }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedIdentifier { .. } | Self::Validation(_) | Self::NotFound { .. }
        )
    }
}
