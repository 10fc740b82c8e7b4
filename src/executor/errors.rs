//! Store error types
//!
//! Store faults are surfaced to callers unchanged; nothing in the crate
//! retries or rewrites them.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store execution errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Unique constraint violated
    #[error("Duplicate key on {model}.{field}: {value}")]
    DuplicateKey {
        model: String,
        field: String,
        value: String,
    },

    /// Document rejected by the store (required field, immutable identity)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Model not registered with the store
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Poisoned lock
    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn duplicate_key(
        model: impl Into<String>,
        field: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        StoreError::DuplicateKey {
            model: model.into(),
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
