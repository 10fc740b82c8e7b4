//! # CRUD Errors
//!
//! Handler-level failures. Validation and empty payloads are rejected before
//! any store call; store faults pass through unchanged.

use serde::Serialize;
use thiserror::Error;

use crate::executor::StoreError;
use crate::planner::PlannerError;

/// Result type for CRUD operations
pub type CrudResult<T> = Result<T, CrudError>;

/// CRUD handler errors
#[derive(Debug, Clone, Error)]
pub enum CrudError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Empty or non-object payload, empty bulk array, bad path parameter
    #[error("{0}")]
    BadRequest(String),

    /// Single-record lookup matched nothing
    #[error("{0}")]
    NotFound(String),

    /// Malformed operator argument or search tree
    #[error("{0}")]
    Validation(#[from] PlannerError),

    // ==================
    // Store Errors
    // ==================
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl CrudError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CrudError::BadRequest(message.into())
    }

    pub fn not_found(model: &str) -> Self {
        CrudError::NotFound(format!("{} not found", model))
    }

    /// HTTP status equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            CrudError::BadRequest(_) | CrudError::Validation(_) => 400,
            CrudError::NotFound(_) => 404,
            CrudError::Store(e) if e.is_duplicate_key() => 409,
            CrudError::Store(_) => 500,
        }
    }

    /// Whether the request was refused before reaching the store
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CrudError::Store(_))
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&CrudError> for ErrorResponse {
    fn from(err: &CrudError) -> Self {
        Self {
            code: err.status_code(),
            error: err.to_string(),
        }
    }
}

impl From<CrudError> for ErrorResponse {
    fn from(err: CrudError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(CrudError::bad_request("x").status_code(), 400);
        assert_eq!(CrudError::not_found("users").status_code(), 404);
        assert_eq!(
            CrudError::from(PlannerError::invalid_value("id")).status_code(),
            400
        );
        assert_eq!(
            CrudError::from(StoreError::duplicate_key("users", "email", "a")).status_code(),
            409
        );
        assert_eq!(
            CrudError::from(StoreError::Internal("down".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_store_faults_pass_through() {
        let err = CrudError::from(StoreError::Lock("collections".into()));
        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "Lock poisoned: collections");
    }

    #[test]
    fn test_error_response_body() {
        let body = ErrorResponse::from(CrudError::not_found("users"));
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"error": "users not found", "code": 404})
        );
    }
}
