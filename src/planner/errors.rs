//! Planner error types
//!
//! Error codes:
//! - CRUD_INVALID_FILTER_VALUE (REJECT)
//! - CRUD_INVALID_SEARCH (REJECT)
//!
//! Every planner error is raised before any store round-trip.

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Operator argument has the wrong shape (`in`, `notin`, `between`)
    InvalidFilterValue,
    /// Search tree is structurally malformed
    InvalidSearch,
}

impl PlannerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::InvalidFilterValue => "CRUD_INVALID_FILTER_VALUE",
            PlannerErrorCode::InvalidSearch => "CRUD_INVALID_SEARCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
    field: Option<String>,
}

impl PlannerError {
    /// Malformed operator argument for a field
    pub fn invalid_value(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: PlannerErrorCode::InvalidFilterValue,
            message: format!("Invalid field '{}' value", f),
            field: Some(f),
        }
    }

    /// Malformed search tree
    pub fn invalid_search(reason: impl Into<String>) -> Self {
        Self {
            code: PlannerErrorCode::InvalidSearch,
            message: reason.into(),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PlannerErrorCode::InvalidFilterValue.code(),
            "CRUD_INVALID_FILTER_VALUE"
        );
        assert_eq!(PlannerErrorCode::InvalidSearch.code(), "CRUD_INVALID_SEARCH");
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::invalid_value("status");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("CRUD_INVALID_FILTER_VALUE"));
        assert!(display.contains("'status'"));
        assert_eq!(err.field(), Some("status"));
    }
}
