//! Schema error types
//!
//! Error codes:
//! - CRUD_SCHEMA_MALFORMED (FATAL)
//! - CRUD_SCHEMA_IMMUTABLE (REJECT)
//! - CRUD_UNKNOWN_MODEL (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected
    Reject,
    /// Startup cannot continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema file unreadable or structurally invalid
    MalformedSchema,
    /// Attempt to register a model twice
    SchemaImmutable,
    /// Model name not registered
    UnknownModel,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MalformedSchema => "CRUD_SCHEMA_MALFORMED",
            SchemaErrorCode::SchemaImmutable => "CRUD_SCHEMA_IMMUTABLE",
            SchemaErrorCode::UnknownModel => "CRUD_UNKNOWN_MODEL",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MalformedSchema => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    model: Option<String>,
}

impl SchemaError {
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            model: None,
        }
    }

    pub fn schema_immutable(model: impl Into<String>) -> Self {
        let m = model.into();
        Self {
            code: SchemaErrorCode::SchemaImmutable,
            message: format!("Model '{}' is already registered", m),
            model: Some(m),
        }
    }

    pub fn unknown_model(model: impl Into<String>) -> Self {
        let m = model.into();
        Self {
            code: SchemaErrorCode::UnknownModel,
            message: format!("Unknown model '{}'", m),
            model: Some(m),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
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

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::MalformedSchema.code(), "CRUD_SCHEMA_MALFORMED");
        assert_eq!(SchemaErrorCode::SchemaImmutable.code(), "CRUD_SCHEMA_IMMUTABLE");
        assert_eq!(SchemaErrorCode::UnknownModel.code(), "CRUD_UNKNOWN_MODEL");
    }

    #[test]
    fn test_severity() {
        assert!(SchemaError::malformed_schema("x.json", "bad").is_fatal());
        assert!(!SchemaError::unknown_model("users").is_fatal());
    }

    #[test]
    fn test_display_format() {
        let err = SchemaError::schema_immutable("users");
        let display = format!("{}", err);
        assert!(display.starts_with("[REJECT] CRUD_SCHEMA_IMMUTABLE"));
        assert_eq!(err.model(), Some("users"));
    }
}
