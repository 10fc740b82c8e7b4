//! Observability subsystem
//!
//! Structured logging over `tracing`:
//! - every record carries an `event` field from the closed `Event` vocabulary
//! - plan construction and store round-trips log at DEBUG, writes at INFO,
//!   rejected requests at WARN
//! - `init_logging` installs a plain or JSON `tracing-subscriber` formatter
//!
//! # Usage
//!
//! ```ignore
//! use docquery::observability::{init_logging, Event, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! tracing::info!(event = %Event::RecordsCreated, model = "users", count = 3, "records created");
//! ```

mod events;
mod logging;

pub use events::Event;
pub use logging::{init_logging, LogConfig, LogFormat};

use std::fmt;

/// Observability error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// Level directive or format invalid
    InvalidConfig,
    /// Subscriber could not be installed
    InitFailed,
}

impl ObservabilityErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::InvalidConfig => "CRUD_LOG_CONFIG_INVALID",
            ObservabilityErrorCode::InitFailed => "CRUD_LOG_INIT_FAILED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
///
/// Logging failures are reported but never abort request processing.
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self {
            code: ObservabilityErrorCode::InvalidConfig,
            message: message.into(),
        }
    }

    pub fn init_failed(message: impl Into<String>) -> Self {
        Self {
            code: ObservabilityErrorCode::InitFailed,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;
