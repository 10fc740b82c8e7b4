//! Subscriber installation
//!
//! Only binaries call `init_logging`; the library itself never installs a
//! global subscriber.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::{ObservabilityError, ObservabilityResult};

/// Output format of log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single lines
    #[default]
    Plain,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `docquery=debug`
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>, format: LogFormat) -> Self {
        Self {
            level: level.into(),
            format,
        }
    }

    /// Parses the level directive
    pub fn filter(&self) -> ObservabilityResult<EnvFilter> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| ObservabilityError::invalid_config(format!("level '{}': {}", self.level, e)))
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// Fails if the level directive does not parse or a subscriber is already
/// installed.
pub fn init_logging(config: &LogConfig) -> ObservabilityResult<()> {
    let filter = config.filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ObservabilityError::init_failed(e.to_string()))
}
