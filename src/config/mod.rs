//! # Resource Configuration
//!
//! Static, per-resource configuration consumed read-only by the planner and
//! the CRUD handlers:
//! - `QueryOptions`: projection rules, default filter/sort/limit, joins
//! - `RouteOptions`: write-route behaviour (params override, shallow
//!   returns, returning deleted records)
//! - `ParamOption`: route path parameter to model field mapping
//!
//! Every struct deserializes from partial JSON; absent keys take defaults.

mod query;
mod routes;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::observability::Event;

pub use query::{JoinOption, QueryOptions};
pub use routes::{DeleteRouteOptions, ParamOption, ParamType, RouteOptions, WriteRouteOptions};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete configuration of one CRUD resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrudOptions {
    pub query: QueryOptions,
    pub routes: RouteOptions,
    pub params: Vec<ParamOption>,
}

impl CrudOptions {
    pub fn new(query: QueryOptions) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn with_routes(mut self, routes: RouteOptions) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_param(mut self, param: ParamOption) -> Self {
        self.params.push(param);
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let options = Self::from_json_str(&content)?;
        info!(
            event = %Event::ConfigLoaded,
            path = %path.display(),
            joins = options.query.join.len(),
            params = options.params.len(),
            "resource configuration loaded"
        );
        Ok(options)
    }
}
