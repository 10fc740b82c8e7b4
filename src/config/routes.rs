//! Per-route write behaviour and path parameter mapping

use serde::{Deserialize, Serialize};

/// Options shared by updateOne and replaceOne
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriteRouteOptions {
    /// Caller payload fields win over path parameter fields
    pub allow_params_override: bool,
    /// Return the raw write acknowledgement instead of reloading the record
    pub return_shallow: bool,
}

/// Options of deleteOne
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteRouteOptions {
    pub return_deleted: bool,
}

/// Route options of a CRUD resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteOptions {
    pub update_one: WriteRouteOptions,
    pub replace_one: WriteRouteOptions,
    pub delete_one: DeleteRouteOptions,
}

/// Type a path parameter is parsed as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    Number,
    String,
    Uuid,
}

/// Maps a route path parameter onto a model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamOption {
    /// Path parameter name
    pub name: String,
    /// Model field the parameter filters on
    pub field: String,
    #[serde(default, rename = "type")]
    pub param_type: ParamType,
}

impl ParamOption {
    pub fn new(name: impl Into<String>, field: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            param_type,
        }
    }
}
