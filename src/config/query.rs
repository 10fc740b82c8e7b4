//! Per-resource query options

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::request::{FlatCondition, QuerySort};

/// Static query configuration of a CRUD resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Selectable fields; empty means every model field
    pub allow: Vec<String>,

    /// Fields never selected
    pub exclude: Vec<String>,

    /// Fields always selected regardless of allow/exclude
    pub persist: Vec<String>,

    /// Default conjunctive filter, applied when the request has no search tree
    pub filter: Vec<FlatCondition>,

    /// Populatable relations keyed by reference path
    pub join: BTreeMap<String, JoinOption>,

    /// Default sort when the request has none
    pub sort: Vec<QuerySort>,

    /// Default page size
    pub limit: Option<u64>,

    /// Upper bound for any page size
    pub max_limit: Option<u64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow(mut self, fields: Vec<String>) -> Self {
        self.allow = fields;
        self
    }

    pub fn with_exclude(mut self, fields: Vec<String>) -> Self {
        self.exclude = fields;
        self
    }

    pub fn with_persist(mut self, fields: Vec<String>) -> Self {
        self.persist = fields;
        self
    }

    pub fn with_filter(mut self, condition: FlatCondition) -> Self {
        self.filter.push(condition);
        self
    }

    pub fn with_join(mut self, field: impl Into<String>, option: JoinOption) -> Self {
        self.join.insert(field.into(), option);
        self
    }

    pub fn with_sort(mut self, sort: QuerySort) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = Some(max_limit);
        self
    }
}

/// Options of one populatable relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinOption {
    /// Populate on every query
    pub eager: bool,
    pub allow: Vec<String>,
    pub exclude: Vec<String>,
    pub persist: Vec<String>,
}

impl JoinOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eager() -> Self {
        Self {
            eager: true,
            ..Default::default()
        }
    }

    pub fn with_allow(mut self, fields: Vec<String>) -> Self {
        self.allow = fields;
        self
    }

    pub fn with_exclude(mut self, fields: Vec<String>) -> Self {
        self.exclude = fields;
        self
    }

    pub fn with_persist(mut self, fields: Vec<String>) -> Self {
        self.persist = fields;
        self
    }
}
