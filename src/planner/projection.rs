//! Field projection
//!
//! Selected fields = persisted fields, then the requested fields (or every
//! allowed field when none are requested) restricted to the allow list and
//! stripped of the exclude list. The identity field is always selected
//! unless the exclude list names it.

use serde::Serialize;

use crate::config::{JoinOption, QueryOptions};

/// Allow/exclude/persist rules applied to a field list
#[derive(Debug, Clone, Copy)]
pub struct FieldRules<'a> {
    pub allow: &'a [String],
    pub exclude: &'a [String],
    pub persist: &'a [String],
}

impl<'a> FieldRules<'a> {
    fn permits(&self, field: &str) -> bool {
        let allowed = self.allow.is_empty() || self.allow.iter().any(|f| f == field);
        let excluded = self.exclude.iter().any(|f| f == field);
        allowed && !excluded
    }
}

impl<'a> From<&'a QueryOptions> for FieldRules<'a> {
    fn from(options: &'a QueryOptions) -> Self {
        Self {
            allow: &options.allow,
            exclude: &options.exclude,
            persist: &options.persist,
        }
    }
}

impl<'a> From<&'a JoinOption> for FieldRules<'a> {
    fn from(option: &'a JoinOption) -> Self {
        Self {
            allow: &option.allow,
            exclude: &option.exclude,
            persist: &option.persist,
        }
    }
}

/// Resolved projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Selected paths, identity excluded, in selection order
    fields: Vec<String>,
    /// Whether the identity field is selected
    identity: bool,
}

impl Projection {
    /// Resolves the projection over `available` model paths
    pub fn resolve(
        available: &[String],
        requested: &[String],
        rules: FieldRules<'_>,
        identity: &str,
    ) -> Self {
        let allowed: Vec<&String> = available.iter().filter(|f| rules.permits(f)).collect();

        let selected: Vec<&String> = if requested.is_empty() {
            allowed
        } else {
            requested
                .iter()
                .filter(|field| allowed.iter().any(|a| a == field))
                .collect()
        };

        let mut fields: Vec<String> = Vec::new();
        for field in rules.persist.iter().chain(selected) {
            if field != identity && !fields.contains(field) {
                fields.push(field.clone());
            }
        }

        Self {
            fields,
            identity: !rules.exclude.iter().any(|f| f == identity),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn includes_identity(&self) -> bool {
        self.identity
    }

    /// Space separated selection, `-_id` when the identity is excluded
    pub fn to_select_string(&self, identity: &str) -> String {
        let mut parts: Vec<String> = self.fields.clone();
        if self.identity {
            parts.push(identity.to_string());
        } else {
            parts.push(format!("-{}", identity));
        }
        parts.join(" ")
    }
}
