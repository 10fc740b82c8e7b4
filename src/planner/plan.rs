//! Query plan
//!
//! A `QueryPlan` is built fresh for every call, handed once to the store and
//! discarded. It is never mutated after construction.

use crate::config::JoinOption;
use crate::request::QuerySort;
use crate::schema::ModelDescriptor;

use super::ast::Condition;
use super::projection::{FieldRules, Projection};

/// One relation to populate
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateSpec {
    /// Reference path on the queried model
    pub path: String,
    /// Model the reference points at
    pub model: String,
    /// Caller-requested fields of the populated record
    pub select: Vec<String>,
    /// Declared projection rules for the relation
    pub option: JoinOption,
}

impl PopulateSpec {
    /// Projection of the populated record over the target model
    pub fn projection(&self, target: &ModelDescriptor) -> Projection {
        Projection::resolve(
            target.fields(),
            &self.select,
            FieldRules::from(&self.option),
            target.identity(),
        )
    }
}

/// Executable query plan
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub projection: Projection,
    /// Root filter; `None` matches every record
    pub filter: Option<Condition>,
    pub populate: Vec<PopulateSpec>,
    /// Empty for single-record lookups
    pub sort: Vec<QuerySort>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    /// Whether the caller gets a page envelope
    pub paginated: bool,
}

impl QueryPlan {
    pub fn skip_or_zero(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    /// Same criteria without sort or window, for the unbounded count query
    pub fn count_filter(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, ModelSchema};
    use std::collections::BTreeMap;

    #[test]
    fn test_populate_projection_uses_target_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("name".into(), FieldDef::string());
        fields.insert("description".into(), FieldDef::string());
        let company = ModelDescriptor::from_schema(&ModelSchema::new("companies", fields));

        let spec = PopulateSpec {
            path: "companyId".into(),
            model: "companies".into(),
            select: Vec::new(),
            option: JoinOption::eager().with_exclude(vec!["description".into()]),
        };

        let projection = spec.projection(&company);
        assert_eq!(projection.fields(), &["name"]);
        assert!(projection.includes_identity());
    }
}
