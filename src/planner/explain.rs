//! Explain output
//!
//! Renders plans deterministically: conditions as fully parenthesized
//! boolean expressions, plans as JSON.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::ast::{Condition, Fragment, Predicate};
use super::errors::PlannerError;
use super::plan::QueryPlan;
use crate::request::SortOrder;

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match &self.fragment {
            Fragment::Eq(v) => write!(f, "{} = {}", field, v),
            Fragment::Ne(v) => write!(f, "{} != {}", field, v),
            Fragment::Gt(v) => write!(f, "{} > {}", field, v),
            Fragment::Lt(v) => write!(f, "{} < {}", field, v),
            Fragment::Gte(v) => write!(f, "{} >= {}", field, v),
            Fragment::Lte(v) => write!(f, "{} <= {}", field, v),
            Fragment::Pattern(p) => write!(f, "{} ~ /{}/", field, p),
            Fragment::NotPattern(p) => write!(f, "{} !~ /{}/", field, p),
            Fragment::In(items) => write!(f, "{} IN {}", field, Value::Array(items.clone())),
            Fragment::NotIn(items) => {
                write!(f, "{} NOT IN {}", field, Value::Array(items.clone()))
            }
            Fragment::IsNull => write!(f, "{} IS NULL", field),
            Fragment::NotNull => write!(f, "{} IS NOT NULL", field),
            Fragment::Range { lower, upper } => {
                write!(f, "({} >= {} AND {} < {})", field, lower, field, upper)
            }
            Fragment::Literal(v) => write!(f, "{} := {}", field, v),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (items, joiner) = match self {
            Condition::Leaf(predicate) => return write!(f, "{}", predicate),
            Condition::And(items) => (items, " AND "),
            Condition::Or(items) => (items, " OR "),
        };
        write!(f, "(")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(joiner)?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}

/// Populate entry of an explain plan
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPopulate {
    pub path: String,
    pub model: String,
    pub select: Vec<String>,
}

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub populate: Vec<ExplainPopulate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    pub paginated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    pub fn from_plan(plan: &QueryPlan, identity: &str) -> Self {
        Self {
            accepted: true,
            select: Some(plan.projection.to_select_string(identity)),
            filter: plan.filter.as_ref().map(Condition::to_string),
            populate: plan
                .populate
                .iter()
                .map(|p| ExplainPopulate {
                    path: p.path.clone(),
                    model: p.model.clone(),
                    select: p.select.clone(),
                })
                .collect(),
            sort: plan
                .sort
                .iter()
                .map(|s| {
                    let order = match s.order {
                        SortOrder::Asc => "ASC",
                        SortOrder::Desc => "DESC",
                    };
                    format!("{} {}", s.field, order)
                })
                .collect(),
            skip: plan.skip,
            limit: plan.limit,
            paginated: plan.paginated,
            rejection_reason: None,
            rejection_code: None,
        }
    }

    pub fn from_error(err: &PlannerError) -> Self {
        Self {
            accepted: false,
            select: None,
            filter: None,
            populate: Vec::new(),
            sort: Vec::new(),
            skip: None,
            limit: None,
            paginated: false,
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl QueryPlan {
    /// JSON rendering of the plan
    pub fn explain(&self, identity: &str) -> Value {
        ExplainPlan::from_plan(self, identity).to_json()
    }
}
