//! Operator mapping
//!
//! Turns a `FlatCondition` into a store-native `Fragment`. Pattern operators
//! escape the literal before embedding it, so caller input never acts as a
//! regular expression.

use serde_json::Value;

use super::ast::{Fragment, Predicate};
use super::errors::{PlannerError, PlannerResult};
use crate::request::{FlatCondition, Operator};

/// Maps comparison operators to fragments
pub struct OperatorMapper;

impl OperatorMapper {
    /// Maps a condition to a predicate on its field
    pub fn predicate(condition: &FlatCondition) -> PlannerResult<Predicate> {
        let fragment = Self::map(&condition.field, &condition.operator, &condition.value)?;
        Ok(Predicate::new(condition.field.clone(), fragment))
    }

    /// Maps `operator value` on `field` to a fragment.
    ///
    /// `field` is used only for error reporting.
    pub fn map(field: &str, operator: &Operator, value: &Value) -> PlannerResult<Fragment> {
        let fragment = match operator {
            Operator::Eq => Fragment::Eq(value.clone()),
            Operator::Ne => Fragment::Ne(value.clone()),
            Operator::Gt => Fragment::Gt(value.clone()),
            Operator::Lt => Fragment::Lt(value.clone()),
            Operator::Gte => Fragment::Gte(value.clone()),
            Operator::Lte => Fragment::Lte(value.clone()),
            Operator::Starts => Fragment::Pattern(format!("^{}", Self::escape(value))),
            Operator::Ends => Fragment::Pattern(format!("{}$", Self::escape(value))),
            Operator::Cont => Fragment::Pattern(Self::escape(value)),
            Operator::Excl => Fragment::NotPattern(Self::escape(value)),
            Operator::In => Fragment::In(Self::non_empty_list(field, value)?),
            Operator::NotIn => Fragment::NotIn(Self::non_empty_list(field, value)?),
            Operator::IsNull => Fragment::IsNull,
            Operator::NotNull => Fragment::NotNull,
            Operator::Between => match value.as_array().map(Vec::as_slice) {
                Some([lower, upper]) => Fragment::Range {
                    lower: lower.clone(),
                    upper: upper.clone(),
                },
                _ => return Err(PlannerError::invalid_value(field)),
            },
            Operator::Other(_) => Fragment::Literal(value.clone()),
        };
        Ok(fragment)
    }

    fn non_empty_list(field: &str, value: &Value) -> PlannerResult<Vec<Value>> {
        match value {
            Value::Array(items) if !items.is_empty() => Ok(items.clone()),
            _ => Err(PlannerError::invalid_value(field)),
        }
    }

    fn escape(value: &Value) -> String {
        match value {
            Value::String(s) => regex::escape(s),
            other => regex::escape(&other.to_string()),
        }
    }
}
