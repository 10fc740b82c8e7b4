//! Condition evaluation for the in-memory store
//!
//! Conditions are compiled once per query (regular expressions included)
//! and then evaluated against each document. Paths are dotted; when the
//! stored value is an array, a leaf matches if any element matches.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::planner::{Condition, Fragment};

use super::document::get_path;
use super::errors::{StoreError, StoreResult};
use super::store::EqualityFilter;

/// Compiled, reusable filter
#[derive(Debug)]
pub enum PredicateFilter {
    /// Matches every document
    All,
    Leaf { field: String, test: Test },
    And(Vec<PredicateFilter>),
    Or(Vec<PredicateFilter>),
}

/// Test applied to the value at a path
#[derive(Debug)]
pub enum Test {
    Fragment(Fragment),
    Pattern { regex: Regex, negated: bool },
}

impl PredicateFilter {
    pub fn compile(condition: Option<&Condition>) -> StoreResult<Self> {
        match condition {
            None => Ok(PredicateFilter::All),
            Some(condition) => Self::compile_condition(condition),
        }
    }

    fn compile_condition(condition: &Condition) -> StoreResult<Self> {
        match condition {
            Condition::Leaf(predicate) => {
                let test = match &predicate.fragment {
                    Fragment::Pattern(p) => Test::Pattern {
                        regex: Self::regex(p)?,
                        negated: false,
                    },
                    Fragment::NotPattern(p) => Test::Pattern {
                        regex: Self::regex(p)?,
                        negated: true,
                    },
                    other => Test::Fragment(other.clone()),
                };
                Ok(PredicateFilter::Leaf {
                    field: predicate.field.clone(),
                    test,
                })
            }
            Condition::And(items) => Ok(PredicateFilter::And(
                items
                    .iter()
                    .map(Self::compile_condition)
                    .collect::<StoreResult<_>>()?,
            )),
            Condition::Or(items) => Ok(PredicateFilter::Or(
                items
                    .iter()
                    .map(Self::compile_condition)
                    .collect::<StoreResult<_>>()?,
            )),
        }
    }

    fn regex(pattern: &str) -> StoreResult<Regex> {
        Regex::new(pattern).map_err(|e| StoreError::Internal(format!("pattern '{}': {}", pattern, e)))
    }

    /// Equality conjunction over each key of a write filter
    pub fn from_equality(filter: &EqualityFilter) -> Self {
        if filter.is_empty() {
            return PredicateFilter::All;
        }
        PredicateFilter::And(
            filter
                .iter()
                .map(|(field, value)| PredicateFilter::Leaf {
                    field: field.clone(),
                    test: Test::Fragment(match value {
                        Value::Null => Fragment::IsNull,
                        other => Fragment::Eq(other.clone()),
                    }),
                })
                .collect(),
        )
    }

    pub fn matches(&self, document: &Value) -> bool {
        match self {
            PredicateFilter::All => true,
            PredicateFilter::And(items) => items.iter().all(|f| f.matches(document)),
            PredicateFilter::Or(items) => items.iter().any(|f| f.matches(document)),
            PredicateFilter::Leaf { field, test } => test.matches(get_path(document, field)),
        }
    }
}

impl Test {
    fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Test::Pattern { regex, negated } => {
                let found = any_element(actual, |v| v.as_str().map_or(false, |s| regex.is_match(s)));
                found != *negated
            }
            Test::Fragment(fragment) => Self::fragment_matches(fragment, actual),
        }
    }

    fn fragment_matches(fragment: &Fragment, actual: Option<&Value>) -> bool {
        match fragment {
            Fragment::Eq(expected) | Fragment::Literal(expected) => eq_match(actual, expected),
            Fragment::Ne(expected) => !eq_match(actual, expected),
            Fragment::Gt(bound) => ordered(actual, bound, |o| o == Ordering::Greater),
            Fragment::Gte(bound) => ordered(actual, bound, |o| o != Ordering::Less),
            Fragment::Lt(bound) => ordered(actual, bound, |o| o == Ordering::Less),
            Fragment::Lte(bound) => ordered(actual, bound, |o| o != Ordering::Greater),
            Fragment::In(items) => items.iter().any(|item| eq_match(actual, item)),
            Fragment::NotIn(items) => !items.iter().any(|item| eq_match(actual, item)),
            Fragment::IsNull => is_null(actual),
            Fragment::NotNull => !is_null(actual),
            Fragment::Range { lower, upper } => {
                ordered(actual, lower, |o| o != Ordering::Less)
                    && ordered(actual, upper, |o| o == Ordering::Less)
            }
            Fragment::Pattern(_) | Fragment::NotPattern(_) => false,
        }
    }
}

fn is_null(actual: Option<&Value>) -> bool {
    matches!(actual, None | Some(Value::Null))
}

/// Equality with numeric normalization; `null` also matches a missing path
fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(value) if values_equal(value, expected) => true,
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(item, expected)),
        Some(_) => false,
    }
}

pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn any_element(actual: Option<&Value>, test: impl Fn(&Value) -> bool) -> bool {
    match actual {
        None => false,
        Some(Value::Array(items)) => items.iter().any(&test),
        Some(value) => test(value),
    }
}

/// Ordering comparison between same-kind values (numbers or strings)
fn ordered(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    any_element(actual, |value| match (value, bound) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).map_or(false, &accept),
            _ => false,
        },
        (Value::String(a), Value::String(b)) => accept(a.cmp(b)),
        _ => false,
    })
}
