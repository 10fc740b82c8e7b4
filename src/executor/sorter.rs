//! Result sorting for the in-memory store
//!
//! Multi-key, stable and deterministic. Keys are compared in order; later
//! keys only break ties of earlier ones.

use std::cmp::Ordering;

use serde_json::Value;

use crate::request::{QuerySort, SortOrder};

use super::document::get_path;

/// Sorts result documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents according to the sort specs.
    pub fn sort(documents: &mut [Value], specs: &[QuerySort]) {
        if specs.is_empty() {
            return;
        }
        documents.sort_by(|a, b| {
            specs
                .iter()
                .map(|spec| {
                    let ordering =
                        Self::compare_values(get_path(a, &spec.field), get_path(b, &spec.field));
                    match spec.order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string < array < object
    /// - For same types, natural ordering
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => {
                        let x = x.as_f64().unwrap_or(0.0);
                        let y = y.as_f64().unwrap_or(0.0);
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(x), Value::String(y)) => x.cmp(y),
                    _ => Ordering::Equal, // Arrays and objects not compared
                }
            }
        }
    }
}
