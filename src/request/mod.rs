//! # Request Parameters
//!
//! Normalized, per-request inputs consumed by the planner:
//! - `ParsedRequestParams`: projection, filter lists, search tree, joins,
//!   sort and paging fields
//! - `FlatCondition`: the canonical `{field, operator, value}` leaf
//! - `SearchNode`: the recursive `$and`/`$or`/field search tree
//!
//! These values are produced by the request-parsing layer and are read-only
//! to the rest of the crate.

mod params;
mod search;

pub use params::{FlatCondition, Operator, ParsedRequestParams, QueryJoin, QuerySort, SortOrder};
pub use search::{FieldValue, OperatorObject, SearchNode};
