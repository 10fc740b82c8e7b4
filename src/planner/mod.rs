//! Query Planner subsystem
//!
//! Compiles request parameters into an immutable `QueryPlan`.
//!
//! # Components
//!
//! - `OperatorMapper`: operator + literal to store-native `Fragment`
//! - `SearchConditionCompiler`: recursive `$and`/`$or` tree compiler
//! - `BracketAccumulator`: AND/OR group collector
//! - `QueryPlanBuilder`: projection, filter merging, joins, sort, window
//! - `PaginationPlanner`: limit/skip resolution and count decisions
//!
//! # Guarantees
//!
//! - Deterministic: the same inputs always produce the same plan
//! - Fully parenthesized filters; no precedence is left to the store
//! - Invalid operator arguments are rejected before any store call

mod ast;
mod brackets;
mod builder;
mod compiler;
mod errors;
mod explain;
mod operators;
mod pagination;
mod plan;
mod projection;

pub use ast::{Condition, Context, Fragment, Predicate};
pub use brackets::BracketAccumulator;
pub use builder::QueryPlanBuilder;
pub use compiler::SearchConditionCompiler;
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::{ExplainPlan, ExplainPopulate};
pub use operators::OperatorMapper;
pub use pagination::PaginationPlanner;
pub use plan::{PopulateSpec, QueryPlan};
pub use projection::{FieldRules, Projection};
