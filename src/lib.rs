//! docquery - CRUD query compilation and planning over a document store
//!
//! Turns parsed REST request parameters (projection, filters, nested search
//! trees, joins, sort, pagination) into an immutable query plan and executes
//! it through a document store adapter.

pub mod cli;
pub mod config;
pub mod crud;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod request;
pub mod schema;
