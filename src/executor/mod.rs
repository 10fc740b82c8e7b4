//! Store execution subsystem
//!
//! The `DocumentStore` trait is the seam between the CRUD handlers and a
//! concrete store. Reads receive a whole `QueryPlan` and are executed in a
//! fixed order:
//!
//! 1. Filter records by the plan's condition tree
//! 2. Sort (multi-key, stable)
//! 3. Skip, then limit
//! 4. Project each record
//! 5. Populate relations, projecting each populated record
//!
//! `InMemoryDatabase` is the reference implementation used by the CLI and
//! the test suite.

mod document;
mod errors;
mod filters;
mod identity;
mod memory;
mod sorter;
mod store;

pub use document::{get_path, project, set_path};
pub use errors::{StoreError, StoreResult};
pub use filters::PredicateFilter;
pub use identity::IdGenerator;
pub use memory::{InMemoryDatabase, InMemoryModel};
pub use sorter::ResultSorter;
pub use store::{DocumentStore, EqualityFilter, WriteAck};
