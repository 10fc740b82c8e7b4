//! Store execution adapter
//!
//! The seam between the CRUD handlers and a concrete document store. Reads
//! receive the whole `QueryPlan`; writes receive equality filters built from
//! path parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::planner::{Condition, QueryPlan};
use crate::schema::ModelDescriptor;

use super::errors::StoreResult;

/// Equality filter used by single-record writes
pub type EqualityFilter = Map<String, Value>;

/// Raw acknowledgement of an update or replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    /// Records matching the filter
    pub matched: u64,
    /// Records actually changed
    pub modified: u64,
    /// Identity of an inserted record when the write upserted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Value>,
}

impl WriteAck {
    pub fn matched(modified: bool) -> Self {
        Self {
            matched: 1,
            modified: u64::from(modified),
            upserted_id: None,
        }
    }

    pub fn upserted(id: Value) -> Self {
        Self {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Document store for one model
pub trait DocumentStore: Send + Sync {
    /// Descriptor of the model this store serves
    fn descriptor(&self) -> &ModelDescriptor;

    /// Executes a plan: filter, sort, skip, limit, projection, populate
    fn find(&self, plan: &QueryPlan) -> StoreResult<Vec<Value>>;

    /// First record matching the plan's filter
    fn find_one(&self, plan: &QueryPlan) -> StoreResult<Option<Value>>;

    /// Unbounded count of records matching `filter`
    fn count(&self, filter: Option<&Condition>) -> StoreResult<u64>;

    /// Inserts one record and returns it as stored
    fn insert_one(&self, document: Map<String, Value>) -> StoreResult<Value>;

    /// Inserts records in order. Not transactional: on failure, records
    /// inserted before the failing one stay persisted.
    fn insert_many(&self, documents: Vec<Map<String, Value>>) -> StoreResult<Vec<Value>>;

    /// Sets the payload fields on the first match, inserting when nothing
    /// matches and `upsert` is set
    fn update_one(
        &self,
        filter: &EqualityFilter,
        update: Map<String, Value>,
        upsert: bool,
    ) -> StoreResult<WriteAck>;

    /// Replaces the first match, keeping its identity
    fn replace_one(
        &self,
        filter: &EqualityFilter,
        replacement: Map<String, Value>,
    ) -> StoreResult<WriteAck>;

    /// Deletes the first match and returns it
    fn find_one_and_delete(&self, filter: &EqualityFilter) -> StoreResult<Option<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ack_serialization() {
        assert_eq!(
            serde_json::to_value(WriteAck::matched(true)).unwrap(),
            json!({"matched": 1, "modified": 1})
        );
        assert_eq!(
            serde_json::to_value(WriteAck::upserted(json!(7))).unwrap(),
            json!({"matched": 0, "modified": 0, "upsertedId": 7})
        );
    }
}
