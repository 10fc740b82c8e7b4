//! Shared fixture for integration tests
//!
//! Ten companies (identities from 1000) with two users each. Users carry a
//! nested name, an active flag and a reference to their company.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use docquery::config::CrudOptions;
use docquery::crud::{CrudRequest, CrudService};
use docquery::executor::{
    DocumentStore, EqualityFilter, InMemoryDatabase, InMemoryModel, StoreResult, WriteAck,
};
use docquery::planner::{Condition, QueryPlan};
use docquery::request::ParsedRequestParams;
use docquery::schema::{FieldDef, IdentityKind, ModelDescriptor, ModelSchema};
use serde_json::{json, Map, Value};

pub const COMPANIES: u64 = 10;
pub const USERS_PER_COMPANY: u64 = 2;

pub struct Fixture {
    pub db: InMemoryDatabase,
    pub companies: InMemoryModel,
    pub users: InMemoryModel,
}

pub fn fixture() -> Fixture {
    let db = InMemoryDatabase::new();

    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), FieldDef::string().required().unique());
    fields.insert("domain".to_string(), FieldDef::string().unique());
    fields.insert("description".to_string(), FieldDef::string());
    let companies = db
        .register(
            ModelSchema::new("companies", fields)
                .with_identity(IdentityKind::Sequence { start: 1000 }),
        )
        .unwrap();

    let mut name = BTreeMap::new();
    name.insert("first".to_string(), FieldDef::string());
    name.insert("last".to_string(), FieldDef::string());
    let mut fields = BTreeMap::new();
    fields.insert("email".to_string(), FieldDef::string().required().unique());
    fields.insert("isActive".to_string(), FieldDef::bool());
    fields.insert("name".to_string(), FieldDef::object(name));
    fields.insert("companyId".to_string(), FieldDef::reference("companies"));
    let users = db.register(ModelSchema::new("users", fields)).unwrap();

    for i in 0..COMPANIES {
        let description = if i % 2 == 0 {
            Value::Null
        } else {
            json!("description")
        };
        companies
            .insert_one(object(json!({
                "name": format!("Name{}", i),
                "domain": format!("Domain{}", i),
                "description": description,
            })))
            .unwrap();
    }

    for i in 0..COMPANIES * USERS_PER_COMPANY {
        users
            .insert_one(object(json!({
                "email": format!("{}@email.com", i + 1),
                "isActive": i % 2 == 0,
                "name": {"first": format!("first{}", i + 1), "last": format!("last{}", i + 1)},
                "companyId": 1000 + i / USERS_PER_COMPANY,
            })))
            .unwrap();
    }

    Fixture {
        db,
        companies,
        users,
    }
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

pub fn parsed(value: Value) -> ParsedRequestParams {
    serde_json::from_value(value).unwrap()
}

pub fn request(value: Value) -> CrudRequest {
    CrudRequest::new(parsed(value))
}

pub fn options(value: Value) -> CrudOptions {
    serde_json::from_value(value).unwrap()
}

pub fn ids(records: &[Value]) -> Vec<u64> {
    records.iter().map(|r| r["_id"].as_u64().unwrap()).collect()
}

pub fn counted<S: DocumentStore>(store: S, options: CrudOptions) -> CrudService<CountingStore<S>> {
    CrudService::new(CountingStore::new(store), options)
}

/// Store wrapper recording how often each round trip is made
pub struct CountingStore<S> {
    inner: S,
    pub finds: AtomicUsize,
    pub counts: AtomicUsize,
    pub inserts: AtomicUsize,
    pub writes: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            finds: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Total store calls of any kind
    pub fn calls(&self) -> usize {
        self.finds() + self.counts() + self.inserts() + self.writes()
    }
}

impl<S: DocumentStore> DocumentStore for CountingStore<S> {
    fn descriptor(&self) -> &ModelDescriptor {
        self.inner.descriptor()
    }

    fn find(&self, plan: &QueryPlan) -> StoreResult<Vec<Value>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(plan)
    }

    fn find_one(&self, plan: &QueryPlan) -> StoreResult<Option<Value>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one(plan)
    }

    fn count(&self, filter: Option<&Condition>) -> StoreResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.inner.count(filter)
    }

    fn insert_one(&self, document: Map<String, Value>) -> StoreResult<Value> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_one(document)
    }

    fn insert_many(&self, documents: Vec<Map<String, Value>>) -> StoreResult<Vec<Value>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_many(documents)
    }

    fn update_one(
        &self,
        filter: &EqualityFilter,
        update: Map<String, Value>,
        upsert: bool,
    ) -> StoreResult<WriteAck> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_one(filter, update, upsert)
    }

    fn replace_one(
        &self,
        filter: &EqualityFilter,
        replacement: Map<String, Value>,
    ) -> StoreResult<WriteAck> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_one(filter, replacement)
    }

    fn find_one_and_delete(&self, filter: &EqualityFilter) -> StoreResult<Option<Value>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.find_one_and_delete(filter)
    }
}
