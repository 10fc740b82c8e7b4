//! In-memory reference store
//!
//! A `DocumentStore` over `RwLock`-guarded collections of JSON documents.
//! Models are registered once; each registered model gets an immutable
//! descriptor and its own identity generator. Unique fields (and the
//! identity) are enforced on every write.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::observability::Event;
use crate::planner::{Condition, PopulateSpec, QueryPlan};
use crate::schema::{ModelDescriptor, ModelRegistry, ModelSchema};

use super::document::{get_path, project, set_path};
use super::errors::{StoreError, StoreResult};
use super::filters::{values_equal, PredicateFilter};
use super::identity::IdGenerator;
use super::sorter::ResultSorter;
use super::store::{DocumentStore, EqualityFilter, WriteAck};

type Collections = HashMap<String, Vec<Value>>;

#[derive(Debug, Default)]
struct Shared {
    registry: RwLock<ModelRegistry>,
    collections: RwLock<Collections>,
}

impl Shared {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Lock("collections".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Lock("collections".to_string()))
    }

    fn registry(&self) -> StoreResult<RwLockReadGuard<'_, ModelRegistry>> {
        self.registry
            .read()
            .map_err(|_| StoreError::Lock("registry".to_string()))
    }
}

/// In-memory database holding every registered model
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    shared: Arc<Shared>,
    generators: Arc<RwLock<HashMap<String, Arc<IdGenerator>>>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model and returns its store handle
    pub fn register(&self, schema: ModelSchema) -> StoreResult<InMemoryModel> {
        let descriptor = {
            let mut registry = self
                .shared
                .registry
                .write()
                .map_err(|_| StoreError::Lock("registry".to_string()))?;
            registry.register(schema)?
        };

        let ids = Arc::new(IdGenerator::new(descriptor.identity_kind().clone()));
        self.generators
            .write()
            .map_err(|_| StoreError::Lock("generators".to_string()))?
            .insert(descriptor.name().to_string(), Arc::clone(&ids));
        self.shared
            .write()?
            .insert(descriptor.name().to_string(), Vec::new());

        info!(
            event = %Event::ModelRegistered,
            model = descriptor.name(),
            fields = descriptor.fields().len(),
            references = descriptor.references().len(),
            "model registered"
        );

        Ok(InMemoryModel {
            descriptor,
            ids,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Store handle of a registered model
    pub fn model(&self, name: &str) -> StoreResult<InMemoryModel> {
        let descriptor = self
            .shared
            .registry()?
            .get(name)
            .ok_or_else(|| StoreError::UnknownModel(name.to_string()))?;
        let ids = self
            .generators
            .read()
            .map_err(|_| StoreError::Lock("generators".to_string()))?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownModel(name.to_string()))?;

        Ok(InMemoryModel {
            descriptor,
            ids,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Empties every collection and restarts identity sequences
    pub fn reset(&self) -> StoreResult<()> {
        for records in self.shared.write()?.values_mut() {
            records.clear();
        }
        for ids in self
            .generators
            .read()
            .map_err(|_| StoreError::Lock("generators".to_string()))?
            .values()
        {
            ids.reset();
        }
        Ok(())
    }
}

/// Store handle of one registered model
#[derive(Debug, Clone)]
pub struct InMemoryModel {
    descriptor: Arc<ModelDescriptor>,
    ids: Arc<IdGenerator>,
    shared: Arc<Shared>,
}

impl InMemoryModel {
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Snapshot of every stored record, in insertion order
    pub fn documents(&self) -> StoreResult<Vec<Value>> {
        let collections = self.shared.read()?;
        Ok(self.collection(&collections)?.clone())
    }

    fn name(&self) -> &str {
        self.descriptor.name()
    }

    fn identity(&self) -> &str {
        self.descriptor.identity()
    }

    fn collection<'c>(&self, collections: &'c Collections) -> StoreResult<&'c Vec<Value>> {
        collections
            .get(self.name())
            .ok_or_else(|| StoreError::UnknownModel(self.name().to_string()))
    }

    fn collection_mut<'c>(&self, collections: &'c mut Collections) -> StoreResult<&'c mut Vec<Value>> {
        collections
            .get_mut(self.name())
            .ok_or_else(|| StoreError::UnknownModel(self.name().to_string()))
    }

    /// Assigns an identity if missing and checks constraints against `existing`
    fn prepare_insert(
        &self,
        mut document: Map<String, Value>,
        existing: &[Value],
        check_required: bool,
    ) -> StoreResult<Value> {
        let supplied = document
            .get(self.identity())
            .filter(|id| !id.is_null())
            .cloned();
        match supplied {
            Some(id) => self.ids.observe(&id),
            None => {
                document.insert(self.identity().to_string(), self.ids.next_id());
            }
        }

        let document = Value::Object(document);
        if check_required {
            self.check_required(&document)?;
        }
        self.check_unique(&document, existing, None)?;
        Ok(document)
    }

    fn check_required(&self, document: &Value) -> StoreResult<()> {
        for field in self.descriptor.required_fields() {
            if matches!(get_path(document, field), None | Some(Value::Null)) {
                return Err(StoreError::InvalidDocument(format!(
                    "{}.{} is required",
                    self.name(),
                    field
                )));
            }
        }
        Ok(())
    }

    fn check_unique(&self, document: &Value, existing: &[Value], skip: Option<usize>) -> StoreResult<()> {
        let identity = self.identity().to_string();
        for field in std::iter::once(&identity).chain(self.descriptor.unique_fields()) {
            let value = match get_path(document, field) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            let taken = existing.iter().enumerate().any(|(i, other)| {
                Some(i) != skip && get_path(other, field).map_or(false, |v| values_equal(v, value))
            });
            if taken {
                return Err(StoreError::duplicate_key(self.name(), field.as_str(), value));
            }
        }
        Ok(())
    }

    fn check_identity_unchanged(&self, current: &Value, requested: &Value) -> StoreResult<()> {
        if values_equal(current, requested) {
            Ok(())
        } else {
            Err(StoreError::InvalidDocument(format!(
                "{}.{} is immutable",
                self.name(),
                self.identity()
            )))
        }
    }

    fn window(&self, plan: &QueryPlan, collections: &Collections) -> StoreResult<Vec<Value>> {
        let filter = PredicateFilter::compile(plan.filter.as_ref())?;
        let mut matched: Vec<Value> = self
            .collection(collections)?
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();

        ResultSorter::sort(&mut matched, &plan.sort);

        let skip = usize::try_from(plan.skip_or_zero()).unwrap_or(usize::MAX);
        let limit = plan
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        let mut window: Vec<Value> = matched
            .iter()
            .skip(skip)
            .take(limit)
            .map(|d| project(d, &plan.projection, self.identity()))
            .collect();

        self.populate(&mut window, &plan.populate, collections)?;
        Ok(window)
    }

    fn populate(
        &self,
        documents: &mut [Value],
        specs: &[PopulateSpec],
        collections: &Collections,
    ) -> StoreResult<()> {
        if specs.is_empty() {
            return Ok(());
        }
        let registry = self.shared.registry()?;

        for spec in specs {
            let target = registry.require(&spec.model)?;
            let projection = spec.projection(&target);
            let records = collections.get(&spec.model).map(Vec::as_slice).unwrap_or(&[]);

            let lookup = |id: &Value| {
                records
                    .iter()
                    .find(|r| r.get(target.identity()).map_or(false, |v| values_equal(v, id)))
                    .map(|r| project(r, &projection, target.identity()))
            };

            for document in documents.iter_mut() {
                let populated = match get_path(document, &spec.path) {
                    None | Some(Value::Null) => continue,
                    Some(Value::Array(ids)) => Value::Array(ids.iter().filter_map(lookup).collect()),
                    Some(id) => lookup(id).unwrap_or(Value::Null),
                };
                if let Value::Object(map) = document {
                    set_path(map, &spec.path, populated);
                }
            }
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryModel {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    fn find(&self, plan: &QueryPlan) -> StoreResult<Vec<Value>> {
        let collections = self.shared.read()?;
        let window = self.window(plan, &collections)?;
        debug!(
            event = %Event::QueryExecuted,
            model = self.name(),
            returned = window.len(),
            "query executed"
        );
        Ok(window)
    }

    fn find_one(&self, plan: &QueryPlan) -> StoreResult<Option<Value>> {
        let collections = self.shared.read()?;
        let filter = PredicateFilter::compile(plan.filter.as_ref())?;
        let found = self
            .collection(&collections)?
            .iter()
            .find(|d| filter.matches(d))
            .map(|d| project(d, &plan.projection, self.identity()));

        let mut found: Vec<Value> = found.into_iter().collect();
        self.populate(&mut found, &plan.populate, &collections)?;
        debug!(
            event = %Event::QueryExecuted,
            model = self.name(),
            returned = found.len(),
            "single record lookup executed"
        );
        Ok(found.pop())
    }

    fn count(&self, filter: Option<&Condition>) -> StoreResult<u64> {
        let filter = PredicateFilter::compile(filter)?;
        let collections = self.shared.read()?;
        let total = self
            .collection(&collections)?
            .iter()
            .filter(|d| filter.matches(d))
            .count() as u64;
        debug!(event = %Event::QueryExecuted, model = self.name(), total, "count executed");
        Ok(total)
    }

    fn insert_one(&self, document: Map<String, Value>) -> StoreResult<Value> {
        let mut collections = self.shared.write()?;
        let records = self.collection_mut(&mut collections)?;
        let stored = self.prepare_insert(document, records, true)?;
        records.push(stored.clone());
        Ok(stored)
    }

    fn insert_many(&self, documents: Vec<Map<String, Value>>) -> StoreResult<Vec<Value>> {
        let mut collections = self.shared.write()?;
        let records = self.collection_mut(&mut collections)?;
        let mut inserted = Vec::with_capacity(documents.len());
        for document in documents {
            let stored = self.prepare_insert(document, records, true)?;
            records.push(stored.clone());
            inserted.push(stored);
        }
        Ok(inserted)
    }

    fn update_one(
        &self,
        filter: &EqualityFilter,
        update: Map<String, Value>,
        upsert: bool,
    ) -> StoreResult<WriteAck> {
        let matcher = PredicateFilter::from_equality(filter);
        let identity = self.identity().to_string();
        let mut collections = self.shared.write()?;
        let records = self.collection_mut(&mut collections)?;

        match records.iter().position(|d| matcher.matches(d)) {
            Some(index) => {
                let mut updated = records[index].clone();
                if let Value::Object(map) = &mut updated {
                    for (path, value) in update {
                        if path == identity {
                            let current = map.get(&identity).cloned().unwrap_or(Value::Null);
                            self.check_identity_unchanged(&current, &value)?;
                        }
                        set_path(map, &path, value);
                    }
                }
                self.check_unique(&updated, records, Some(index))?;
                let modified = updated != records[index];
                records[index] = updated;
                Ok(WriteAck::matched(modified))
            }
            None if upsert => {
                let mut document = Map::new();
                for (path, value) in filter {
                    set_path(&mut document, path, value.clone());
                }
                for (path, value) in update {
                    if path == identity {
                        if let Some(current) = document.get(&identity) {
                            self.check_identity_unchanged(current, &value)?;
                        }
                    }
                    set_path(&mut document, &path, value);
                }
                let stored = self.prepare_insert(document, records, false)?;
                let id = stored.get(&identity).cloned().unwrap_or(Value::Null);
                records.push(stored);
                Ok(WriteAck::upserted(id))
            }
            None => Ok(WriteAck::none()),
        }
    }

    fn replace_one(
        &self,
        filter: &EqualityFilter,
        mut replacement: Map<String, Value>,
    ) -> StoreResult<WriteAck> {
        let matcher = PredicateFilter::from_equality(filter);
        let identity = self.identity().to_string();
        let mut collections = self.shared.write()?;
        let records = self.collection_mut(&mut collections)?;

        let index = match records.iter().position(|d| matcher.matches(d)) {
            Some(index) => index,
            None => return Ok(WriteAck::none()),
        };

        let current = records[index].get(&identity).cloned().unwrap_or(Value::Null);
        if let Some(requested) = replacement.get(&identity) {
            self.check_identity_unchanged(&current, requested)?;
        }
        replacement.insert(identity, current);

        let replaced = Value::Object(replacement);
        self.check_required(&replaced)?;
        self.check_unique(&replaced, records, Some(index))?;
        let modified = replaced != records[index];
        records[index] = replaced;
        Ok(WriteAck::matched(modified))
    }

    fn find_one_and_delete(&self, filter: &EqualityFilter) -> StoreResult<Option<Value>> {
        let matcher = PredicateFilter::from_equality(filter);
        let mut collections = self.shared.write()?;
        let records = self.collection_mut(&mut collections)?;
        Ok(records
            .iter()
            .position(|d| matcher.matches(d))
            .map(|index| records.remove(index)))
    }
}
