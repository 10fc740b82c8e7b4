//! CRUD operation handlers
//!
//! `CrudService` drives one model's store through the planner. Validation
//! and empty-payload faults are raised before any store call; store faults
//! propagate unchanged and are never retried.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::CrudOptions;
use crate::executor::{set_path, DocumentStore, EqualityFilter, StoreError};
use crate::observability::Event;
use crate::planner::{PaginationPlanner, QueryPlan, QueryPlanBuilder};

use super::errors::{CrudError, CrudResult};
use super::request::CrudRequest;
use super::response::{GetManyResponse, PageInfo, WriteResult};

const EMPTY_PAYLOAD: &str = "Empty data. Nothing to save.";

/// CRUD handlers over one document store
pub struct CrudService<S> {
    store: S,
    options: CrudOptions,
}

impl<S: DocumentStore> CrudService<S> {
    pub fn new(store: S, options: CrudOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &CrudOptions {
        &self.options
    }

    fn model(&self) -> &str {
        self.store.descriptor().name()
    }

    fn builder(&self) -> QueryPlanBuilder<'_> {
        QueryPlanBuilder::new(self.store.descriptor(), &self.options.query)
    }

    fn plan(&self, request: &CrudRequest, many: bool) -> CrudResult<QueryPlan> {
        self.builder()
            .build(&request.parsed, many)
            .map_err(|e| self.rejected(e.into()))
    }

    fn rejected(&self, err: CrudError) -> CrudError {
        let event = match err {
            CrudError::NotFound(_) => Event::RecordNotFound,
            _ => Event::ValidationRejected,
        };
        warn!(
            event = %event,
            model = self.model(),
            status = err.status_code(),
            error = %err,
            "request rejected"
        );
        err
    }

    fn write_failed(&self, err: StoreError) -> CrudError {
        warn!(
            event = %Event::WriteFailed,
            model = self.model(),
            error = %err,
            "store rejected write"
        );
        CrudError::Store(err)
    }

    /// Lists records; paginated requests get a page envelope
    pub fn get_many(&self, request: &CrudRequest) -> CrudResult<GetManyResponse> {
        let plan = self.plan(request, true)?;
        let data = self.store.find(&plan)?;

        let limit = match (plan.paginated, plan.limit) {
            (true, Some(limit)) => limit,
            _ => return Ok(GetManyResponse::Bare(data)),
        };
        let skip = plan.skip_or_zero();

        let total = if PaginationPlanner::needs_count(data.len(), plan.limit) {
            debug!(
                event = %Event::CountQueryIssued,
                model = self.model(),
                returned = data.len(),
                "window full, counting total"
            );
            self.store.count(plan.count_filter())?
        } else {
            PaginationPlanner::window_total(data.len(), skip)
        };

        Ok(GetManyResponse::Paginated(PageInfo {
            count: data.len() as u64,
            total,
            page: PaginationPlanner::page_number(skip, limit),
            page_count: PaginationPlanner::page_count(total, limit),
            data,
        }))
    }

    /// Single record matching the request, or NotFound
    pub fn get_one(&self, request: &CrudRequest) -> CrudResult<Value> {
        let plan = self.plan(request, false)?;
        match self.store.find_one(&plan)? {
            Some(record) => Ok(record),
            None => Err(self.rejected(CrudError::not_found(self.model()))),
        }
    }

    pub fn create_one(&self, request: &CrudRequest, dto: Value) -> CrudResult<Value> {
        let record = prepare_record(dto, &request.params_object())
            .ok_or_else(|| self.rejected(CrudError::bad_request(EMPTY_PAYLOAD)))?;

        let saved = self
            .store
            .insert_one(record)
            .map_err(|e| self.write_failed(e))?;
        info!(event = %Event::RecordsCreated, model = self.model(), count = 1, "record created");
        Ok(saved)
    }

    /// Inserts every usable entry of `dto.bulk`
    ///
    /// Not transactional: if the store fails midway, records inserted before
    /// the failure stay persisted.
    pub fn create_many(&self, request: &CrudRequest, dto: Value) -> CrudResult<Vec<Value>> {
        let entries = match dto {
            Value::Object(mut object) => match object.remove("bulk") {
                Some(Value::Array(entries)) if !entries.is_empty() => entries,
                _ => return Err(self.rejected(CrudError::bad_request(EMPTY_PAYLOAD))),
            },
            _ => return Err(self.rejected(CrudError::bad_request(EMPTY_PAYLOAD))),
        };

        let params = request.params_object();
        let bulk: Vec<Map<String, Value>> = entries
            .into_iter()
            .filter_map(|entry| prepare_record(entry, &params))
            .collect();
        if bulk.is_empty() {
            return Err(self.rejected(CrudError::bad_request(EMPTY_PAYLOAD)));
        }

        let saved = self
            .store
            .insert_many(bulk)
            .map_err(|e| self.write_failed(e))?;
        info!(
            event = %Event::RecordsCreated,
            model = self.model(),
            count = saved.len(),
            "records created"
        );
        Ok(saved)
    }

    /// Sets the payload fields on the record addressed by the path
    /// parameters, inserting it when missing
    pub fn update_one(&self, request: &CrudRequest, dto: Value) -> CrudResult<WriteResult> {
        let routes = self.options.routes.update_one;
        let dto = self.payload(dto)?;
        let params = request.params_object();

        let to_save = if routes.allow_params_override {
            dto
        } else {
            overlay(dto, &params)
        };

        let ack = self
            .store
            .update_one(&params, to_save.clone(), true)
            .map_err(|e| self.write_failed(e))?;
        info!(
            event = %Event::RecordUpdated,
            model = self.model(),
            matched = ack.matched,
            modified = ack.modified,
            upserted = ack.upserted_id.is_some(),
            "record updated"
        );

        if routes.return_shallow {
            return Ok(WriteResult::Shallow(ack));
        }
        self.reload(request, &to_save).map(WriteResult::Record)
    }

    /// Replaces the record addressed by the path parameters
    pub fn replace_one(&self, request: &CrudRequest, dto: Value) -> CrudResult<WriteResult> {
        let routes = self.options.routes.replace_one;
        let dto = self.payload(dto)?;
        let params = request.params_object();

        let to_save = if routes.allow_params_override {
            overlay(params.clone(), &dto)
        } else {
            overlay(dto, &params)
        };

        let ack = self
            .store
            .replace_one(&params, to_save.clone())
            .map_err(|e| self.write_failed(e))?;
        info!(
            event = %Event::RecordReplaced,
            model = self.model(),
            matched = ack.matched,
            modified = ack.modified,
            "record replaced"
        );

        if routes.return_shallow {
            return Ok(WriteResult::Shallow(ack));
        }
        self.reload(request, &to_save).map(WriteResult::Record)
    }

    /// Deletes the record addressed by the path parameters
    ///
    /// Returns the deleted record (with the path parameter fields) only when
    /// the route is configured to return it.
    pub fn delete_one(&self, request: &CrudRequest) -> CrudResult<Option<Value>> {
        let params = request.params_object();
        let deleted = self
            .store
            .find_one_and_delete(&params)
            .map_err(|e| self.write_failed(e))?;
        info!(
            event = %Event::RecordDeleted,
            model = self.model(),
            deleted = deleted.is_some(),
            "delete executed"
        );

        if !self.options.routes.delete_one.return_deleted {
            return Ok(None);
        }
        match deleted {
            Some(Value::Object(record)) => Ok(Some(Value::Object(overlay(record, &params)))),
            Some(other) => Ok(Some(other)),
            None => Err(self.rejected(CrudError::not_found(self.model()))),
        }
    }

    fn payload(&self, dto: Value) -> CrudResult<Map<String, Value>> {
        match dto {
            Value::Object(object) => Ok(object),
            _ => Err(self.rejected(CrudError::bad_request(EMPTY_PAYLOAD))),
        }
    }

    /// Reloads the written record with params filter values taken from
    /// what was saved
    fn reload(&self, request: &CrudRequest, saved: &Map<String, Value>) -> CrudResult<Value> {
        let mut request = request.clone();
        for condition in &mut request.parsed.params_filter {
            if let Some(value) = saved.get(&condition.field) {
                condition.value = value.clone();
            }
        }
        self.get_one(&request)
    }
}

/// Forces path parameter fields onto a create payload
///
/// `None` when the payload is not an object or ends up with no fields.
fn prepare_record(dto: Value, params: &EqualityFilter) -> Option<Map<String, Value>> {
    let record = match dto {
        Value::Object(object) => overlay(object, params),
        _ => return None,
    };
    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}

/// `base` with every field of `top` written over it
fn overlay(mut base: Map<String, Value>, top: &Map<String, Value>) -> Map<String, Value> {
    for (field, value) in top {
        if field.contains('.') {
            set_path(&mut base, field, value.clone());
        } else {
            base.insert(field.clone(), value.clone());
        }
    }
    base
}
