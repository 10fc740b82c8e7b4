//! # CRUD Handlers
//!
//! getMany, getOne, createOne, createMany, updateOne, replaceOne and
//! deleteOne over any `DocumentStore`.
//!
//! - `CrudRequest`: parsed parameters plus path parameter mapping
//! - `CrudService`: the handlers
//! - `GetManyResponse` / `WriteResult`: response shapes
//! - `CrudError`: BadRequest, NotFound, validation and store faults

mod errors;
mod request;
mod response;
mod service;

pub use errors::{CrudError, CrudResult, ErrorResponse};
pub use request::CrudRequest;
pub use response::{GetManyResponse, PageInfo, WriteResult};
pub use service::CrudService;
