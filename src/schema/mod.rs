//! Model schema subsystem
//!
//! Models are declared once (programmatically or from JSON files) and
//! summarized into an immutable `ModelDescriptor`: selectable field paths,
//! reference fields and their target models, unique fields, identity
//! strategy. Descriptors are never mutated after registration, so they are
//! shared across requests without locking.

mod descriptor;
mod errors;
mod registry;
mod types;

pub use descriptor::{ModelDescriptor, IDENTITY_FIELD};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::ModelRegistry;
pub use types::{FieldDef, FieldType, IdentityKind, ModelSchema};
