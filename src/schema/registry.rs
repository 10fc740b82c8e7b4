//! Model registry
//!
//! Holds one immutable `ModelDescriptor` per registered model. Schemas are
//! registered programmatically or loaded from JSON files; a model name can be
//! registered only once.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::descriptor::ModelDescriptor;
use super::errors::{SchemaError, SchemaResult};
use super::types::ModelSchema;

/// Registry of model descriptors, keyed by model name
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<ModelDescriptor>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema and returns its descriptor.
    pub fn register(&mut self, schema: ModelSchema) -> SchemaResult<Arc<ModelDescriptor>> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;

        if self.models.contains_key(&schema.name) {
            return Err(SchemaError::schema_immutable(&schema.name));
        }

        let descriptor = Arc::new(ModelDescriptor::from_schema(&schema));
        self.models.insert(schema.name.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Loads and registers a single schema file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<ModelDescriptor>> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema: ModelSchema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        self.register(schema)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelDescriptor>> {
        self.models.get(name).cloned()
    }

    /// Like `get`, failing with `CRUD_UNKNOWN_MODEL`
    pub fn require(&self, name: &str) -> SchemaResult<Arc<ModelDescriptor>> {
        self.get(name).ok_or_else(|| SchemaError::unknown_model(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, SchemaErrorCode};
    use std::io::Write;

    fn companies() -> ModelSchema {
        let mut fields = BTreeMap::new();
        fields.insert("name".into(), FieldDef::string().required());
        ModelSchema::new("companies", fields)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ModelRegistry::new();
        let descriptor = registry.register(companies()).unwrap();

        assert_eq!(descriptor.name(), "companies");
        assert!(registry.exists("companies"));
        assert!(Arc::ptr_eq(&descriptor, &registry.get("companies").unwrap()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_twice_rejected() {
        let mut registry = ModelRegistry::new();
        registry.register(companies()).unwrap();

        let err = registry.register(companies()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    }

    #[test]
    fn test_require_unknown_model() {
        let registry = ModelRegistry::new();
        let err = registry.require("ghosts").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownModel);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "users", "fields": {{"email": {{"type": "string", "unique": true}}}}}}"#
        )
        .unwrap();

        let mut registry = ModelRegistry::new();
        let descriptor = registry.load_file(file.path()).unwrap();
        assert_eq!(descriptor.unique_fields(), &["email"]);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let mut registry = ModelRegistry::new();
        let err = registry.load_file(file.path()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.is_fatal());
    }
}
