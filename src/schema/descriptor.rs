//! Model descriptor
//!
//! The read-only field/reference summary of a model, computed once at
//! registration time and shared as `Arc<ModelDescriptor>`. The planner uses
//! it to resolve projections and to decide which joins are populatable.

use std::collections::BTreeMap;

use super::types::{FieldDef, FieldType, IdentityKind, ModelSchema};

/// Name of the identity field on every model
pub const IDENTITY_FIELD: &str = "_id";

/// Immutable summary of a registered model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    name: String,
    identity: IdentityKind,
    /// Identity first, then leaf paths in schema order
    fields: Vec<String>,
    /// Reference path -> target model
    references: BTreeMap<String, String>,
    unique: Vec<String>,
    required: Vec<String>,
}

impl ModelDescriptor {
    /// Computes the descriptor of a schema.
    ///
    /// Sub-document fields contribute their dotted leaf paths
    /// (`name.first`), never the container path itself.
    pub fn from_schema(schema: &ModelSchema) -> Self {
        let mut descriptor = Self {
            name: schema.name.clone(),
            identity: schema.identity.clone(),
            fields: vec![IDENTITY_FIELD.to_string()],
            references: BTreeMap::new(),
            unique: Vec::new(),
            required: Vec::new(),
        };
        descriptor.collect(&schema.fields, "");
        descriptor
    }

    fn collect(&mut self, fields: &BTreeMap<String, FieldDef>, prefix: &str) {
        for (name, def) in fields {
            let path = format!("{}{}", prefix, name);
            if path == IDENTITY_FIELD {
                continue;
            }
            if let FieldType::Object { fields } = &def.field_type {
                self.collect(fields, &format!("{}.", path));
                continue;
            }
            if let Some(model) = def.field_type.referenced_model() {
                self.references.insert(path.clone(), model.to_string());
            }
            if def.unique {
                self.unique.push(path.clone());
            }
            if def.required {
                self.required.push(path.clone());
            }
            self.fields.push(path);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &str {
        IDENTITY_FIELD
    }

    pub fn identity_kind(&self) -> &IdentityKind {
        &self.identity
    }

    /// All selectable field paths, identity included
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.fields.iter().any(|f| f == path)
    }

    /// Target model of a reference path
    pub fn reference(&self, path: &str) -> Option<&str> {
        self.references.get(path).map(String::as_str)
    }

    pub fn references(&self) -> &BTreeMap<String, String> {
        &self.references
    }

    pub fn unique_fields(&self) -> &[String] {
        &self.unique
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }
}
