//! Model schema declarations
//!
//! Supported field types:
//! - string, number, bool, date (ISO-8601 string)
//! - object: nested sub-document with its own fields
//! - array: homogeneous array with element type
//! - reference: identity of a record in another model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Bool,
    Date,
    /// Nested sub-document
    Object {
        fields: BTreeMap<String, FieldDef>,
    },
    /// Homogeneous array with single element type
    Array {
        #[serde(rename = "element_type")]
        element_type: Box<FieldType>,
    },
    /// Reference to a record of another model
    Reference {
        model: String,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Reference { .. } => "reference",
        }
    }

    /// Target model when this type is a reference or an array of references
    pub fn referenced_model(&self) -> Option<&str> {
        match self {
            FieldType::Reference { model } => Some(model),
            FieldType::Array { element_type } => element_type.referenced_model(),
            _ => None,
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Enforced by stores that support unique constraints
    #[serde(default)]
    pub unique: bool,
}

impl FieldDef {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            unique: false,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn bool() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    pub fn object(fields: BTreeMap<String, FieldDef>) -> Self {
        Self::new(FieldType::Object { fields })
    }

    pub fn array(element_type: FieldType) -> Self {
        Self::new(FieldType::Array {
            element_type: Box::new(element_type),
        })
    }

    pub fn reference(model: impl Into<String>) -> Self {
        Self::new(FieldType::Reference {
            model: model.into(),
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// How the identity field of new records is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum IdentityKind {
    /// Monotonic integer counter
    Sequence {
        #[serde(default = "default_sequence_start")]
        start: u64,
    },
    /// Random v4 UUID string
    Uuid,
}

fn default_sequence_start() -> u64 {
    1
}

impl Default for IdentityKind {
    fn default() -> Self {
        IdentityKind::Sequence {
            start: default_sequence_start(),
        }
    }
}

/// Complete model declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Unique model name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub identity: IdentityKind,
    pub fields: BTreeMap<String, FieldDef>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, FieldDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            identity: IdentityKind::default(),
            fields,
        }
    }

    pub fn with_identity(mut self, identity: IdentityKind) -> Self {
        self.identity = identity;
        self
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Model name must not be empty".into());
        }
        Self::validate_fields(&self.fields, "")
    }

    fn validate_fields(fields: &BTreeMap<String, FieldDef>, prefix: &str) -> Result<(), String> {
        for (name, def) in fields {
            let path = format!("{}{}", prefix, name);
            if name.is_empty() || name.starts_with('$') || name.contains('.') {
                return Err(format!("Invalid field name '{}'", path));
            }
            match &def.field_type {
                FieldType::Object { fields } => {
                    Self::validate_fields(fields, &format!("{}.", path))?;
                }
                other => {
                    if other.referenced_model().map_or(false, str::is_empty) {
                        return Err(format!("Reference field '{}' must name a model", path));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> ModelSchema {
        let mut name = BTreeMap::new();
        name.insert("first".into(), FieldDef::string());
        name.insert("last".into(), FieldDef::string());

        let mut fields = BTreeMap::new();
        fields.insert("email".into(), FieldDef::string().required().unique());
        fields.insert("name".into(), FieldDef::object(name));
        fields.insert("companyId".into(), FieldDef::reference("companies"));
        ModelSchema::new("users", fields)
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(user_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_invalid_field_names_rejected() {
        let mut fields = BTreeMap::new();
        fields.insert("$where".into(), FieldDef::string());
        let err = ModelSchema::new("users", fields).validate_structure().unwrap_err();
        assert!(err.contains("$where"));

        let mut fields = BTreeMap::new();
        fields.insert("a.b".into(), FieldDef::string());
        assert!(ModelSchema::new("users", fields).validate_structure().is_err());
    }

    #[test]
    fn test_reference_must_name_model() {
        let mut fields = BTreeMap::new();
        fields.insert("owner".into(), FieldDef::reference(""));
        let err = ModelSchema::new("pets", fields).validate_structure().unwrap_err();
        assert!(err.contains("owner"));
    }

    #[test]
    fn test_array_of_references() {
        let ty = FieldType::Array {
            element_type: Box::new(FieldType::Reference {
                model: "tags".into(),
            }),
        };
        assert_eq!(ty.referenced_model(), Some("tags"));
        assert_eq!(ty.type_name(), "array");
    }

    #[test]
    fn test_deserialize_from_json() {
        let schema: ModelSchema = serde_json::from_value(json!({
            "name": "companies",
            "identity": {"strategy": "sequence", "start": 1000},
            "fields": {
                "name": {"type": "string", "required": true},
                "domain": {"type": "string", "unique": true},
                "tags": {"type": "array", "element_type": {"type": "string"}}
            }
        }))
        .unwrap();

        assert_eq!(schema.identity, IdentityKind::Sequence { start: 1000 });
        assert!(schema.fields["domain"].unique);
        assert!(!schema.fields["tags"].required);
    }

    #[test]
    fn test_identity_defaults_to_sequence() {
        let schema: ModelSchema =
            serde_json::from_value(json!({"name": "notes", "fields": {}})).unwrap();
        assert_eq!(schema.identity, IdentityKind::Sequence { start: 1 });
    }
}
