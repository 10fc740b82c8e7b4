//! Document path access and projection

use serde_json::{Map, Value};

use crate::planner::Projection;

/// Value at a dotted path
pub fn get_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

/// Sets a dotted path, creating intermediate objects
pub fn set_path(document: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            document.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = document
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                set_path(map, rest, value);
            }
        }
    }
}

/// Keeps only the projected paths of a document
pub fn project(document: &Value, projection: &Projection, identity: &str) -> Value {
    let mut out = Map::new();
    if projection.includes_identity() {
        if let Some(id) = document.get(identity) {
            out.insert(identity.to_string(), id.clone());
        }
    }
    for field in projection.fields() {
        if let Some(value) = get_path(document, field) {
            set_path(&mut out, field, value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::FieldRules;
    use serde_json::json;

    #[test]
    fn test_get_path() {
        let doc = json!({"name": {"first": "Ada"}, "age": 36});
        assert_eq!(get_path(&doc, "name.first"), Some(&json!("Ada")));
        assert_eq!(get_path(&doc, "age"), Some(&json!(36)));
        assert_eq!(get_path(&doc, "name.last"), None);
        assert_eq!(get_path(&doc, "age.value"), None);
    }

    #[test]
    fn test_set_path_creates_objects() {
        let mut doc = Map::new();
        set_path(&mut doc, "name.first", json!("Ada"));
        set_path(&mut doc, "name.last", json!("Lovelace"));
        set_path(&mut doc, "age", json!(36));
        assert_eq!(
            Value::Object(doc),
            json!({"name": {"first": "Ada", "last": "Lovelace"}, "age": 36})
        );
    }

    #[test]
    fn test_project() {
        let available: Vec<String> = ["_id", "name.first", "name.last", "email"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let exclude = vec!["_id".to_string(), "email".to_string()];
        let projection = Projection::resolve(
            &available,
            &[],
            FieldRules {
                allow: &[],
                exclude: &exclude,
                persist: &[],
            },
            "_id",
        );

        let doc = json!({"_id": 1, "name": {"first": "Ada", "last": "L"}, "email": "a@x"});
        assert_eq!(
            project(&doc, &projection, "_id"),
            json!({"name": {"first": "Ada", "last": "L"}})
        );
    }
}
