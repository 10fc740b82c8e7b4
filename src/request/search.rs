//! Search tree representation
//!
//! A search node is a JSON object whose keys are either field names or one of
//! `$and`/`$or`. Field values are literals (including `null`) or operator
//! objects. Operator objects may carry a `$or` key holding alternatives for
//! the same field, either as an array of operator objects or as an object
//! whose keys are alternative operators.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::params::{FlatCondition, Operator};
use crate::planner::{PlannerError, PlannerResult};

const AND_KEY: &str = "$and";
const OR_KEY: &str = "$or";

/// A node of the search tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchNode {
    and: Option<Vec<SearchNode>>,
    or: Option<Vec<SearchNode>>,
    fields: Vec<(String, FieldValue)>,
}

/// Value attached to a field key
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Scalar, array or `null` literal
    Literal(Value),
    /// Operator object
    Operators(OperatorObject),
}

/// Operator object for a single field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorObject {
    operators: Vec<(Operator, Value)>,
    or: Option<Vec<FieldValue>>,
}

impl SearchNode {
    /// Conjunction of child nodes
    pub fn and(children: Vec<SearchNode>) -> Self {
        Self {
            and: Some(children),
            ..Default::default()
        }
    }

    /// Disjunction of child nodes
    pub fn or(children: Vec<SearchNode>) -> Self {
        Self {
            or: Some(children),
            ..Default::default()
        }
    }

    /// Node with a single field key
    pub fn field(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            fields: vec![(name.into(), value)],
            ..Default::default()
        }
    }

    /// Add a field key
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Attach a `$or` array next to the existing keys
    pub fn with_or(mut self, children: Vec<SearchNode>) -> Self {
        self.or = Some(children);
        self
    }

    /// Attach a `$and` array next to the existing keys
    pub fn with_and(mut self, children: Vec<SearchNode>) -> Self {
        self.and = Some(children);
        self
    }

    /// `{field: {operator: value}}`
    pub fn from_condition(condition: &FlatCondition) -> Self {
        Self::field(
            condition.field.clone(),
            FieldValue::Operators(OperatorObject::single(
                condition.operator.clone(),
                condition.value.clone(),
            )),
        )
    }

    /// Parse a search tree from JSON
    pub fn from_value(value: &Value) -> PlannerResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| PlannerError::invalid_search("search node must be an object"))?;

        let mut node = SearchNode::default();
        for (key, value) in object {
            match key.as_str() {
                AND_KEY => node.and = Some(Self::parse_children(AND_KEY, value)?),
                OR_KEY => node.or = Some(Self::parse_children(OR_KEY, value)?),
                field => node.fields.push((field.to_string(), FieldValue::from_value(value)?)),
            }
        }
        Ok(node)
    }

    fn parse_children(key: &str, value: &Value) -> PlannerResult<Vec<SearchNode>> {
        let items = value
            .as_array()
            .ok_or_else(|| PlannerError::invalid_search(format!("'{}' must be an array", key)))?;
        items.iter().map(Self::from_value).collect()
    }

    /// True when the node has no keys at all
    pub fn is_empty(&self) -> bool {
        self.and.is_none() && self.or.is_none() && self.fields.is_empty()
    }

    /// Non-empty `$and` children
    pub fn and_children(&self) -> Option<&[SearchNode]> {
        self.and.as_deref().filter(|c| !c.is_empty())
    }

    /// Non-empty `$or` children
    pub fn or_children(&self) -> Option<&[SearchNode]> {
        self.or.as_deref().filter(|c| !c.is_empty())
    }

    /// Number of keys present, `$and`/`$or` included even when empty
    pub fn key_count(&self) -> usize {
        usize::from(self.and.is_some()) + usize::from(self.or.is_some()) + self.fields.len()
    }

    /// Plain field keys in insertion order. Nodes parsed from JSON list
    /// them sorted by name, since `serde_json::Map` iterates sorted.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Render back to JSON
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Some(and) = &self.and {
            object.insert(
                AND_KEY.to_string(),
                Value::Array(and.iter().map(SearchNode::to_value).collect()),
            );
        }
        if let Some(or) = &self.or {
            object.insert(
                OR_KEY.to_string(),
                Value::Array(or.iter().map(SearchNode::to_value).collect()),
            );
        }
        for (field, value) in &self.fields {
            object.insert(field.clone(), value.to_value());
        }
        Value::Object(object)
    }
}

impl FieldValue {
    pub fn literal(value: Value) -> Self {
        FieldValue::Literal(value)
    }

    pub fn operator(operator: Operator, value: Value) -> Self {
        FieldValue::Operators(OperatorObject::single(operator, value))
    }

    fn from_value(value: &Value) -> PlannerResult<Self> {
        match value {
            Value::Object(map) => Ok(FieldValue::Operators(OperatorObject::from_map(map)?)),
            other => Ok(FieldValue::Literal(other.clone())),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            FieldValue::Literal(value) => value.clone(),
            FieldValue::Operators(object) => object.to_value(),
        }
    }
}

impl OperatorObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{operator: value}`
    pub fn single(operator: Operator, value: Value) -> Self {
        Self {
            operators: vec![(operator, value)],
            or: None,
        }
    }

    pub fn with_operator(mut self, operator: Operator, value: Value) -> Self {
        self.operators.push((operator, value));
        self
    }

    /// Alternatives for the same field
    pub fn with_or(mut self, alternatives: Vec<FieldValue>) -> Self {
        self.or = Some(alternatives);
        self
    }

    pub fn operators(&self) -> &[(Operator, Value)] {
        &self.operators
    }

    /// `$or` alternatives, if present and non-empty
    pub fn or_alternatives(&self) -> Option<&[FieldValue]> {
        self.or.as_deref().filter(|alts| !alts.is_empty())
    }

    /// Number of keys, counting `$or` as one
    pub fn key_count(&self) -> usize {
        self.operators.len() + usize::from(self.or.is_some())
    }

    fn from_map(map: &Map<String, Value>) -> PlannerResult<Self> {
        let mut object = OperatorObject::default();
        for (key, value) in map {
            if key == OR_KEY {
                object.or = Some(Self::parse_alternatives(value)?);
            } else {
                object.operators.push((Operator::parse(key), value.clone()));
            }
        }
        Ok(object)
    }

    fn parse_alternatives(value: &Value) -> PlannerResult<Vec<FieldValue>> {
        match value {
            Value::Array(items) => items.iter().map(FieldValue::from_value).collect(),
            Value::Object(map) => Ok(map
                .iter()
                .map(|(op, v)| FieldValue::operator(Operator::parse(op), v.clone()))
                .collect()),
            _ => Err(PlannerError::invalid_search(
                "field-level '$or' must be an array or an object",
            )),
        }
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        for (operator, value) in &self.operators {
            object.insert(operator.as_str().to_string(), value.clone());
        }
        if let Some(alternatives) = &self.or {
            object.insert(
                OR_KEY.to_string(),
                Value::Array(alternatives.iter().map(FieldValue::to_value).collect()),
            );
        }
        Value::Object(object)
    }
}

impl Serialize for SearchNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SearchNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SearchNode::from_value(&value).map_err(D::Error::custom)
    }
}
