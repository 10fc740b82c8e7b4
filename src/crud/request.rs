//! CRUD request: parsed parameters plus path parameter mapping

use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::config::{ParamOption, ParamType};
use crate::executor::EqualityFilter;
use crate::request::{FlatCondition, Operator, ParsedRequestParams};

use super::errors::{CrudError, CrudResult};

/// One CRUD call's request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrudRequest {
    pub parsed: ParsedRequestParams,
}

impl CrudRequest {
    pub fn new(parsed: ParsedRequestParams) -> Self {
        Self { parsed }
    }

    /// Adds an equality params filter for every configured path parameter
    /// present in `values`. Parameters without a mapping are ignored.
    pub fn with_path_params<'v>(
        mut self,
        options: &[ParamOption],
        values: impl IntoIterator<Item = (&'v str, &'v str)>,
    ) -> CrudResult<Self> {
        for (name, raw) in values {
            let option = match options.iter().find(|o| o.name == name) {
                Some(option) => option,
                None => continue,
            };
            let value = parse_param(option, raw)?;
            self.parsed
                .params_filter
                .push(FlatCondition::eq(option.field.clone(), value));
        }
        Ok(self)
    }

    /// Params filter as a field/value object
    ///
    /// Only equality leaves contribute; they are what path parameters
    /// produce and what writes force onto records.
    pub fn params_object(&self) -> EqualityFilter {
        let mut object = Map::new();
        for condition in &self.parsed.params_filter {
            if condition.operator == Operator::Eq {
                object.insert(condition.field.clone(), condition.value.clone());
            }
        }
        object
    }
}

fn parse_param(option: &ParamOption, raw: &str) -> CrudResult<Value> {
    let invalid = |expected: &str| {
        CrudError::bad_request(format!(
            "Invalid param {}. {} expected",
            option.name, expected
        ))
    };

    match option.param_type {
        ParamType::String => Ok(Value::String(raw.to_string())),
        ParamType::Uuid => Uuid::parse_str(raw)
            .map(|id| Value::String(id.to_string()))
            .map_err(|_| invalid("UUID string")),
        ParamType::Number => {
            if let Ok(n) = raw.parse::<i64>() {
                return Ok(Value::from(n));
            }
            raw.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid("Number"))
        }
    }
}
