//! Parsed request parameter types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::search::SearchNode;

/// Comparison operators understood by the operator mapper.
///
/// Spellings are accepted with or without a leading `$`. Anything else is
/// kept verbatim in `Other` and mapped to a pass-through literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Starts,
    Ends,
    Cont,
    Excl,
    In,
    NotIn,
    IsNull,
    NotNull,
    Between,
    Other(String),
}

impl Operator {
    /// Parse an operator name, tolerating a single `$` prefix
    pub fn parse(name: &str) -> Self {
        let bare = name.strip_prefix('$').unwrap_or(name);
        match bare {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "gt" => Operator::Gt,
            "lt" => Operator::Lt,
            "gte" => Operator::Gte,
            "lte" => Operator::Lte,
            "starts" => Operator::Starts,
            "ends" => Operator::Ends,
            "cont" => Operator::Cont,
            "excl" => Operator::Excl,
            "in" => Operator::In,
            "notin" => Operator::NotIn,
            "isnull" => Operator::IsNull,
            "notnull" => Operator::NotNull,
            "between" => Operator::Between,
            _ => Operator::Other(name.to_string()),
        }
    }

    /// Canonical (bare) operator name
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Starts => "starts",
            Operator::Ends => "ends",
            Operator::Cont => "cont",
            Operator::Excl => "excl",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::IsNull => "isnull",
            Operator::NotNull => "notnull",
            Operator::Between => "between",
            Operator::Other(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::parse(&name)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An irreducible `{field, operator, value}` filter term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCondition {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
}

impl FlatCondition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality condition
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Eq, value)
    }
}

/// Sort order as emitted by the request layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

/// Caller-requested sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySort {
    pub field: String,
    pub order: SortOrder,
}

impl QuerySort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Caller-requested relation populate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryJoin {
    pub field: String,
    #[serde(default)]
    pub select: Option<Vec<String>>,
}

impl QueryJoin {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            select: None,
        }
    }

    pub fn with_select(mut self, fields: Vec<String>) -> Self {
        self.select = Some(fields);
        self
    }
}

/// Normalized request parameters, immutable for the lifetime of a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedRequestParams {
    /// Requested projection (empty = all allowed fields)
    pub fields: Vec<String>,

    /// Route path parameter filters; always conjunctive
    pub params_filter: Vec<FlatCondition>,

    /// Ad hoc conjunctive filters
    pub filter: Vec<FlatCondition>,

    /// Ad hoc disjunctive filters
    pub or: Vec<FlatCondition>,

    /// Nested boolean search tree
    pub search: Option<SearchNode>,

    pub join: Vec<QueryJoin>,

    pub sort: Vec<QuerySort>,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    pub page: Option<u64>,
}

impl ParsedRequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_params_filter(mut self, condition: FlatCondition) -> Self {
        self.params_filter.push(condition);
        self
    }

    pub fn with_filter(mut self, condition: FlatCondition) -> Self {
        self.filter.push(condition);
        self
    }

    pub fn with_or(mut self, condition: FlatCondition) -> Self {
        self.or.push(condition);
        self
    }

    pub fn with_search(mut self, search: SearchNode) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_join(mut self, join: QueryJoin) -> Self {
        self.join.push(join);
        self
    }

    pub fn with_sort(mut self, sort: QuerySort) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_parse_with_and_without_prefix() {
        assert_eq!(Operator::parse("eq"), Operator::Eq);
        assert_eq!(Operator::parse("$eq"), Operator::Eq);
        assert_eq!(Operator::parse("$notin"), Operator::NotIn);
        assert_eq!(Operator::parse("between"), Operator::Between);
    }

    #[test]
    fn test_unknown_operator_kept_verbatim() {
        let op = Operator::parse("$regex");
        assert_eq!(op, Operator::Other("$regex".to_string()));
        assert_eq!(op.as_str(), "$regex");
    }

    #[test]
    fn test_params_deserialize_camel_case() {
        let params: ParsedRequestParams = serde_json::from_value(json!({
            "fields": ["name"],
            "paramsFilter": [{"field": "companyId", "operator": "eq", "value": 1}],
            "filter": [{"field": "age", "operator": "$gt", "value": 18}],
            "sort": [{"field": "_id", "order": "DESC"}],
            "limit": 3,
            "page": 1
        }))
        .unwrap();

        assert_eq!(params.fields, vec!["name"]);
        assert_eq!(params.params_filter[0].operator, Operator::Eq);
        assert_eq!(params.filter[0].operator, Operator::Gt);
        assert_eq!(params.sort[0].order, SortOrder::Desc);
        assert_eq!(params.limit, Some(3));
        assert_eq!(params.page, Some(1));
        assert!(params.offset.is_none());
        assert!(params.search.is_none());
    }

    #[test]
    fn test_condition_value_defaults_to_null() {
        let cond: FlatCondition =
            serde_json::from_value(json!({"field": "deletedAt", "operator": "isnull"})).unwrap();
        assert_eq!(cond.operator, Operator::IsNull);
        assert!(cond.value.is_null());
    }
}
