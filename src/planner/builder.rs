//! Query plan construction
//!
//! Builds an immutable `QueryPlan` from request parameters, resource options
//! and the model descriptor. Two filter channels are combined at the root
//! as a conjunction:
//!
//! - search channel: the caller's search tree, or when absent a default
//!   `$and` of the configured filter and the params filter;
//! - legacy channel: the ad hoc `filter`/`or` lists, always applied.
//!
//! With a search tree the params filter reaches the root only through the
//! legacy channel, where a single `or` leaf can pair with it as an OR.

use tracing::debug;

use crate::config::QueryOptions;
use crate::observability::Event;
use crate::request::{FlatCondition, ParsedRequestParams, QuerySort, SearchNode};
use crate::schema::ModelDescriptor;

use super::ast::Condition;
use super::compiler::SearchConditionCompiler;
use super::errors::PlannerResult;
use super::operators::OperatorMapper;
use super::pagination::PaginationPlanner;
use super::plan::{PopulateSpec, QueryPlan};
use super::projection::{FieldRules, Projection};

/// Builds query plans for one model and resource configuration
pub struct QueryPlanBuilder<'a> {
    descriptor: &'a ModelDescriptor,
    options: &'a QueryOptions,
}

impl<'a> QueryPlanBuilder<'a> {
    pub fn new(descriptor: &'a ModelDescriptor, options: &'a QueryOptions) -> Self {
        Self {
            descriptor,
            options,
        }
    }

    /// Plan for a multi-record query
    pub fn build_many(&self, parsed: &ParsedRequestParams) -> PlannerResult<QueryPlan> {
        self.build(parsed, true)
    }

    /// Plan for a single-record lookup (no sort, skip or limit)
    pub fn build_one(&self, parsed: &ParsedRequestParams) -> PlannerResult<QueryPlan> {
        self.build(parsed, false)
    }

    pub fn build(&self, parsed: &ParsedRequestParams, many: bool) -> PlannerResult<QueryPlan> {
        let filter = self.filter(parsed)?;

        let (sort, limit, skip, paginated) = if many {
            let limit = PaginationPlanner::resolve_limit(parsed, self.options);
            (
                self.sort(parsed),
                limit,
                PaginationPlanner::resolve_skip(parsed, limit),
                PaginationPlanner::is_paginated(parsed, self.options),
            )
        } else {
            (Vec::new(), None, None, false)
        };

        let plan = QueryPlan {
            projection: self.projection(parsed),
            filter,
            populate: self.populate(parsed),
            sort,
            skip,
            limit,
            paginated,
        };

        debug!(
            event = %Event::PlanBuilt,
            model = self.descriptor.name(),
            many,
            paginated = plan.paginated,
            skip = plan.skip,
            limit = plan.limit,
            populate = plan.populate.len(),
            "query plan built"
        );

        Ok(plan)
    }

    pub fn projection(&self, parsed: &ParsedRequestParams) -> Projection {
        Projection::resolve(
            self.descriptor.fields(),
            &parsed.fields,
            FieldRules::from(self.options),
            self.descriptor.identity(),
        )
    }

    /// Root filter: search channel AND legacy channel
    pub fn filter(&self, parsed: &ParsedRequestParams) -> PlannerResult<Option<Condition>> {
        let mut conjuncts = Vec::new();
        if let Some(search) = self.search_channel(parsed)? {
            conjuncts.push(search);
        }
        conjuncts.extend(self.legacy_channel(parsed)?);
        Ok(Condition::all(conjuncts))
    }

    fn search_channel(&self, parsed: &ParsedRequestParams) -> PlannerResult<Option<Condition>> {
        let node = match &parsed.search {
            None => SearchNode::and(
                self.options
                    .filter
                    .iter()
                    .chain(&parsed.params_filter)
                    .map(SearchNode::from_condition)
                    .collect(),
            ),
            Some(search) => search.clone(),
        };
        SearchConditionCompiler::compile(&node)
    }

    /// Conjuncts contributed by the ad hoc `filter`/`or` lists.
    ///
    /// | filters | or | contribution |
    /// |---|---|---|
    /// | 1 | 1 | `f0 OR o0` |
    /// | 1 | N | `f0`, `(o0 OR ..)` |
    /// | N | 1 | `o0`, `(f0 AND ..)` |
    /// | N | N | `(f0 AND ..)`, `(o0 OR ..)` |
    /// | N | 0 | `f0`, `f1`, .. |
    /// | 0 | N | `(o0 OR ..)` |
    fn legacy_channel(&self, parsed: &ParsedRequestParams) -> PlannerResult<Vec<Condition>> {
        let filters = Self::leaves(parsed.params_filter.iter().chain(&parsed.filter))?;
        let mut ors = Self::leaves(parsed.or.iter())?;

        let conjuncts = match (filters.len(), ors.len()) {
            (0, 0) => Vec::new(),
            (_, 0) => filters,
            (0, _) => Condition::any(ors).into_iter().collect(),
            (1, 1) => {
                let mut pair = filters;
                pair.append(&mut ors);
                vec![Condition::Or(pair)]
            }
            (1, _) => {
                let mut conjuncts = filters;
                conjuncts.push(Condition::Or(ors));
                conjuncts
            }
            (_, 1) => {
                let mut conjuncts = ors;
                conjuncts.push(Condition::And(filters));
                conjuncts
            }
            _ => vec![Condition::And(filters), Condition::Or(ors)],
        };
        Ok(conjuncts)
    }

    fn leaves<'c>(
        conditions: impl Iterator<Item = &'c FlatCondition>,
    ) -> PlannerResult<Vec<Condition>> {
        conditions
            .map(|c| OperatorMapper::predicate(c).map(Condition::Leaf))
            .collect()
    }

    /// Eager joins first (with the caller's select if the caller also asked
    /// for them), then the remaining requested joins. Joins that are not
    /// declared, or whose path is not a model reference, are ignored.
    pub fn populate(&self, parsed: &ParsedRequestParams) -> Vec<PopulateSpec> {
        let mut populate: Vec<PopulateSpec> = Vec::new();

        for (field, option) in &self.options.join {
            if !option.eager {
                continue;
            }
            let select = parsed
                .join
                .iter()
                .find(|j| &j.field == field)
                .and_then(|j| j.select.clone())
                .unwrap_or_default();
            if let Some(spec) = self.populate_spec(field, select) {
                populate.push(spec);
            }
        }

        for join in &parsed.join {
            if populate.iter().any(|p| p.path == join.field) {
                continue;
            }
            let select = join.select.clone().unwrap_or_default();
            if let Some(spec) = self.populate_spec(&join.field, select) {
                populate.push(spec);
            }
        }

        populate
    }

    fn populate_spec(&self, field: &str, select: Vec<String>) -> Option<PopulateSpec> {
        let option = self.options.join.get(field)?;
        let model = self.descriptor.reference(field)?;
        Some(PopulateSpec {
            path: field.to_string(),
            model: model.to_string(),
            select,
            option: option.clone(),
        })
    }

    fn sort(&self, parsed: &ParsedRequestParams) -> Vec<QuerySort> {
        if parsed.sort.is_empty() {
            self.options.sort.clone()
        } else {
            parsed.sort.clone()
        }
    }
}
