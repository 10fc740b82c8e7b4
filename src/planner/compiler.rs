//! Search condition compiler
//!
//! Compiles a `SearchNode` tree into a fully parenthesized `Condition`.
//! Compilation is a pure recursive function: each node returns its
//! contribution (or `None`) and the caller attaches it under its own
//! bracket context.
//!
//! # Rules
//!
//! 1. Empty node contributes nothing.
//! 2. Non-empty `$and` wins over everything else at the same level. One
//!    element unwraps to that element; several form an AND group.
//! 3. Otherwise a non-empty `$or`:
//!    - as the only key: one element unwraps, several form an OR group;
//!    - next to other keys (an empty `$and` counts): one AND group holding
//!      the `$or` contribution (unwrapped or as an OR sub-group) followed
//!      by one entry per field.
//! 4. Otherwise field keys: one key is emitted bare, several form an AND
//!    group.
//! 5. Field values: `null` is an `isnull` leaf, other literals are `eq`
//!    leaves, operator objects follow `resolve_operators`.

use super::ast::{Condition, Fragment};
use super::brackets::BracketAccumulator;
use super::errors::PlannerResult;
use super::operators::OperatorMapper;
use crate::request::{FieldValue, OperatorObject, SearchNode};
use serde_json::Value;

/// Recursive search-tree compiler
pub struct SearchConditionCompiler;

impl SearchConditionCompiler {
    /// Compiles a node into its contribution
    pub fn compile(node: &SearchNode) -> PlannerResult<Option<Condition>> {
        if node.is_empty() {
            return Ok(None);
        }

        if let Some(children) = node.and_children() {
            return Self::compile_children(children, BracketAccumulator::and());
        }

        if let Some(children) = node.or_children() {
            if node.key_count() == 1 {
                return Self::compile_children(children, BracketAccumulator::or());
            }

            let mut bracket = BracketAccumulator::and();
            bracket.push(Self::compile_children(children, BracketAccumulator::or())?);
            for (field, value) in node.fields() {
                bracket.push(Self::resolve_field(field, value)?);
            }
            return Ok(bracket.finish());
        }

        match node.fields() {
            [] => Ok(None),
            [(field, value)] => Self::resolve_field(field, value),
            fields => {
                let mut bracket = BracketAccumulator::and();
                for (field, value) in fields {
                    bracket.push(Self::resolve_field(field, value)?);
                }
                Ok(bracket.finish())
            }
        }
    }

    /// One child unwraps to its own contribution; several fill `bracket`
    fn compile_children(
        children: &[SearchNode],
        mut bracket: BracketAccumulator,
    ) -> PlannerResult<Option<Condition>> {
        if let [only] = children {
            return Self::compile(only);
        }
        for child in children {
            bracket.push(Self::compile(child)?);
        }
        Ok(bracket.finish())
    }

    /// Resolves the value attached to a field key
    pub fn resolve_field(field: &str, value: &FieldValue) -> PlannerResult<Option<Condition>> {
        match value {
            FieldValue::Literal(Value::Null) => Ok(Some(Condition::leaf(field, Fragment::IsNull))),
            FieldValue::Literal(literal) => {
                Ok(Some(Condition::leaf(field, Fragment::Eq(literal.clone()))))
            }
            FieldValue::Operators(object) => Self::resolve_operators(field, object),
        }
    }

    /// Operator object on one field.
    ///
    /// A single operator is a bare leaf. A lone `$or` yields its alternatives
    /// (unwrapped when there is one, else an OR group). Several keys form an
    /// AND group with one leaf per operator and the `$or` alternatives
    /// nested the same way.
    fn resolve_operators(field: &str, object: &OperatorObject) -> PlannerResult<Option<Condition>> {
        if object.key_count() == 0 {
            return Ok(None);
        }

        if let [(operator, value)] = object.operators() {
            if object.or_alternatives().is_none() {
                let fragment = OperatorMapper::map(field, operator, value)?;
                return Ok(Some(Condition::leaf(field, fragment)));
            }
        }

        if object.operators().is_empty() {
            return Self::resolve_alternatives(field, object);
        }

        let mut bracket = BracketAccumulator::and();
        for (operator, value) in object.operators() {
            let fragment = OperatorMapper::map(field, operator, value)?;
            bracket.push(Some(Condition::leaf(field, fragment)));
        }
        bracket.push(Self::resolve_alternatives(field, object)?);
        Ok(bracket.finish())
    }

    fn resolve_alternatives(
        field: &str,
        object: &OperatorObject,
    ) -> PlannerResult<Option<Condition>> {
        let alternatives = match object.or_alternatives() {
            Some(alternatives) => alternatives,
            None => return Ok(None),
        };

        if let [only] = alternatives {
            return Self::resolve_field(field, only);
        }

        let mut bracket = BracketAccumulator::or();
        for alternative in alternatives {
            bracket.push(Self::resolve_field(field, alternative)?);
        }
        Ok(bracket.finish())
    }
}
