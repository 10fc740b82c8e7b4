//! Bracket accumulation
//!
//! Collects contributions under one boolean context and emits them as a
//! single parenthesized group.

use super::ast::{Condition, Context};

/// Ordered collector of conditions under an AND or OR context
#[derive(Debug, Clone)]
pub struct BracketAccumulator {
    context: Context,
    items: Vec<Condition>,
}

impl BracketAccumulator {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            items: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(Context::And)
    }

    pub fn or() -> Self {
        Self::new(Context::Or)
    }

    pub fn context(&self) -> Context {
        self.context
    }

    /// Adds a contribution; `None` contributes nothing
    pub fn push(&mut self, contribution: Option<Condition>) {
        if let Some(condition) = contribution {
            self.items.push(condition);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Emits the group, or `None` if nothing was contributed.
    ///
    /// A one-item group is kept as a group.
    pub fn finish(self) -> Option<Condition> {
        if self.items.is_empty() {
            None
        } else {
            Some(Condition::group(self.context, self.items))
        }
    }
}
