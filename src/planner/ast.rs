//! Compiled filter AST
//!
//! A compiled filter is a tree of `Condition`s. Leaves pair a field with a
//! store-native comparison `Fragment`; inner nodes are explicit AND/OR
//! groups, so no operator precedence is left to the store.

use serde_json::Value;

/// Store-native comparison for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Literal equality
    Eq(Value),
    /// Not equal
    Ne(Value),
    Gt(Value),
    Lt(Value),
    Gte(Value),
    Lte(Value),
    /// Regular expression built from an escaped literal
    Pattern(String),
    /// Negated `Pattern`
    NotPattern(String),
    /// Membership in a non-empty list
    In(Vec<Value>),
    /// Non-membership in a non-empty list
    NotIn(Vec<Value>),
    /// Equality to null (or absence)
    IsNull,
    /// Negated equality to null
    NotNull,
    /// `lower <= v < upper`
    Range { lower: Value, upper: Value },
    /// Unrecognized operator: the value is passed through unchanged
    Literal(Value),
}

/// A field paired with a comparison fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub fragment: Fragment,
}

impl Predicate {
    pub fn new(field: impl Into<String>, fragment: Fragment) -> Self {
        Self {
            field: field.into(),
            fragment,
        }
    }
}

/// Boolean context a contribution is attached under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    And,
    Or,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::And => "AND",
            Context::Or => "OR",
        }
    }
}

/// Compiled filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Leaf(Predicate),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Leaf condition
    pub fn leaf(field: impl Into<String>, fragment: Fragment) -> Self {
        Condition::Leaf(Predicate::new(field, fragment))
    }

    /// Group tagged with the given context
    pub fn group(context: Context, items: Vec<Condition>) -> Self {
        match context {
            Context::And => Condition::And(items),
            Context::Or => Condition::Or(items),
        }
    }

    /// Conjunction of the given conditions; a single item is returned bare
    pub fn all(mut items: Vec<Condition>) -> Option<Condition> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Condition::And(items)),
        }
    }

    /// Disjunction of the given conditions; a single item is returned bare
    pub fn any(mut items: Vec<Condition>) -> Option<Condition> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Condition::Or(items)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Condition::Leaf(_))
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Condition::Leaf(_) => 1,
            Condition::And(items) | Condition::Or(items) => {
                items.iter().map(Condition::leaf_count).sum()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_unwraps_single_item() {
        let leaf = Condition::leaf("a", Fragment::Eq(json!(1)));
        assert_eq!(Condition::all(vec![leaf.clone()]), Some(leaf.clone()));
        assert_eq!(Condition::all(vec![]), None);

        let both = Condition::all(vec![leaf.clone(), leaf.clone()]).unwrap();
        assert!(matches!(both, Condition::And(ref items) if items.len() == 2));
    }

    #[test]
    fn test_group_follows_context() {
        let leaf = Condition::leaf("a", Fragment::IsNull);
        assert!(matches!(
            Condition::group(Context::Or, vec![leaf.clone()]),
            Condition::Or(_)
        ));
        assert!(matches!(
            Condition::group(Context::And, vec![leaf]),
            Condition::And(_)
        ));
    }

    #[test]
    fn test_leaf_count() {
        let tree = Condition::And(vec![
            Condition::leaf("a", Fragment::IsNull),
            Condition::Or(vec![
                Condition::leaf("b", Fragment::NotNull),
                Condition::leaf("c", Fragment::Gt(json!(1))),
            ]),
        ]);
        assert_eq!(tree.leaf_count(), 3);
        assert!(!tree.is_leaf());
    }
}
