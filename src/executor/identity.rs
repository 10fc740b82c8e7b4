//! Identity generation
//!
//! One generator per registered model, owned by the store. Sequence
//! generators start at a configured value and can be reset; explicitly
//! supplied numeric identities advance the counter past themselves.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use uuid::Uuid;

use crate::schema::IdentityKind;

/// Produces identities for new records
#[derive(Debug)]
pub struct IdGenerator {
    kind: IdentityKind,
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new(kind: IdentityKind) -> Self {
        let start = match kind {
            IdentityKind::Sequence { start } => start,
            IdentityKind::Uuid => 0,
        };
        Self {
            kind,
            next: AtomicU64::new(start),
        }
    }

    pub fn sequence(start: u64) -> Self {
        Self::new(IdentityKind::Sequence { start })
    }

    pub fn uuid() -> Self {
        Self::new(IdentityKind::Uuid)
    }

    pub fn next_id(&self) -> Value {
        match self.kind {
            IdentityKind::Sequence { .. } => Value::from(self.next.fetch_add(1, Ordering::SeqCst)),
            IdentityKind::Uuid => Value::String(Uuid::new_v4().to_string()),
        }
    }

    /// Records an explicitly supplied identity
    pub fn observe(&self, id: &Value) {
        if let (IdentityKind::Sequence { .. }, Some(n)) = (&self.kind, id.as_u64()) {
            self.next.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
    }

    /// Restarts a sequence at its configured start
    pub fn reset(&self) {
        if let IdentityKind::Sequence { start } = self.kind {
            self.next.store(start, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_counts_from_start() {
        let ids = IdGenerator::sequence(1000);
        assert_eq!(ids.next_id(), json!(1000));
        assert_eq!(ids.next_id(), json!(1001));

        ids.reset();
        assert_eq!(ids.next_id(), json!(1000));
    }

    #[test]
    fn test_observe_skips_past_explicit_ids() {
        let ids = IdGenerator::sequence(1);
        ids.observe(&json!(41));
        assert_eq!(ids.next_id(), json!(42));

        ids.observe(&json!(5));
        assert_eq!(ids.next_id(), json!(43));

        ids.observe(&json!("not a number"));
        assert_eq!(ids.next_id(), json!(44));
    }

    #[test]
    fn test_uuid_ids_are_unique_strings() {
        let ids = IdGenerator::uuid();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a.is_string());
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str().unwrap()).is_ok());
    }
}
