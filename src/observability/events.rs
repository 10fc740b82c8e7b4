//! Observable events
//!
//! Every log record emitted by the crate carries an `event` field drawn
//! from this closed vocabulary.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Resource configuration loaded
    ConfigLoaded,
    /// Model registered
    ModelRegistered,

    // Planning
    /// Query plan constructed
    PlanBuilt,
    /// Request rejected by the planner or handler validation
    ValidationRejected,

    // Reads
    /// Primary query executed
    QueryExecuted,
    /// Unbounded count query issued after a full window
    CountQueryIssued,
    /// Single-record lookup matched nothing
    RecordNotFound,

    // Writes
    /// Records inserted
    RecordsCreated,
    /// Record updated or upserted
    RecordUpdated,
    /// Record replaced
    RecordReplaced,
    /// Record deleted
    RecordDeleted,
    /// Store rejected a write
    WriteFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ModelRegistered => "MODEL_REGISTERED",
            Event::PlanBuilt => "PLAN_BUILT",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::CountQueryIssued => "COUNT_QUERY_ISSUED",
            Event::RecordNotFound => "RECORD_NOT_FOUND",
            Event::RecordsCreated => "RECORDS_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordReplaced => "RECORD_REPLACED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::WriteFailed => "WRITE_FAILED",
        }
    }

    /// True for events describing a rejected request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::ValidationRejected | Event::RecordNotFound)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::ModelRegistered,
            Event::PlanBuilt,
            Event::ValidationRejected,
            Event::QueryExecuted,
            Event::CountQueryIssued,
            Event::RecordNotFound,
            Event::RecordsCreated,
            Event::RecordUpdated,
            Event::RecordReplaced,
            Event::RecordDeleted,
            Event::WriteFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejection_events() {
        assert!(Event::ValidationRejected.is_rejection());
        assert!(Event::RecordNotFound.is_rejection());
        assert!(!Event::PlanBuilt.is_rejection());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::CountQueryIssued), "COUNT_QUERY_ISSUED");
    }
}
