//! # Escalation History
//!
//! One row per escalation event on a case. Rows accumulate over a case's
//! life, ordered by `escalation_date`; a row without `resolved_at` means
//! "this case is currently escalated at this level".

use serde::{Deserialize, Serialize};

use vigil_core::{Assignee, CaseId, CasePriority, EscalationId, Timestamp};

use crate::rule::EscalationLevel;

/// One escalation event on a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationHistory {
    /// Unique row identifier.
    pub id: EscalationId,
    /// The escalated case.
    pub case_id: CaseId,
    /// The level reached by this escalation.
    pub escalation_level: EscalationLevel,
    /// Why the case was escalated.
    pub reason: String,
    /// Case priority before the escalation.
    pub previous_priority: CasePriority,
    /// Case priority after the escalation.
    pub new_priority: CasePriority,
    /// Assignee before the escalation.
    pub previous_assignee: Option<Assignee>,
    /// Assignee after the escalation.
    pub new_assignee: Option<Assignee>,
    /// The actor (or "system") that triggered the escalation.
    pub escalated_by: String,
    /// The escalation rule that fired, for rule-driven escalations.
    pub triggered_by_rule: Option<String>,
    /// When the escalation happened.
    pub escalation_date: Timestamp,
    /// When this escalation was resolved, if it has been.
    pub resolved_at: Option<Timestamp>,
    /// Resolution notes recorded at resolve time.
    pub resolution_notes: Option<String>,
}

impl EscalationHistory {
    /// Whether this escalation is still active (unresolved).
    pub fn is_active(&self) -> bool {
        self.resolved_at.is_none()
    }

    /// Stamp the row as resolved. No-op on an already-resolved row —
    /// the first resolution wins.
    pub fn resolve(&mut self, at: Timestamp, notes: impl Into<String>) {
        if self.resolved_at.is_none() {
            self.resolved_at = Some(at);
            self.resolution_notes = Some(notes.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> EscalationHistory {
        EscalationHistory {
            id: EscalationId::new(),
            case_id: CaseId::new(),
            escalation_level: EscalationLevel::new(2).unwrap(),
            reason: "stale case".into(),
            previous_priority: CasePriority::Medium,
            new_priority: CasePriority::High,
            previous_assignee: None,
            new_assignee: Some(Assignee::Role {
                role: "compliance_officer".into(),
            }),
            escalated_by: "system".into(),
            triggered_by_rule: Some("stale-high-priority".into()),
            escalation_date: Timestamp::now(),
            resolved_at: None,
            resolution_notes: None,
        }
    }

    #[test]
    fn fresh_row_is_active() {
        assert!(row().is_active());
    }

    #[test]
    fn resolve_stamps_once() {
        let mut history = row();
        let first = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        history.resolve(first, "handled");
        assert!(!history.is_active());
        assert_eq!(history.resolved_at, Some(first));
        assert_eq!(history.resolution_notes.as_deref(), Some("handled"));

        // A second resolve does not overwrite the first.
        let later = Timestamp::parse("2026-03-05T12:00:00Z").unwrap();
        history.resolve(later, "again");
        assert_eq!(history.resolved_at, Some(first));
        assert_eq!(history.resolution_notes.as_deref(), Some("handled"));
    }

    #[test]
    fn serde_roundtrip() {
        let history = row();
        let json = serde_json::to_string(&history).unwrap();
        let back: EscalationHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, history.id);
        assert_eq!(back.escalation_level, history.escalation_level);
        assert!(back.is_active());
    }
}
