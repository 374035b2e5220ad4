//! # Case & Escalation Store Boundary
//!
//! The escalation workflow's narrow interface to the external data store.
//! All records are simple keyed rows; the core issues create/read/update
//! calls and expects eventually consistent reads back.
//!
//! Cross-request coordination — unique constraints, conditional writes,
//! "don't double-escalate this case" — is the store's responsibility.
//! Multiple workers may drive the same case concurrently; the core holds
//! no in-memory locks.

use async_trait::async_trait;

use vigil_core::{CaseId, ComplianceCase, EscalationId, StoreError, Timestamp};

use crate::history::EscalationHistory;
use crate::notification::Notification;
use crate::rule::EscalationRule;
use crate::sla::SlaTracking;

/// Read/write access to cases, escalation history, SLA timers, and
/// notification records.
#[async_trait]
pub trait EscalationStore: Send + Sync {
    // ── Cases ────────────────────────────────────────────────────────

    /// Persist a newly opened case.
    async fn create_case(&self, case: &ComplianceCase) -> Result<(), StoreError>;

    /// Load a case by id.
    async fn get_case(&self, case_id: &CaseId) -> Result<ComplianceCase, StoreError>;

    /// Persist a mutated case (priority, assignee, status).
    async fn update_case(&self, case: &ComplianceCase) -> Result<(), StoreError>;

    /// Non-terminal cases opened at or before `cutoff`.
    async fn list_overdue_cases(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ComplianceCase>, StoreError>;

    // ── Escalation rules ─────────────────────────────────────────────

    /// The currently active escalation rules, in the store's order.
    async fn active_escalation_rules(&self) -> Result<Vec<EscalationRule>, StoreError>;

    // ── Escalation history ───────────────────────────────────────────

    /// Append an escalation history row.
    async fn insert_escalation(&self, history: &EscalationHistory) -> Result<(), StoreError>;

    /// Load a history row by id.
    async fn get_escalation(
        &self,
        escalation_id: &EscalationId,
    ) -> Result<EscalationHistory, StoreError>;

    /// Persist a mutated history row (resolution stamps).
    async fn update_escalation(&self, history: &EscalationHistory) -> Result<(), StoreError>;

    /// The active (unresolved) history rows for a case, ordered by
    /// escalation date.
    async fn active_escalations(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<EscalationHistory>, StoreError>;

    // ── SLA timers ───────────────────────────────────────────────────

    /// Start tracking a timer.
    async fn insert_sla(&self, sla: &SlaTracking) -> Result<(), StoreError>;

    /// Persist a mutated timer (closure).
    async fn update_sla(&self, sla: &SlaTracking) -> Result<(), StoreError>;

    /// Every pending timer across all cases.
    async fn pending_slas(&self) -> Result<Vec<SlaTracking>, StoreError>;

    /// The pending timers for one case.
    async fn pending_slas_for_case(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<SlaTracking>, StoreError>;

    // ── Notifications ────────────────────────────────────────────────

    /// Persist a notification intent for the external dispatcher.
    async fn create_notification(&self, notification: &Notification) -> Result<(), StoreError>;
}
