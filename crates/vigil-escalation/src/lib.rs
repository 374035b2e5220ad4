//! # vigil-escalation — Escalation Workflow
//!
//! The state machine layered over open compliance cases. Cases climb an
//! ordinal ladder of five escalation levels, driven either by configured
//! escalation rules (priority / risk / age thresholds) or by a manual
//! request from an authenticated actor. Every escalation appends an
//! immutable history row, starts an SLA timer for the reached level, and
//! creates notification intents for the relevant recipients.
//!
//! ## Shape
//!
//! The service is stateless over an `Arc<dyn EscalationStore>`; all
//! coordination between concurrent workers (e.g. not double-escalating
//! one case) is delegated to the store's consistency guarantees — there
//! is no in-memory locking here. Batch operations (the overdue sweep)
//! isolate per-case failures so one bad case never aborts the pass.
//!
//! ## Invariant
//!
//! An active escalation row (no `resolved_at`) always belongs to a
//! non-terminal case. [`EscalationService::resolve_escalation_on_case_resolution`]
//! is the cleanup path that re-establishes this when a case closes while
//! still escalated; it is idempotent.

pub mod history;
pub mod integration;
pub mod notification;
pub mod rule;
pub mod service;
pub mod sla;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export primary types.
pub use history::EscalationHistory;
pub use integration::{
    AmlEscalationTrigger, EscalationIntegrationService, KycEscalationTrigger,
    SanctionsEscalationTrigger,
};
pub use notification::{Notification, NotificationChannel, Recipient};
pub use rule::{EscalationCheckResult, EscalationLevel, EscalationRule};
pub use service::{
    Actor, EscalationConfig, EscalationError, EscalationOutcome, EscalationRequest,
    EscalationService, OverdueSweepReport, ResolveEscalationRequest, DEFAULT_ESCALATION_CONFIG,
};
pub use sla::{SlaBreach, SlaStatus, SlaTracking, SlaType};
pub use store::EscalationStore;
