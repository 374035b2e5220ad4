//! # vigil-workflow — Compliance Case Workflow
//!
//! Decides whether a customer's risk profile warrants opening a
//! compliance case, and at what priority — then turns a positive decision
//! into a case draft with a narrative description and an ordered list of
//! remediation recommendations.
//!
//! Everything here is a pure function of `(profile, config)`: the service
//! holds an injected [`WorkflowConfig`] and performs no I/O. Persisting
//! the drafted case and reacting to it (escalation) belong to the caller
//! and to `vigil-escalation`.

pub mod assessment;
pub mod config;
pub mod draft;

// Re-export primary types.
pub use assessment::{CaseAssessment, CaseWorkflowService, RiskFactor, RiskFactorFinding};
pub use config::{
    AutoCreateTriggers, PriorityThresholds, RiskFactorWeights, WorkflowConfig,
    DEFAULT_WORKFLOW_CONFIG,
};
pub use draft::CaseDraft;
