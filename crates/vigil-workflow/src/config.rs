//! # Workflow Configuration
//!
//! All weights, thresholds, and auto-create triggers the workflow service
//! consults. Configuration is constructor-injected — never process-global
//! mutable state — so multiple tenants with different policies can coexist
//! in one process and tests can inject overrides. The documented defaults
//! live in [`DEFAULT_WORKFLOW_CONFIG`].

use serde::{Deserialize, Serialize};

/// Score weight added per risk factor during case assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorWeights {
    /// Politically exposed person.
    pub pep: u32,
    /// Sanctions list match.
    pub sanctions: u32,
    /// KYC rejection (information-requested contributes half of this).
    pub kyc_status: u32,
    /// Overall risk score at or above the high-risk threshold.
    pub risk_score: u32,
    /// Presence of individually high-risk transactions.
    pub transaction_patterns: u32,
    /// Presence of documents pending review.
    pub document_issues: u32,
}

/// Aggregate-score cutoffs for priority assignment, descending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    /// At or above: critical.
    pub critical: u32,
    /// At or above: high.
    pub high: u32,
    /// At or above: medium.
    pub medium: u32,
}

/// Which conditions open a case without an analyst asking for one.
///
/// The four triggers are OR'd — any single one suffices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCreateTriggers {
    /// Open for any politically exposed person.
    pub on_pep: bool,
    /// Open for any sanctions match.
    pub on_sanctions: bool,
    /// Open when the overall risk score reaches the high-risk threshold.
    pub on_high_risk: bool,
    /// Open when at least two distinct risk factors are recorded.
    pub on_multiple_factors: bool,
}

/// The complete workflow policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Per-factor score weights.
    pub weights: RiskFactorWeights,
    /// Priority cutoffs over the aggregate score.
    pub thresholds: PriorityThresholds,
    /// Automatic case-opening triggers.
    pub auto_create: AutoCreateTriggers,
    /// Overall risk score considered high-risk, 0..=100.
    pub high_risk_threshold: u8,
    /// Individual transaction score above which a transaction counts as
    /// high-risk for the pattern factor, 0..=100.
    pub high_risk_transaction_score: u8,
}

/// The documented default policy.
pub const DEFAULT_WORKFLOW_CONFIG: WorkflowConfig = WorkflowConfig {
    weights: RiskFactorWeights {
        pep: 40,
        sanctions: 50,
        kyc_status: 30,
        risk_score: 25,
        transaction_patterns: 20,
        document_issues: 10,
    },
    thresholds: PriorityThresholds {
        critical: 90,
        high: 70,
        medium: 40,
    },
    auto_create: AutoCreateTriggers {
        on_pep: true,
        on_sanctions: true,
        on_high_risk: true,
        on_multiple_factors: true,
    },
    high_risk_threshold: 75,
    high_risk_transaction_score: 70,
};

impl Default for WorkflowConfig {
    fn default() -> Self {
        DEFAULT_WORKFLOW_CONFIG
    }
}
