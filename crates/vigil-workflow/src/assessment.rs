//! # Case Assessment
//!
//! Walks a fixed, ordered set of risk-factor checks over a customer
//! profile, accumulates a weighted score, and decides whether a case
//! should be opened and at what priority.
//!
//! ## Narrative Precedence
//!
//! Every matching factor contributes weight and a finding, but only one
//! factor names the case type and opening reason. That precedence is an
//! explicit ordered table ([`CASE_TYPE_PRECEDENCE`]): sanctions outranks
//! PEP outranks KYC findings — a sanctioned PEP always gets a
//! `sanctions_hit` case, regardless of check order.

use serde::{Deserialize, Serialize};

use vigil_core::{CasePriority, CaseType, KycStatus, UserProfile};

use crate::config::WorkflowConfig;

/// The distinct risk factors the assessment can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Sanctions list match.
    Sanctions,
    /// Politically exposed person.
    Pep,
    /// KYC submission rejected.
    KycRejected,
    /// KYC reviewer requested more information.
    KycInformationRequested,
    /// Overall risk score at or above the high-risk threshold.
    HighRiskScore,
    /// Individually high-risk transactions present.
    SuspiciousTransactionPattern,
    /// Documents pending review.
    OutstandingDocuments,
}

impl RiskFactor {
    /// Human-readable label used in findings and case narratives.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sanctions => "Sanctions list match",
            Self::Pep => "Politically exposed person",
            Self::KycRejected => "KYC rejected",
            Self::KycInformationRequested => "KYC information requested",
            Self::HighRiskScore => "High overall risk score",
            Self::SuspiciousTransactionPattern => "High-risk transaction pattern",
            Self::OutstandingDocuments => "Documents pending review",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which factor names the case type, in descending severity. The first
/// entry whose factor was recorded wins. Factors not in this table
/// (score/pattern/document findings) contribute weight but never name
/// the case.
pub const CASE_TYPE_PRECEDENCE: &[(RiskFactor, CaseType)] = &[
    (RiskFactor::Sanctions, CaseType::SanctionsHit),
    (RiskFactor::Pep, CaseType::PepReview),
    (RiskFactor::KycRejected, CaseType::KycReview),
    (RiskFactor::KycInformationRequested, CaseType::KycReview),
];

/// One recorded risk factor with the weight it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorFinding {
    /// The factor.
    pub factor: RiskFactor,
    /// Its label at assessment time.
    pub label: String,
    /// The weight added to the aggregate score.
    pub weight: u32,
}

/// The outcome of assessing one customer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAssessment {
    /// Whether a case should be opened.
    pub should_create_case: bool,
    /// The case type named by the precedence table, when any naming
    /// factor was recorded.
    pub case_type: Option<CaseType>,
    /// Assigned priority.
    pub priority: CasePriority,
    /// Base risk score plus all factor weights (not clamped — the case
    /// draft clamps when it becomes a stored score).
    pub total_score: u32,
    /// Every recorded factor, in check order.
    pub risk_factors: Vec<RiskFactorFinding>,
    /// The label of the factor that named the case type.
    pub opening_reason: Option<String>,
}

impl CaseAssessment {
    /// Whether a given factor was recorded.
    pub fn has_factor(&self, factor: RiskFactor) -> bool {
        self.risk_factors.iter().any(|f| f.factor == factor)
    }
}

/// Assesses customer profiles against an injected workflow policy.
///
/// Stateless; all three operations are pure functions of
/// `(profile, config)`.
#[derive(Debug, Clone)]
pub struct CaseWorkflowService {
    config: WorkflowConfig,
}

impl CaseWorkflowService {
    /// Create a service with an explicit policy.
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Create a service with the documented default policy.
    pub fn with_defaults() -> Self {
        Self::new(WorkflowConfig::default())
    }

    /// The active policy.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Walk the ordered risk-factor checks and decide whether to open a
    /// case.
    pub fn assess_case_creation(&self, user: &UserProfile) -> CaseAssessment {
        let weights = &self.config.weights;
        let mut total = u32::from(user.risk_score);
        let mut findings: Vec<RiskFactorFinding> = Vec::new();

        let mut record = |factor: RiskFactor, weight: u32, total: &mut u32| {
            *total += weight;
            findings.push(RiskFactorFinding {
                factor,
                label: factor.label().to_string(),
                weight,
            });
        };

        if user.is_pep {
            record(RiskFactor::Pep, weights.pep, &mut total);
        }
        if user.is_sanctioned {
            record(RiskFactor::Sanctions, weights.sanctions, &mut total);
        }
        match user.kyc_status {
            KycStatus::Rejected => {
                record(RiskFactor::KycRejected, weights.kyc_status, &mut total);
            }
            KycStatus::InformationRequested => {
                record(
                    RiskFactor::KycInformationRequested,
                    weights.kyc_status / 2,
                    &mut total,
                );
            }
            _ => {}
        }
        if user.risk_score >= self.config.high_risk_threshold {
            record(RiskFactor::HighRiskScore, weights.risk_score, &mut total);
        }
        if user.high_risk_transaction_count(self.config.high_risk_transaction_score) > 0 {
            record(
                RiskFactor::SuspiciousTransactionPattern,
                weights.transaction_patterns,
                &mut total,
            );
        }
        if user.pending_document_count() > 0 {
            record(
                RiskFactor::OutstandingDocuments,
                weights.document_issues,
                &mut total,
            );
        }

        let named = CASE_TYPE_PRECEDENCE
            .iter()
            .find(|(factor, _)| findings.iter().any(|f| f.factor == *factor));
        let case_type = named.map(|(_, case_type)| *case_type);
        let opening_reason = named.map(|(factor, _)| factor.label().to_string());

        let auto = &self.config.auto_create;
        let should_create_case = (auto.on_pep && user.is_pep)
            || (auto.on_sanctions && user.is_sanctioned)
            || (auto.on_high_risk && user.risk_score >= self.config.high_risk_threshold)
            || (auto.on_multiple_factors && findings.len() >= 2);

        let priority = self.assign_priority(total, user);

        if should_create_case {
            tracing::info!(
                user_id = %user.user_id,
                case_type = ?case_type,
                priority = %priority,
                total_score = total,
                factors = findings.len(),
                "case creation recommended"
            );
        }

        CaseAssessment {
            should_create_case,
            case_type,
            priority,
            total_score: total,
            risk_factors: findings,
            opening_reason,
        }
    }

    /// First match wins, descending severity. Sanctions forces critical
    /// and PEP forces high regardless of the aggregate score.
    fn assign_priority(&self, total: u32, user: &UserProfile) -> CasePriority {
        let t = &self.config.thresholds;
        if total >= t.critical || user.is_sanctioned {
            CasePriority::Critical
        } else if total >= t.high || user.is_pep {
            CasePriority::High
        } else if total >= t.medium {
            CasePriority::Medium
        } else {
            CasePriority::Low
        }
    }
}

impl Default for CaseWorkflowService {
    fn default() -> Self {
        Self::with_defaults()
    }
}
