//! # Compliance Case Model
//!
//! The investigatory unit of the back office. A case is opened for a
//! customer either manually or by the workflow service, worked by an
//! analyst, and optionally pushed up the escalation ladder before being
//! resolved or closed.
//!
//! ## Lifecycle
//!
//! ```text
//! Open ──▶ InProgress ──▶ Resolved | Closed
//!   │          │ ▲
//!   └──▶ Escalated ──▶ Resolved | Closed
//! ```
//!
//! `Resolved` and `Closed` are terminal. The status enum owns the
//! transition table — callers go through [`ComplianceCase::transition_to`]
//! and cannot reopen a terminal case.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::{CaseId, DocumentId, TransactionId, UserId};
use crate::temporal::Timestamp;

/// What kind of investigation a case represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    /// KYC record requires review (rejection, stale verification).
    KycReview,
    /// Anti-money-laundering pattern alert.
    AmlAlert,
    /// Positive hit against a sanctions list.
    SanctionsHit,
    /// Politically exposed person review.
    PepReview,
    /// Ongoing transaction monitoring finding.
    TransactionMonitoring,
    /// Suspicious activity not covered by a narrower type.
    SuspiciousActivity,
    /// Document set incomplete or inconsistent.
    DocumentReview,
    /// Breach of an internal compliance policy.
    ComplianceBreach,
}

impl CaseType {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KycReview => "kyc_review",
            Self::AmlAlert => "aml_alert",
            Self::SanctionsHit => "sanctions_hit",
            Self::PepReview => "pep_review",
            Self::TransactionMonitoring => "transaction_monitoring",
            Self::SuspiciousActivity => "suspicious_activity",
            Self::DocumentReview => "document_review",
            Self::ComplianceBreach => "compliance_breach",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifecycle status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Newly opened, not yet picked up.
    Open,
    /// An analyst is actively working the case.
    InProgress,
    /// The case carries at least one active escalation.
    Escalated,
    /// Investigation concluded. Terminal.
    Resolved,
    /// Administratively closed. Terminal.
    Closed,
}

impl CaseStatus {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    ///
    /// `Escalated -> Escalated` is allowed: a case already escalated can
    /// be escalated again (to a higher level) without a status change
    /// being an error.
    pub fn can_transition_to(&self, to: CaseStatus) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::InProgress)
                | (Self::Open, Self::Escalated)
                | (Self::Open, Self::Resolved)
                | (Self::Open, Self::Closed)
                | (Self::InProgress, Self::Escalated)
                | (Self::InProgress, Self::Resolved)
                | (Self::InProgress, Self::Closed)
                | (Self::Escalated, Self::Escalated)
                | (Self::Escalated, Self::InProgress)
                | (Self::Escalated, Self::Resolved)
                | (Self::Escalated, Self::Closed)
        )
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case priority, ordered from least to most severe.
///
/// The derived `Ord` follows declaration order, so
/// `CasePriority::Low < CasePriority::Critical` holds and escalation
/// rules can compare priorities directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    /// Routine review.
    Low,
    /// Elevated attention.
    Medium,
    /// Senior analyst attention.
    High,
    /// Immediate action required.
    Critical,
}

impl CasePriority {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// One severity step up, saturating at `Critical`.
    pub fn boosted(&self) -> CasePriority {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

impl std::fmt::Display for CasePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a case is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    /// A specific analyst.
    User {
        /// The analyst's user id.
        user_id: UserId,
    },
    /// A role queue (e.g. "compliance_officer").
    Role {
        /// The role name.
        role: String,
    },
}

/// A compliance case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCase {
    /// Unique case identifier.
    pub id: CaseId,
    /// The customer under investigation.
    pub user_id: UserId,
    /// What kind of investigation this is.
    pub case_type: CaseType,
    /// Current lifecycle status.
    pub status: CaseStatus,
    /// Current priority.
    pub priority: CasePriority,
    /// Risk score at case opening, 0..=100.
    pub risk_score: u8,
    /// Narrative description assembled at opening.
    pub description: String,
    /// Current assignee, if any.
    pub assigned_to: Option<Assignee>,
    /// Transactions that contributed to opening the case.
    pub related_transactions: Vec<TransactionId>,
    /// Documents attached to the case.
    pub documents: Vec<DocumentId>,
    /// When the case was opened.
    pub created_at: Timestamp,
    /// When the case was last mutated.
    pub updated_at: Timestamp,
}

impl ComplianceCase {
    /// Open a new case with status `Open` and no assignee.
    pub fn new(
        user_id: UserId,
        case_type: CaseType,
        priority: CasePriority,
        risk_score: u8,
        description: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: CaseId::new(),
            user_id,
            case_type,
            status: CaseStatus::Open,
            priority,
            risk_score: risk_score.min(100),
            description: description.into(),
            assigned_to: None,
            related_transactions: Vec::new(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the case to a new status, enforcing the lifecycle table.
    pub fn transition_to(&mut self, to: CaseStatus, at: Timestamp) -> Result<(), CoreError> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        self.updated_at = at;
        Ok(())
    }

    /// Whole hours since the case was opened, as seen from `now`.
    pub fn age_hours(&self, now: Timestamp) -> i64 {
        now.hours_since(self.created_at)
    }
}
