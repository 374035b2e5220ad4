//! # Case Drafts and Recommendations
//!
//! Turns a positive [`CaseAssessment`] into the data needed to open a
//! case — a narrative description assembled in a fixed order, the related
//! transaction and document references — plus the ordered remediation
//! recommendations shown to the analyst. Both are pure functions; the
//! caller persists the draft.

use serde::{Deserialize, Serialize};

use vigil_core::{
    CasePriority, CaseType, ComplianceCase, DocumentId, DocumentStatus, KycStatus, TransactionId,
    UserId, UserProfile,
};

use crate::assessment::{CaseAssessment, CaseWorkflowService};

/// Everything needed to open a compliance case for a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDraft {
    /// The customer the case is about.
    pub user_id: UserId,
    /// Case type from the assessment's precedence table, falling back to
    /// `suspicious_activity` when no naming factor was recorded.
    pub case_type: CaseType,
    /// Priority from the assessment.
    pub priority: CasePriority,
    /// The aggregate score clamped into the stored 0..=100 range.
    pub risk_score: u8,
    /// Narrative description, fixed assembly order.
    pub description: String,
    /// The individually high-risk transactions that contributed.
    pub related_transactions: Vec<TransactionId>,
    /// Documents still pending review.
    pub documents: Vec<DocumentId>,
}

impl CaseDraft {
    /// Materialize the draft as a new open case.
    pub fn into_case(self) -> ComplianceCase {
        let mut case = ComplianceCase::new(
            self.user_id,
            self.case_type,
            self.priority,
            self.risk_score,
            self.description,
        );
        case.related_transactions = self.related_transactions;
        case.documents = self.documents;
        case
    }
}

impl CaseWorkflowService {
    /// Build the case draft for a customer from their assessment.
    ///
    /// The description is assembled in a fixed order: identity line,
    /// aggregate score, factor list, then the PEP / sanctions / KYC
    /// call-outs only when applicable, and the high-risk transaction
    /// count only when nonzero.
    pub fn generate_case_data(&self, user: &UserProfile, assessment: &CaseAssessment) -> CaseDraft {
        let mut lines = vec![
            format!(
                "Compliance case for {} ({}).",
                user.full_name, user.user_id
            ),
            format!("Aggregate risk score: {}.", assessment.total_score),
        ];
        if assessment.risk_factors.is_empty() {
            lines.push("Risk factors: none recorded.".to_string());
        } else {
            let labels: Vec<&str> = assessment
                .risk_factors
                .iter()
                .map(|f| f.label.as_str())
                .collect();
            lines.push(format!("Risk factors: {}.", labels.join(", ")));
        }
        if user.is_pep {
            lines.push("Customer is a politically exposed person.".to_string());
        }
        if user.is_sanctioned {
            lines.push("Customer matched a sanctions list.".to_string());
        }
        if matches!(
            user.kyc_status,
            KycStatus::Rejected | KycStatus::InformationRequested
        ) {
            lines.push(format!("KYC status: {}.", user.kyc_status));
        }
        let high_risk_count =
            user.high_risk_transaction_count(self.config().high_risk_transaction_score);
        if high_risk_count > 0 {
            lines.push(format!("High-risk transactions: {high_risk_count}."));
        }

        let threshold = self.config().high_risk_transaction_score;
        let related_transactions = user
            .transactions
            .iter()
            .filter(|t| t.risk_score > threshold)
            .map(|t| t.transaction_id)
            .collect();
        let documents = user
            .documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Pending)
            .map(|d| d.document_id)
            .collect();

        CaseDraft {
            user_id: user.user_id,
            case_type: assessment
                .case_type
                .unwrap_or(CaseType::SuspiciousActivity),
            priority: assessment.priority,
            risk_score: assessment.total_score.min(100) as u8,
            description: lines.join("\n"),
            related_transactions,
            documents,
        }
    }

    /// Ordered, additive remediation actions for the analyst working the
    /// case. Pure — only informs an external actor what to do.
    pub fn workflow_recommendations(
        &self,
        user: &UserProfile,
        _assessment: &CaseAssessment,
    ) -> Vec<String> {
        let mut actions = Vec::new();
        if user.is_sanctioned {
            actions.push(
                "Freeze account activity immediately pending sanctions review.".to_string(),
            );
            actions.push("Notify the legal and sanctions compliance teams.".to_string());
        }
        if user.is_pep {
            actions.push(
                "Apply enhanced due diligence procedures for politically exposed persons."
                    .to_string(),
            );
        }
        if user.risk_score >= self.config().high_risk_threshold {
            actions.push("Place the account under enhanced transaction monitoring.".to_string());
        }
        match user.kyc_status {
            KycStatus::Rejected => actions.push(
                "Re-run identity verification and request corrected KYC documents.".to_string(),
            ),
            KycStatus::Submitted | KycStatus::InformationRequested => {
                actions.push("Follow up on the outstanding KYC review.".to_string());
            }
            _ => {}
        }
        let pending = user.pending_document_count();
        if pending > 0 {
            actions.push(format!(
                "Chase {pending} pending document(s) awaiting review."
            ));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{CaseDocument, CaseStatus, ScoredTransaction};

    fn scored(risk_score: u8) -> ScoredTransaction {
        ScoredTransaction {
            transaction_id: TransactionId::new(),
            risk_score,
        }
    }

    fn pending_doc() -> CaseDocument {
        CaseDocument {
            document_id: DocumentId::new(),
            status: DocumentStatus::Pending,
        }
    }

    fn draft_for(user: &UserProfile) -> CaseDraft {
        let service = CaseWorkflowService::with_defaults();
        let assessment = service.assess_case_creation(user);
        service.generate_case_data(user, &assessment)
    }

    // ── Description assembly ─────────────────────────────────────────

    #[test]
    fn description_order_identity_score_factors_callouts() {
        let mut user = UserProfile::bare(UserId::new(), "Sam Vermeer");
        user.is_pep = true;
        user.risk_score = 10;
        user.transactions = vec![scored(90)];

        let draft = draft_for(&user);
        let lines: Vec<&str> = draft.description.lines().collect();

        assert!(lines[0].starts_with("Compliance case for Sam Vermeer"));
        assert!(lines[1].starts_with("Aggregate risk score:"));
        assert!(lines[2].starts_with("Risk factors:"));
        assert!(lines[2].contains("Politically exposed person"));
        assert_eq!(lines[3], "Customer is a politically exposed person.");
        assert_eq!(lines[4], "High-risk transactions: 1.");
    }

    #[test]
    fn callouts_absent_when_not_applicable() {
        let mut user = UserProfile::bare(UserId::new(), "Quiet Customer");
        user.risk_score = 80;
        let draft = draft_for(&user);
        assert!(!draft.description.contains("politically exposed"));
        assert!(!draft.description.contains("sanctions list"));
        assert!(!draft.description.contains("KYC status"));
        assert!(!draft.description.contains("High-risk transactions"));
    }

    #[test]
    fn draft_clamps_score_and_collects_references() {
        let mut user = UserProfile::bare(UserId::new(), "Busy Customer");
        user.is_sanctioned = true;
        user.is_pep = true;
        user.kyc_status = KycStatus::Rejected;
        user.risk_score = 90;
        user.transactions = vec![scored(95), scored(40)];
        user.documents = vec![pending_doc(), pending_doc()];

        let draft = draft_for(&user);

        assert_eq!(draft.risk_score, 100);
        assert_eq!(draft.case_type, CaseType::SanctionsHit);
        assert_eq!(draft.related_transactions.len(), 1);
        assert_eq!(draft.documents.len(), 2);
    }

    #[test]
    fn unnamed_factors_fall_back_to_suspicious_activity() {
        let mut user = UserProfile::bare(UserId::new(), "Pattern Customer");
        user.risk_score = 80;
        let draft = draft_for(&user);
        assert_eq!(draft.case_type, CaseType::SuspiciousActivity);
    }

    #[test]
    fn into_case_opens_with_draft_fields() {
        let mut user = UserProfile::bare(UserId::new(), "Case Customer");
        user.is_pep = true;
        let user_id = user.user_id;

        let case = draft_for(&user).into_case();

        assert_eq!(case.user_id, user_id);
        assert_eq!(case.case_type, CaseType::PepReview);
        assert_eq!(case.status, CaseStatus::Open);
        assert!(case.description.contains("Case Customer"));
    }

    // ── Recommendations ──────────────────────────────────────────────

    #[test]
    fn sanctions_recommendations_lead_with_freeze() {
        let mut user = UserProfile::bare(UserId::new(), "A");
        user.is_sanctioned = true;
        user.is_pep = true;
        let service = CaseWorkflowService::with_defaults();
        let assessment = service.assess_case_creation(&user);
        let actions = service.workflow_recommendations(&user, &assessment);

        assert!(actions[0].contains("Freeze account activity"));
        assert!(actions[1].contains("legal and sanctions"));
        assert!(actions[2].contains("enhanced due diligence"));
    }

    #[test]
    fn kyc_and_document_followups() {
        let mut user = UserProfile::bare(UserId::new(), "A");
        user.kyc_status = KycStatus::Rejected;
        user.documents = vec![pending_doc(), pending_doc(), pending_doc()];
        let service = CaseWorkflowService::with_defaults();
        let assessment = service.assess_case_creation(&user);
        let actions = service.workflow_recommendations(&user, &assessment);

        assert!(actions.iter().any(|a| a.contains("Re-run identity verification")));
        assert!(actions.iter().any(|a| a.contains("Chase 3 pending document(s)")));
    }

    #[test]
    fn clean_profile_gets_no_recommendations() {
        let user = UserProfile::bare(UserId::new(), "A");
        let service = CaseWorkflowService::with_defaults();
        let assessment = service.assess_case_creation(&user);
        assert!(service.workflow_recommendations(&user, &assessment).is_empty());
    }
}
