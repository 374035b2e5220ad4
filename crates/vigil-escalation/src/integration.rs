//! # Escalation Integration
//!
//! Glue between the detection surfaces (KYC review, AML monitoring,
//! sanctions screening) and the escalation ladder: each trigger opens a
//! case derived from the event and immediately runs the escalation
//! check. Sanctions hits do not go through rule evaluation at all — they
//! escalate straight to the maximum level, reflecting their terminal
//! severity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use vigil_core::{CasePriority, CaseType, ComplianceCase, TransactionId, UserId};

use crate::rule::EscalationLevel;
use crate::service::{
    authorize, Actor, EscalationConfig, EscalationError, EscalationRequest, EscalationService,
};
use crate::store::EscalationStore;

/// A KYC rejection that warrants a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycEscalationTrigger {
    /// The affected customer.
    pub user_id: UserId,
    /// Customer display name for the case narrative.
    pub user_name: String,
    /// The reviewer's rejection reasons.
    pub rejection_reasons: Vec<String>,
}

/// An AML pattern detection that warrants a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmlEscalationTrigger {
    /// The affected customer.
    pub user_id: UserId,
    /// Customer display name for the case narrative.
    pub user_name: String,
    /// The detected pattern (e.g. "structuring", "rapid movement").
    pub pattern_name: String,
    /// The pattern's risk score, 0..=100.
    pub risk_score: u8,
    /// The transactions that exhibited the pattern.
    pub transaction_ids: Vec<TransactionId>,
}

/// A sanctions screening hit that warrants a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionsEscalationTrigger {
    /// The affected customer.
    pub user_id: UserId,
    /// Customer display name for the case narrative.
    pub user_name: String,
    /// The list entry the customer matched.
    pub matched_name: String,
    /// The sanctions list the entry came from.
    pub list_name: String,
}

/// Wires case creation from compliance triggers to automatic escalation.
#[derive(Clone)]
pub struct EscalationIntegrationService {
    store: Arc<dyn EscalationStore>,
    escalation: EscalationService,
}

impl EscalationIntegrationService {
    /// Create the integration glue over a store with an explicit policy.
    pub fn new(store: Arc<dyn EscalationStore>, config: EscalationConfig) -> Self {
        let escalation = EscalationService::new(store.clone(), config);
        Self { store, escalation }
    }

    /// The escalation service this glue drives.
    pub fn escalation(&self) -> &EscalationService {
        &self.escalation
    }

    /// Open a KYC review case for a rejection and run the escalation
    /// check. Requires an authorized actor.
    pub async fn escalate_kyc_case(
        &self,
        trigger: KycEscalationTrigger,
        actor: Option<&Actor>,
    ) -> Result<ComplianceCase, EscalationError> {
        authorize(actor)?;
        let description = format!(
            "KYC rejection for {}. Reasons: {}.",
            trigger.user_name,
            if trigger.rejection_reasons.is_empty() {
                "not specified".to_string()
            } else {
                trigger.rejection_reasons.join("; ")
            }
        );
        let case = ComplianceCase::new(
            trigger.user_id,
            CaseType::KycReview,
            CasePriority::High,
            60,
            description,
        );
        self.store.create_case(&case).await?;
        tracing::info!(case_id = %case.id, user_id = %trigger.user_id, "KYC case opened");

        self.escalation.auto_escalate_case(&case.id).await?;
        Ok(self.store.get_case(&case.id).await?)
    }

    /// Open an AML alert case for a detected pattern and run the
    /// escalation check. Priority follows the pattern score. Requires an
    /// authorized actor.
    pub async fn escalate_aml_case(
        &self,
        trigger: AmlEscalationTrigger,
        actor: Option<&Actor>,
    ) -> Result<ComplianceCase, EscalationError> {
        authorize(actor)?;
        let priority = if trigger.risk_score >= 80 {
            CasePriority::Critical
        } else if trigger.risk_score >= 60 {
            CasePriority::High
        } else {
            CasePriority::Medium
        };
        let description = format!(
            "AML pattern '{}' detected for {} with score {}.",
            trigger.pattern_name, trigger.user_name, trigger.risk_score
        );
        let mut case = ComplianceCase::new(
            trigger.user_id,
            CaseType::AmlAlert,
            priority,
            trigger.risk_score,
            description,
        );
        case.related_transactions = trigger.transaction_ids.clone();
        self.store.create_case(&case).await?;
        tracing::info!(
            case_id = %case.id,
            user_id = %trigger.user_id,
            pattern = %trigger.pattern_name,
            "AML case opened"
        );

        self.escalation.auto_escalate_case(&case.id).await?;
        Ok(self.store.get_case(&case.id).await?)
    }

    /// Open a sanctions case and escalate it straight to the maximum
    /// level, bypassing rule evaluation. Requires an authorized actor.
    pub async fn escalate_sanctions_case(
        &self,
        trigger: SanctionsEscalationTrigger,
        actor: Option<&Actor>,
    ) -> Result<ComplianceCase, EscalationError> {
        let actor = authorize(actor)?;
        let description = format!(
            "Sanctions match for {}: '{}' on {}.",
            trigger.user_name, trigger.matched_name, trigger.list_name
        );
        let case = ComplianceCase::new(
            trigger.user_id,
            CaseType::SanctionsHit,
            CasePriority::Critical,
            100,
            description,
        );
        self.store.create_case(&case).await?;
        tracing::info!(
            case_id = %case.id,
            user_id = %trigger.user_id,
            "sanctions case opened, escalating to maximum level"
        );

        self.escalation
            .manually_escalate_case(EscalationRequest {
                case_id: case.id,
                target_level: EscalationLevel::MAX,
                reason: format!(
                    "Sanctions hit on {} escalated directly to maximum level",
                    trigger.list_name
                ),
                target_role: Some("sanctions_officer".into()),
                target_user_id: None,
                priority_boost: true,
                send_notifications: true,
                actor: Some(actor),
                triggered_by_rule: None,
            })
            .await?;
        Ok(self.store.get_case(&case.id).await?)
    }
}

impl std::fmt::Debug for EscalationIntegrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscalationIntegrationService")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::CaseStatus;

    use crate::rule::EscalationRule;
    use crate::testutil::MemoryStore;

    fn analyst() -> Actor {
        Actor::new("analyst-7", "acme-compliance")
    }

    fn setup() -> (EscalationIntegrationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let service = EscalationIntegrationService::new(store.clone(), EscalationConfig::default());
        (service, store)
    }

    fn kyc_trigger() -> KycEscalationTrigger {
        KycEscalationTrigger {
            user_id: UserId::new(),
            user_name: "Robin Rejectee".into(),
            rejection_reasons: vec!["document expired".into(), "address mismatch".into()],
        }
    }

    fn sanctions_trigger() -> SanctionsEscalationTrigger {
        SanctionsEscalationTrigger {
            user_id: UserId::new(),
            user_name: "Listed Person".into(),
            matched_name: "LISTED, PERSON".into(),
            list_name: "OFAC SDN".into(),
        }
    }

    // ── KYC ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn kyc_trigger_opens_high_priority_review_case() {
        let (service, store) = setup();
        let case = service
            .escalate_kyc_case(kyc_trigger(), Some(&analyst()))
            .await
            .unwrap();

        assert_eq!(case.case_type, CaseType::KycReview);
        assert_eq!(case.priority, CasePriority::High);
        assert!(case.description.contains("document expired"));
        // No escalation rules configured: the case stays open.
        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(store.cases.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn kyc_case_auto_escalates_when_a_rule_matches() {
        let (service, store) = setup();
        store.rules.lock().unwrap().push(EscalationRule {
            id: "kyc-high".into(),
            name: "High-priority KYC".into(),
            description: "escalate high KYC cases immediately".into(),
            min_priority: Some(CasePriority::High),
            min_risk_score: None,
            time_threshold_hours: None,
            escalation_level: EscalationLevel::new(2).unwrap(),
            target_role: Some("kyc_lead".into()),
            target_user_id: None,
            auto_assign: true,
            send_notifications: true,
            priority_boost: true,
            is_active: true,
        });

        let case = service
            .escalate_kyc_case(kyc_trigger(), Some(&analyst()))
            .await
            .unwrap();

        assert_eq!(case.status, CaseStatus::Escalated);
        assert_eq!(case.priority, CasePriority::Critical);
        assert_eq!(store.history.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn kyc_trigger_requires_an_actor() {
        let (service, _) = setup();
        let err = service
            .escalate_kyc_case(kyc_trigger(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EscalationError::MissingActor));
    }

    // ── AML ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn aml_priority_follows_pattern_score() {
        let (service, _) = setup();
        let trigger = |score: u8| AmlEscalationTrigger {
            user_id: UserId::new(),
            user_name: "Pat Pattern".into(),
            pattern_name: "structuring".into(),
            risk_score: score,
            transaction_ids: vec![TransactionId::new()],
        };

        let critical = service
            .escalate_aml_case(trigger(85), Some(&analyst()))
            .await
            .unwrap();
        assert_eq!(critical.priority, CasePriority::Critical);

        let high = service
            .escalate_aml_case(trigger(65), Some(&analyst()))
            .await
            .unwrap();
        assert_eq!(high.priority, CasePriority::High);

        let medium = service
            .escalate_aml_case(trigger(40), Some(&analyst()))
            .await
            .unwrap();
        assert_eq!(medium.priority, CasePriority::Medium);
    }

    #[tokio::test]
    async fn aml_case_links_the_pattern_transactions() {
        let (service, _) = setup();
        let txns = vec![TransactionId::new(), TransactionId::new()];
        let case = service
            .escalate_aml_case(
                AmlEscalationTrigger {
                    user_id: UserId::new(),
                    user_name: "Pat Pattern".into(),
                    pattern_name: "rapid movement".into(),
                    risk_score: 70,
                    transaction_ids: txns.clone(),
                },
                Some(&analyst()),
            )
            .await
            .unwrap();
        assert_eq!(case.related_transactions, txns);
        assert!(case.description.contains("rapid movement"));
    }

    // ── Sanctions ────────────────────────────────────────────────────

    #[tokio::test]
    async fn sanctions_escalates_straight_to_maximum_level() {
        let (service, store) = setup();
        // An escalation rule pointing at level 2 exists, but sanctions
        // must bypass rule evaluation entirely.
        store.rules.lock().unwrap().push(EscalationRule {
            id: "generic".into(),
            name: "Generic".into(),
            description: "would pick level 2".into(),
            min_priority: None,
            min_risk_score: None,
            time_threshold_hours: None,
            escalation_level: EscalationLevel::new(2).unwrap(),
            target_role: None,
            target_user_id: None,
            auto_assign: false,
            send_notifications: false,
            priority_boost: false,
            is_active: true,
        });

        let case = service
            .escalate_sanctions_case(sanctions_trigger(), Some(&analyst()))
            .await
            .unwrap();

        assert_eq!(case.case_type, CaseType::SanctionsHit);
        assert_eq!(case.priority, CasePriority::Critical);
        assert_eq!(case.status, CaseStatus::Escalated);
        assert_eq!(case.risk_score, 100);

        let history = store.history.lock().unwrap();
        assert_eq!(history.len(), 1);
        let row = history.values().next().unwrap();
        assert_eq!(row.escalation_level, EscalationLevel::MAX);
        assert!(row.triggered_by_rule.is_none());
    }

    #[tokio::test]
    async fn sanctions_escalation_notifies_the_sanctions_officer() {
        let (service, store) = setup();
        service
            .escalate_sanctions_case(sanctions_trigger(), Some(&analyst()))
            .await
            .unwrap();
        let notifications = store.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(matches!(
            notifications[0].recipient,
            crate::notification::Recipient::Role { ref role } if role == "sanctions_officer"
        ));
    }

    #[tokio::test]
    async fn unlinked_actor_cannot_open_sanctions_case() {
        let (service, store) = setup();
        let err = service
            .escalate_sanctions_case(sanctions_trigger(), Some(&Actor::unlinked("ghost")))
            .await
            .unwrap_err();
        assert!(matches!(err, EscalationError::ActorNotLinked { .. }));
        assert!(store.cases.lock().unwrap().is_empty());
    }
}
