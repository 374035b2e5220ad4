//! # Risk Evaluation Service
//!
//! Orchestrates preparation, condition evaluation, and match persistence
//! into one scoring pass per entity.
//!
//! ## Failure Policy
//!
//! Scoring must never block its caller. A rule-source failure is caught
//! at this boundary and degrades to a zero result carrying
//! [`DegradeReason::RuleSourceUnavailable`] — fail open to zero, never
//! fail closed to an error. A match-persistence failure is logged and
//! the pass continues; the returned assessment is unaffected.
//!
//! ## Determinism
//!
//! The scoring core ([`score_rules`]) is a pure function: given the same
//! rule set and record it produces the same matches and the same clamped
//! total, and the total never depends on rule order. All matches from one
//! pass share a single evaluation timestamp.

use std::sync::Arc;

use vigil_core::{Timestamp, Transaction, UserProfile};

use crate::prepare::{prepare_transaction_data, prepare_user_data, BehavioralSnapshot};
use crate::record::DataRecord;
use crate::repository::{EntityKind, RuleRepository};
use crate::rule::{DegradeReason, MatchData, RiskAssessment, RiskMatch, RiskRule, RuleCategory};

/// Categories consulted when scoring a transaction.
const TRANSACTION_CATEGORIES: &[RuleCategory] =
    &[RuleCategory::Transaction, RuleCategory::Behavioral];

/// Categories consulted when scoring a customer profile.
const USER_CATEGORIES: &[RuleCategory] = &[RuleCategory::Kyc];

/// The pure output of scoring one record against one rule set.
#[derive(Debug, Clone)]
pub struct ScoredPass {
    /// Every rule that fired, in rule-set order.
    pub matches: Vec<RiskMatch>,
    /// Sum of fired weights, clamped to 0..=100.
    pub total_risk_score: u8,
    /// Unique categories among matches, first-seen order.
    pub rule_categories: Vec<RuleCategory>,
}

/// Score a prepared record against a rule set.
///
/// Pure: no I/O, no mutation. Inactive rules are skipped (a fired match
/// must reference a rule that was active at evaluation time). Every
/// match snapshots the full record with the shared `evaluated_at`
/// timestamp for audit replay.
pub fn score_rules(
    rules: &[RiskRule],
    record: &DataRecord,
    evaluated_at: Timestamp,
) -> ScoredPass {
    let snapshot = record.to_value();
    let mut total: u32 = 0;
    let mut matches = Vec::new();
    let mut categories: Vec<RuleCategory> = Vec::new();

    for rule in rules {
        if !rule.is_active {
            continue;
        }
        if !rule.condition.evaluate(record) {
            continue;
        }
        total += u32::from(rule.risk_score);
        if !categories.contains(&rule.category) {
            categories.push(rule.category);
        }
        matches.push(RiskMatch {
            rule_id: rule.rule_id.clone(),
            rule_name: rule.rule_name.clone(),
            risk_score: rule.risk_score,
            category: rule.category,
            description: rule.description.clone(),
            match_data: MatchData {
                snapshot: snapshot.clone(),
                evaluated_at,
            },
        });
    }

    ScoredPass {
        matches,
        total_risk_score: total.min(100) as u8,
        rule_categories: categories,
    }
}

/// Scores entities against the active rule set and persists the match
/// audit trail.
///
/// Stateless and request-scoped: the repository is the only shared
/// resource, and every public method is an independent unit of work.
#[derive(Clone)]
pub struct RiskEvaluationService {
    repository: Arc<dyn RuleRepository>,
}

impl RiskEvaluationService {
    /// Create a service over a rule repository.
    pub fn new(repository: Arc<dyn RuleRepository>) -> Self {
        Self { repository }
    }

    /// Score one transaction against the transaction and behavioral rules.
    ///
    /// `behavioral` carries externally aggregated counters; without it the
    /// preparer substitutes marked neutral defaults (see [`crate::prepare`]).
    pub async fn evaluate_transaction_risk(
        &self,
        tx: &Transaction,
        behavioral: Option<&BehavioralSnapshot>,
    ) -> RiskAssessment {
        let record = prepare_transaction_data(tx, behavioral);
        self.evaluate(
            tx.id.to_string(),
            EntityKind::Transaction,
            TRANSACTION_CATEGORIES,
            record,
        )
        .await
    }

    /// Score one customer profile against the KYC rules.
    pub async fn evaluate_user_risk(&self, user: &UserProfile) -> RiskAssessment {
        let record = prepare_user_data(user, Timestamp::now());
        self.evaluate(
            user.user_id.to_string(),
            EntityKind::User,
            USER_CATEGORIES,
            record,
        )
        .await
    }

    async fn evaluate(
        &self,
        entity_id: String,
        entity_kind: EntityKind,
        categories: &[RuleCategory],
        record: DataRecord,
    ) -> RiskAssessment {
        let rules = match self.repository.fetch_active_rules(categories).await {
            Ok(rules) => rules,
            Err(error) => {
                tracing::warn!(
                    entity_id = %entity_id,
                    entity_kind = %entity_kind,
                    error = %error,
                    "rule source unavailable, degrading to zero assessment"
                );
                return RiskAssessment::degraded(DegradeReason::RuleSourceUnavailable);
            }
        };

        if rules.is_empty() {
            return RiskAssessment::zero();
        }

        let pass = score_rules(&rules, &record, Timestamp::now());

        for fired in &pass.matches {
            if let Err(error) = self
                .repository
                .record_match(&entity_id, entity_kind, &fired.rule_id, &fired.match_data)
                .await
            {
                tracing::warn!(
                    entity_id = %entity_id,
                    rule_id = %fired.rule_id,
                    error = %error,
                    "failed to persist rule match, scoring continues"
                );
            }
        }

        tracing::debug!(
            entity_id = %entity_id,
            entity_kind = %entity_kind,
            matched = pass.matches.len(),
            total = pass.total_risk_score,
            "evaluation pass complete"
        );

        RiskAssessment {
            total_risk_score: pass.total_risk_score,
            matched_rules: pass.matches,
            rule_categories: pass.rule_categories,
            degraded: None,
        }
    }
}

impl std::fmt::Debug for RiskEvaluationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEvaluationService").finish_non_exhaustive()
    }
}
