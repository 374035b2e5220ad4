//! # Rule and Assessment Types
//!
//! A risk rule is an operator-authored `(category, condition, weight)`
//! triple. Evaluating the active rule set against an entity produces a
//! [`RiskAssessment`]: the clamped aggregate score, one [`RiskMatch`]
//! audit record per fired rule, and — when the pass ran degraded — a
//! reason code distinguishing a safe zero from a degraded one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vigil_core::{RuleId, Timestamp};

use crate::condition::Condition;

/// The category a rule belongs to; evaluation passes filter by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Rules over a single transaction's attributes.
    Transaction,
    /// Rules over a customer's KYC profile.
    Kyc,
    /// Rules over behavioral counters (frequency, recipient spread).
    Behavioral,
}

impl RuleCategory {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Kyc => "kyc",
            Self::Behavioral => "behavioral",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator-authored risk rule.
///
/// Rules are created and edited through the external rule-management
/// surface; the engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRule {
    /// Stable identifier, referenced by match audit rows.
    pub rule_id: RuleId,
    /// Human-readable name.
    pub rule_name: String,
    /// What the rule is looking for.
    pub description: String,
    /// Which evaluation passes consider this rule.
    pub category: RuleCategory,
    /// The condition tree.
    pub condition: Condition,
    /// Score weight added when the condition holds, 0..=100.
    pub risk_score: u8,
    /// Whether the rule participates in evaluation.
    pub is_active: bool,
}

/// The evaluated input snapshot attached to a match for audit replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchData {
    /// The prepared record the condition was evaluated against.
    pub snapshot: Value,
    /// The shared timestamp of the evaluation pass.
    pub evaluated_at: Timestamp,
}

/// One fired rule against one entity at one point in time.
///
/// Immutable once created; persisted as an audit trail and never updated
/// or deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMatch {
    /// The rule that fired.
    pub rule_id: RuleId,
    /// Rule name at evaluation time.
    pub rule_name: String,
    /// The weight this match contributed.
    pub risk_score: u8,
    /// The rule's category.
    pub category: RuleCategory,
    /// The rule's description at evaluation time.
    pub description: String,
    /// Input snapshot and pass timestamp.
    pub match_data: MatchData,
}

/// Why an assessment was produced without consulting the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    /// The rule source could not be reached; the pass degraded to zero.
    RuleSourceUnavailable,
}

/// The output of one evaluation pass. Ephemeral — recomputed on demand;
/// only the constituent matches are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of matched rule weights, clamped to 0..=100.
    pub total_risk_score: u8,
    /// Every rule that fired, in evaluation order.
    pub matched_rules: Vec<RiskMatch>,
    /// Unique categories present among matches, first-seen order.
    pub rule_categories: Vec<RuleCategory>,
    /// Reason code when the pass ran degraded; `None` for a genuine
    /// result (including a genuine zero).
    pub degraded: Option<DegradeReason>,
}

impl RiskAssessment {
    /// A genuine zero result: no active rules, or none matched.
    pub fn zero() -> Self {
        Self {
            total_risk_score: 0,
            matched_rules: Vec::new(),
            rule_categories: Vec::new(),
            degraded: None,
        }
    }

    /// A degraded zero result carrying its reason code.
    pub fn degraded(reason: DegradeReason) -> Self {
        Self {
            degraded: Some(reason),
            ..Self::zero()
        }
    }

    /// Whether this result was produced under dependency failure.
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Re-derive the aggregate from the match list.
    ///
    /// The clamped sum of `matched_rules[].risk_score` always equals
    /// `total_risk_score` — this is the reproducibility invariant audit
    /// replay depends on.
    pub fn recomputed_score(&self) -> u8 {
        let sum: u32 = self
            .matched_rules
            .iter()
            .map(|m| u32::from(m.risk_score))
            .sum();
        sum.min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_is_not_degraded() {
        let result = RiskAssessment::zero();
        assert_eq!(result.total_risk_score, 0);
        assert!(!result.is_degraded());
    }

    #[test]
    fn degraded_zero_carries_reason() {
        let result = RiskAssessment::degraded(DegradeReason::RuleSourceUnavailable);
        assert_eq!(result.total_risk_score, 0);
        assert!(result.matched_rules.is_empty());
        assert_eq!(result.degraded, Some(DegradeReason::RuleSourceUnavailable));
    }

    #[test]
    fn rule_roundtrips_with_condition_wire_format() {
        let rule = RiskRule {
            rule_id: RuleId::new("tx-high-amount").unwrap(),
            rule_name: "High amount".into(),
            description: "Single transaction above reporting threshold".into(),
            category: RuleCategory::Transaction,
            condition: Condition::from_value(&json!({">": [{"var": "amount"}, 10000]})),
            risk_score: 25,
            is_active: true,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["condition"], json!({">": [{"var": "amount"}, 10000]}));
        let back: RiskRule = serde_json::from_value(json).unwrap();
        assert_eq!(back.condition, rule.condition);
        assert_eq!(back.risk_score, 25);
    }

    #[test]
    fn category_display() {
        assert_eq!(RuleCategory::Behavioral.to_string(), "behavioral");
    }
}
