//! # Escalation Levels and Rules
//!
//! The ordinal severity ladder (levels 1..=5) and the operator-configured
//! rules that push cases up it automatically.

use serde::{Deserialize, Serialize};

use vigil_core::{CasePriority, ComplianceCase, CoreError, Timestamp, UserId};

/// An escalation level, 1 (lowest) through 5 (highest).
///
/// Validated at construction and at deserialization; an out-of-range
/// ordinal cannot enter the system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct EscalationLevel(u8);

impl EscalationLevel {
    /// The lowest rung.
    pub const MIN: EscalationLevel = EscalationLevel(1);
    /// The highest rung — sanctions hits go straight here.
    pub const MAX: EscalationLevel = EscalationLevel(5);

    /// Create a level, rejecting ordinals outside 1..=5.
    pub fn new(level: u8) -> Result<Self, CoreError> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CoreError::InvalidEscalationLevel(level))
        }
    }

    /// The ordinal value.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// One rung up, saturating at the maximum.
    pub fn next(&self) -> EscalationLevel {
        Self((self.0 + 1).min(Self::MAX.0))
    }
}

impl TryFrom<u8> for EscalationLevel {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<EscalationLevel> for u8 {
    fn from(level: EscalationLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An operator-configured condition for auto-escalating a case.
///
/// Thresholds are opt-in: only the ones set participate in matching, and
/// every set threshold must pass. Authored through the external
/// rule-management surface; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRule {
    /// Stable rule identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the rule is for.
    pub description: String,
    /// Case priority at or above which the rule applies.
    pub min_priority: Option<CasePriority>,
    /// Case risk score at or above which the rule applies.
    pub min_risk_score: Option<u8>,
    /// Case age in hours at or above which the rule applies.
    pub time_threshold_hours: Option<u32>,
    /// The level a matching case is escalated to.
    pub escalation_level: EscalationLevel,
    /// Role to route the case to, when `auto_assign` is set.
    pub target_role: Option<String>,
    /// Specific user to route the case to, when `auto_assign` is set.
    pub target_user_id: Option<UserId>,
    /// Whether a match reassigns the case to the targets above.
    pub auto_assign: bool,
    /// Whether a match dispatches notifications.
    pub send_notifications: bool,
    /// Whether a match boosts the case priority one step.
    pub priority_boost: bool,
    /// Whether the rule participates in checks.
    pub is_active: bool,
}

impl EscalationRule {
    /// Evaluate the rule against a case's current priority, risk score,
    /// and age. Returns the human-readable match reason when every set
    /// threshold passes, `None` otherwise.
    ///
    /// A rule with no thresholds set matches every case vacuously.
    pub fn matches(&self, case: &ComplianceCase, now: Timestamp) -> Option<String> {
        if !self.is_active {
            return None;
        }
        let mut reasons = Vec::new();
        if let Some(min_priority) = self.min_priority {
            if case.priority < min_priority {
                return None;
            }
            reasons.push(format!("priority {} >= {}", case.priority, min_priority));
        }
        if let Some(min_risk) = self.min_risk_score {
            if case.risk_score < min_risk {
                return None;
            }
            reasons.push(format!("risk score {} >= {}", case.risk_score, min_risk));
        }
        if let Some(age_threshold) = self.time_threshold_hours {
            let age = case.age_hours(now);
            if age < i64::from(age_threshold) {
                return None;
            }
            reasons.push(format!("case age {age}h >= {age_threshold}h"));
        }
        if reasons.is_empty() {
            reasons.push("no thresholds configured".to_string());
        }
        Some(format!("{}: {}", self.name, reasons.join(", ")))
    }
}

/// The outcome of checking one escalation rule against one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationCheckResult {
    /// The rule that matched.
    pub rule_id: String,
    /// Whether the case should be escalated (always `true` for results
    /// returned by a check; carried for serialized consumers).
    pub should_escalate: bool,
    /// The level to escalate to.
    pub escalation_level: EscalationLevel,
    /// Role target from the rule, when auto-assignment applies.
    pub target_role: Option<String>,
    /// User target from the rule, when auto-assignment applies.
    pub target_user_id: Option<UserId>,
    /// Human-readable match reason for audit display.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{CaseType, UserId};

    fn rule() -> EscalationRule {
        EscalationRule {
            id: "stale-high-priority".into(),
            name: "Stale high-priority case".into(),
            description: "High cases untouched past a day".into(),
            min_priority: Some(CasePriority::High),
            min_risk_score: None,
            time_threshold_hours: Some(24),
            escalation_level: EscalationLevel::new(2).unwrap(),
            target_role: Some("compliance_officer".into()),
            target_user_id: None,
            auto_assign: true,
            send_notifications: true,
            priority_boost: true,
            is_active: true,
        }
    }

    fn case(priority: CasePriority, risk: u8, age_hours: u32) -> ComplianceCase {
        let mut case = ComplianceCase::new(
            UserId::new(),
            CaseType::AmlAlert,
            priority,
            risk,
            "test case",
        );
        case.created_at = Timestamp::now().minus_hours(age_hours);
        case
    }

    // ── Levels ───────────────────────────────────────────────────────

    #[test]
    fn level_rejects_out_of_range() {
        assert!(EscalationLevel::new(0).is_err());
        assert!(EscalationLevel::new(6).is_err());
        assert!(EscalationLevel::new(1).is_ok());
        assert!(EscalationLevel::new(5).is_ok());
    }

    #[test]
    fn level_next_saturates() {
        assert_eq!(EscalationLevel::MIN.next().get(), 2);
        assert_eq!(EscalationLevel::MAX.next(), EscalationLevel::MAX);
    }

    #[test]
    fn level_ordering() {
        assert!(EscalationLevel::MIN < EscalationLevel::MAX);
    }

    #[test]
    fn level_deserialization_validates() {
        let ok: Result<EscalationLevel, _> = serde_json::from_str("3");
        assert_eq!(ok.unwrap().get(), 3);
        let bad: Result<EscalationLevel, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }

    // ── Rule matching ────────────────────────────────────────────────

    #[test]
    fn all_set_thresholds_must_pass() {
        let rule = rule();
        let now = Timestamp::now();
        // Meets both thresholds.
        assert!(rule.matches(&case(CasePriority::High, 10, 30), now).is_some());
        // Too young.
        assert!(rule.matches(&case(CasePriority::High, 10, 1), now).is_none());
        // Priority too low.
        assert!(rule.matches(&case(CasePriority::Medium, 10, 30), now).is_none());
    }

    #[test]
    fn critical_satisfies_min_priority_high() {
        let rule = rule();
        let now = Timestamp::now();
        assert!(rule
            .matches(&case(CasePriority::Critical, 10, 30), now)
            .is_some());
    }

    #[test]
    fn inactive_rule_never_matches() {
        let mut rule = rule();
        rule.is_active = false;
        assert!(rule
            .matches(&case(CasePriority::Critical, 99, 99), Timestamp::now())
            .is_none());
    }

    #[test]
    fn risk_threshold_checked_when_set() {
        let mut rule = rule();
        rule.min_risk_score = Some(80);
        let now = Timestamp::now();
        assert!(rule.matches(&case(CasePriority::High, 79, 30), now).is_none());
        assert!(rule.matches(&case(CasePriority::High, 80, 30), now).is_some());
    }

    #[test]
    fn thresholdless_rule_matches_vacuously() {
        let mut rule = rule();
        rule.min_priority = None;
        rule.time_threshold_hours = None;
        let reason = rule
            .matches(&case(CasePriority::Low, 0, 0), Timestamp::now())
            .unwrap();
        assert!(reason.contains("no thresholds configured"));
    }

    #[test]
    fn match_reason_names_the_passing_thresholds() {
        let reason = rule()
            .matches(&case(CasePriority::High, 10, 30), Timestamp::now())
            .unwrap();
        assert!(reason.contains("priority high >= high"));
        assert!(reason.contains("case age 30h >= 24h"));
    }
}
