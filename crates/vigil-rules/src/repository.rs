//! # Rule Repository Boundary
//!
//! The engine's narrow interface to the external rule source and match
//! audit sink. Rules are authored through external CRUD surfaces; the
//! engine only fetches the active set and appends match records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vigil_core::{RuleId, StoreError};

use crate::rule::{MatchData, RiskRule, RuleCategory};

/// The kind of entity a match audit row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A financial transaction.
    Transaction,
    /// A customer profile.
    User,
}

impl EntityKind {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the active rule set and write access to the match
/// audit trail.
///
/// Implementations live outside the core (database, HTTP rule service).
/// Both methods are suspension points; the evaluation service catches
/// `fetch_active_rules` failures at its boundary (degrading to an
/// observable zero) and logs `record_match` failures without aborting
/// the scoring pass.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// The active rules in the given categories, in the source's order.
    async fn fetch_active_rules(
        &self,
        categories: &[RuleCategory],
    ) -> Result<Vec<RiskRule>, StoreError>;

    /// Append one match audit row. Never updated or deleted afterwards.
    async fn record_match(
        &self,
        entity_id: &str,
        entity_kind: EntityKind,
        rule_id: &RuleId,
        match_data: &MatchData,
    ) -> Result<(), StoreError>;
}
