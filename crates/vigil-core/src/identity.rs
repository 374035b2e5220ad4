//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the Vigil workspace. These
//! prevent accidental identifier confusion — you cannot pass a `UserId`
//! where a `CaseId` is expected, and audit rows cannot silently swap an
//! escalation id for an SLA id.
//!
//! Generated identifiers are UUIDv4. `RuleId` is the exception: risk rules
//! are authored by compliance operators and carry stable human-assigned
//! identifiers, so it wraps a validated non-empty string instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a customer under monitoring.
    UserId,
    "user"
);
uuid_id!(
    /// Unique identifier for a compliance case.
    CaseId,
    "case"
);
uuid_id!(
    /// Unique identifier for a financial transaction.
    TransactionId,
    "txn"
);
uuid_id!(
    /// Unique identifier for a KYC document.
    DocumentId,
    "doc"
);
uuid_id!(
    /// Unique identifier for an escalation history row.
    EscalationId,
    "esc"
);
uuid_id!(
    /// Unique identifier for an SLA tracking timer.
    SlaId,
    "sla"
);
uuid_id!(
    /// Unique identifier for a notification intent.
    NotificationId,
    "notif"
);

/// Stable, operator-authored identifier of a risk rule.
///
/// Rule ids appear in every `RiskMatch` audit row, so they must survive
/// rule edits — hence a string key rather than a generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    /// Create a rule id from a non-empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::InvalidRuleId(
                "rule id must be non-empty".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Access the string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_distinct() {
        assert_ne!(CaseId::new(), CaseId::new());
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn display_is_namespaced() {
        let id = CaseId::new();
        assert!(id.to_string().starts_with("case:"));
        let id = EscalationId::new();
        assert!(id.to_string().starts_with("esc:"));
    }

    #[test]
    fn rule_id_rejects_empty() {
        assert!(RuleId::new("").is_err());
        assert!(RuleId::new("   ").is_err());
        assert!(RuleId::new("tx-high-amount").is_ok());
    }

    #[test]
    fn rule_id_display_is_bare() {
        let id = RuleId::new("tx-high-amount").unwrap();
        assert_eq!(id.to_string(), "tx-high-amount");
    }

    #[test]
    fn ids_serde_roundtrip() {
        let id = SlaId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: SlaId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
