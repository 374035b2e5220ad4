//! # Notification Intents
//!
//! The escalation workflow creates notification *records*; an external
//! dispatcher owns delivery and writes the `delivered_at` / `read_at`
//! stamps back. The core never blocks on delivery.

use serde::{Deserialize, Serialize};

use vigil_core::{CaseId, NotificationId, Timestamp, UserId};

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipient {
    /// A specific user.
    User {
        /// The user's id.
        user_id: UserId,
    },
    /// Everyone holding a role.
    Role {
        /// The role name.
        role: String,
    },
    /// A raw email address.
    Email {
        /// The address.
        address: String,
    },
}

/// How the notification should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Email delivery.
    Email,
    /// In-app inbox delivery.
    InApp,
}

/// A notification intent created by the escalation workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique record identifier.
    pub id: NotificationId,
    /// The case the notification is about.
    pub case_id: CaseId,
    /// The addressee.
    pub recipient: Recipient,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Delivery channel.
    pub channel: NotificationChannel,
    /// When the intent was created.
    pub created_at: Timestamp,
    /// Set by the external dispatcher on delivery. Never written here.
    pub delivered_at: Option<Timestamp>,
    /// Set by the external dispatcher when read. Never written here.
    pub read_at: Option<Timestamp>,
}

impl Notification {
    /// Create a fresh, undelivered intent.
    pub fn new(
        case_id: CaseId,
        recipient: Recipient,
        subject: impl Into<String>,
        body: impl Into<String>,
        channel: NotificationChannel,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            case_id,
            recipient,
            subject: subject.into(),
            body: body.into(),
            channel,
            created_at: Timestamp::now(),
            delivered_at: None,
            read_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_intent_is_undelivered() {
        let n = Notification::new(
            CaseId::new(),
            Recipient::Role {
                role: "compliance_officer".into(),
            },
            "Case escalated",
            "Case escalated to level 2",
            NotificationChannel::Email,
        );
        assert!(n.delivered_at.is_none());
        assert!(n.read_at.is_none());
    }

    #[test]
    fn recipient_serde_is_tagged() {
        let recipient = Recipient::User {
            user_id: UserId::new(),
        };
        let json = serde_json::to_value(&recipient).unwrap();
        assert_eq!(json["kind"], "user");
    }
}
