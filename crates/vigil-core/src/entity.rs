//! # Entity Projections
//!
//! The read-only views of customers and transactions that the scoring and
//! workflow layers consume. The core does not own these records — the
//! surrounding system materializes them and hands them in; nothing here is
//! ever written back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identity::{DocumentId, TransactionId, UserId};
use crate::temporal::Timestamp;

/// How a transaction was funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment.
    Card,
    /// Bank-to-bank transfer.
    BankTransfer,
    /// Physical cash deposit or withdrawal.
    Cash,
    /// Stored-value wallet.
    Wallet,
}

/// The channel a transaction arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionChannel {
    /// Web or API origination.
    Online,
    /// In-branch origination.
    Branch,
    /// ATM origination.
    Atm,
    /// Mobile app origination.
    Mobile,
}

/// A financial transaction to be scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// The customer who initiated the transaction.
    pub user_id: UserId,
    /// Amount in the account currency.
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// ISO 3166-1 alpha-2 country of the sender.
    pub sender_country: String,
    /// ISO 3166-1 alpha-2 country of the receiver.
    pub receiver_country: String,
    /// How the transaction was funded.
    pub payment_method: PaymentMethod,
    /// The origination channel.
    pub channel: TransactionChannel,
    /// When the transaction occurred.
    pub occurred_at: Timestamp,
}

/// KYC verification state of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// No KYC submission yet.
    Unverified,
    /// Submitted, awaiting review.
    Submitted,
    /// Reviewer asked for more information.
    InformationRequested,
    /// Fully verified.
    Verified,
    /// Submission rejected.
    Rejected,
}

impl KycStatus {
    /// The string value used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Submitted => "submitted",
            Self::InformationRequested => "information_requested",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a KYC document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Uploaded, not yet reviewed.
    Pending,
    /// Accepted by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

/// A transaction reference with its individually assessed risk score,
/// as carried on a customer's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredTransaction {
    /// The transaction.
    pub transaction_id: TransactionId,
    /// Its individual risk score, 0..=100.
    pub risk_score: u8,
}

/// A document reference with its review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDocument {
    /// The document.
    pub document_id: DocumentId,
    /// Its review state.
    pub status: DocumentStatus,
}

/// A customer's compliance profile: the inputs the scoring and workflow
/// layers read. PEP and sanctions flags are maintained by the screening
/// subsystem; the transaction and document histories are the customer's
/// current snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique customer identifier.
    pub user_id: UserId,
    /// Display name, used in case narratives.
    pub full_name: String,
    /// Politically exposed person flag.
    pub is_pep: bool,
    /// Sanctions list hit flag.
    pub is_sanctioned: bool,
    /// Current KYC verification state.
    pub kyc_status: KycStatus,
    /// Date of birth, when known.
    pub date_of_birth: Option<NaiveDate>,
    /// Nationality as ISO 3166-1 alpha-2, when known.
    pub nationality: Option<String>,
    /// Rolling monthly volume in account currency, when aggregated.
    pub monthly_volume: Option<f64>,
    /// Customer due diligence score (0..=100), when assessed.
    pub cdd_score: Option<u8>,
    /// Current overall risk score, 0..=100.
    pub risk_score: u8,
    /// Scored transaction history snapshot.
    pub transactions: Vec<ScoredTransaction>,
    /// Document set snapshot.
    pub documents: Vec<CaseDocument>,
}

impl UserProfile {
    /// A minimal profile with everything optional absent and clean flags.
    ///
    /// Test and ingestion convenience — production callers populate the
    /// snapshot fields from the screening and history subsystems.
    pub fn bare(user_id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
            is_pep: false,
            is_sanctioned: false,
            kyc_status: KycStatus::Unverified,
            date_of_birth: None,
            nationality: None,
            monthly_volume: None,
            cdd_score: None,
            risk_score: 0,
            transactions: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// Count of history transactions whose individual score exceeds
    /// `threshold`.
    pub fn high_risk_transaction_count(&self, threshold: u8) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.risk_score > threshold)
            .count()
    }

    /// Count of documents still pending review.
    pub fn pending_document_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Pending)
            .count()
    }
}
