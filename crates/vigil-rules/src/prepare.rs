//! # Entity Data Preparation
//!
//! Projects raw entities into the flat [`DataRecord`] the condition
//! evaluator reads. Rule authors write conditions against the field names
//! produced here, so the projection is part of the rule language's public
//! surface — renaming a field silently disables every rule that
//! references it.
//!
//! ## Behavioral Counters
//!
//! Time-windowed behavioral signals (24 h frequency, recipient spread,
//! country spread) require aggregation the scoring path cannot perform
//! itself. Callers that have run the aggregation supply a
//! [`BehavioralSnapshot`]; without one, the counters take neutral zero
//! defaults and the record carries `behavioral.defaulted = true` so
//! behavioral rules can opt out of defaulted data. The substitution is
//! deterministic and confined to this module — swapping in a real
//! aggregation source touches nothing in the evaluator or services.

use chrono::{Datelike, Timelike};

use vigil_core::{KycStatus, Timestamp, Transaction, UserProfile};

use crate::record::DataRecord;

/// ISO 3166-1 alpha-2 codes of the EU member states, used for the
/// EU/non-EU corridor flags.
pub const EU_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// KYC completion percentage projected for `kyc_completion` conditions.
const KYC_COMPLETION_VERIFIED: u8 = 100;
const KYC_COMPLETION_IN_REVIEW: u8 = 60;
const KYC_COMPLETION_NONE: u8 = 20;

/// Neutral CDD score projected when due diligence has not been assessed.
const CDD_SCORE_UNASSESSED: u8 = 50;

/// Externally aggregated, time-windowed behavioral counters for one
/// customer, as of the moment the transaction is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehavioralSnapshot {
    /// Transactions in the trailing 24 hours.
    pub tx_count_24h: u32,
    /// Unique recipients in the trailing 7 days.
    pub unique_recipients_7d: u32,
    /// Unique destination countries in the trailing 30 days.
    pub unique_countries_30d: u32,
    /// Unique non-EU destination countries in the trailing 30 days.
    pub non_eu_countries_30d: u32,
}

fn is_eu(country: &str) -> bool {
    EU_COUNTRIES.contains(&country)
}

/// Project a transaction into the record its rules are evaluated against.
///
/// Total: never fails, never panics. Field inventory:
/// `amount`, `currency`, `sender_country`, `receiver_country`,
/// `sender_is_eu`, `receiver_is_eu`, `is_cross_border`, `hour_of_day`,
/// `payment_method`, `channel`, `is_cash`, and the nested `behavioral`
/// object (`defaulted`, `tx_count_24h`, `unique_recipients_7d`,
/// `unique_countries_30d`, `non_eu_countries_30d`).
pub fn prepare_transaction_data(
    tx: &Transaction,
    behavioral: Option<&BehavioralSnapshot>,
) -> DataRecord {
    let mut record = DataRecord::new();
    record.insert("amount", tx.amount);
    record.insert("currency", tx.currency.clone());
    record.insert("sender_country", tx.sender_country.clone());
    record.insert("receiver_country", tx.receiver_country.clone());
    record.insert("sender_is_eu", is_eu(&tx.sender_country));
    record.insert("receiver_is_eu", is_eu(&tx.receiver_country));
    record.insert("is_cross_border", tx.sender_country != tx.receiver_country);
    record.insert("hour_of_day", tx.occurred_at.as_datetime().hour());
    record.insert(
        "payment_method",
        serde_json::to_value(tx.payment_method).unwrap_or(serde_json::Value::Null),
    );
    record.insert(
        "channel",
        serde_json::to_value(tx.channel).unwrap_or(serde_json::Value::Null),
    );
    record.insert(
        "is_cash",
        matches!(tx.payment_method, vigil_core::PaymentMethod::Cash),
    );

    let defaulted = behavioral.is_none();
    let snapshot = behavioral.copied().unwrap_or_default();
    let mut counters = DataRecord::new();
    counters.insert("defaulted", defaulted);
    counters.insert("tx_count_24h", snapshot.tx_count_24h);
    counters.insert("unique_recipients_7d", snapshot.unique_recipients_7d);
    counters.insert("unique_countries_30d", snapshot.unique_countries_30d);
    counters.insert("non_eu_countries_30d", snapshot.non_eu_countries_30d);
    record.insert_nested("behavioral", counters);

    record
}

/// Project a customer profile into the record its rules are evaluated
/// against, as of `as_of` (age derivation).
///
/// Total: never fails, never panics. Missing optional inputs degrade to
/// documented defaults: unknown date of birth omits `age` (a missing
/// path evaluates as null), unaggregated volume projects `0.0`, an
/// unassessed CDD score projects the neutral midpoint.
pub fn prepare_user_data(user: &UserProfile, as_of: Timestamp) -> DataRecord {
    let mut record = DataRecord::new();
    record.insert("is_pep", user.is_pep);
    record.insert("is_sanctioned", user.is_sanctioned);
    record.insert(
        "kyc_status",
        serde_json::to_value(user.kyc_status).unwrap_or(serde_json::Value::Null),
    );
    record.insert("kyc_completion", kyc_completion(user.kyc_status));
    if let Some(dob) = user.date_of_birth {
        let today = as_of.as_datetime().date_naive();
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        record.insert("age", age.max(0));
    }
    if let Some(nationality) = &user.nationality {
        record.insert("nationality", nationality.clone());
        record.insert("nationality_is_eu", is_eu(nationality));
    }
    record.insert("monthly_volume", user.monthly_volume.unwrap_or(0.0));
    record.insert("cdd_score", user.cdd_score.unwrap_or(CDD_SCORE_UNASSESSED));
    record.insert("risk_score", user.risk_score);
    record.insert("transaction_count", user.transactions.len() as u64);
    record.insert(
        "high_risk_transaction_count",
        user.high_risk_transaction_count(70) as u64,
    );
    record.insert("pending_document_count", user.pending_document_count() as u64);
    record
}

fn kyc_completion(status: KycStatus) -> u8 {
    match status {
        KycStatus::Verified => KYC_COMPLETION_VERIFIED,
        KycStatus::Submitted | KycStatus::InformationRequested => KYC_COMPLETION_IN_REVIEW,
        KycStatus::Unverified | KycStatus::Rejected => KYC_COMPLETION_NONE,
    }
}
