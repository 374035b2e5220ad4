//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the Vigil workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Dependency failures (`StoreError`) are a distinct type so service
//!   boundaries can catch and degrade on them without swallowing logic bugs.
//! - State machine errors include the current state, the attempted target,
//!   and the rejection reason.

use thiserror::Error;

/// Errors raised by the foundational types themselves.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A rule identifier failed validation.
    #[error("invalid rule id: {0}")]
    InvalidRuleId(String),

    /// An escalation level outside the 1..=5 ordinal range.
    #[error("escalation level must be in 1..=5, got {0}")]
    InvalidEscalationLevel(u8),

    /// Attempted a case status transition the lifecycle forbids.
    #[error("invalid case transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status name.
        from: &'static str,
        /// Attempted target status name.
        to: &'static str,
    },
}

/// A failure in the external data store or rule source.
///
/// The core treats the store as a black box; every suspension point that
/// crosses the store boundary surfaces failures as this type. Service
/// layers decide per call site whether a `StoreError` degrades (scoring),
/// isolates (batch sweeps), or propagates (escalation mutations).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (e.g. "case", "escalation").
        kind: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The store returned data the core could not decode.
    #[error("malformed store record: {0}")]
    Malformed(String),
}
