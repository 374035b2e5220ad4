//! # vigil-core — Foundational Types for the Vigil Compliance Core
//!
//! This crate is the bedrock of the Vigil workspace. It defines the shared
//! type-system primitives every other crate builds on. It depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `UserId`, `CaseId`,
//!    `TransactionId`, `EscalationId`, `RuleId` — all newtypes. No bare
//!    strings or naked UUIDs crossing crate boundaries.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC at seconds
//!    precision, so audit records and SLA arithmetic are deterministic and
//!    reproducible across replays.
//!
//! 3. **Runtime-validated case lifecycle.** `CaseStatus` owns its transition
//!    table; the workflow and escalation layers cannot drive a case out of a
//!    terminal state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vigil-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod case;
pub mod entity;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use case::{Assignee, CasePriority, CaseStatus, CaseType, ComplianceCase};
pub use entity::{
    CaseDocument, DocumentStatus, KycStatus, PaymentMethod, ScoredTransaction, Transaction,
    TransactionChannel, UserProfile,
};
pub use error::{CoreError, StoreError};
pub use identity::{
    CaseId, DocumentId, EscalationId, NotificationId, RuleId, SlaId, TransactionId, UserId,
};
pub use temporal::Timestamp;
