//! # vigil-rules — Risk Rule Engine
//!
//! The scoring half of the Vigil compliance core. Compliance operators
//! author declarative rules — a category, a boolean condition tree, and a
//! score weight — and this crate evaluates them against transactions and
//! customer profiles to produce bounded risk assessments with a full audit
//! trail of which rules fired.
//!
//! ## Pieces
//!
//! - **Condition language** (`condition`): a small tagged-union expression
//!   tree (comparisons, membership, and/or, divisibility) with a recursive,
//!   total evaluator. Unknown operators parse to a fail-closed variant that
//!   always evaluates to `false` — a malformed rule can neither authorize
//!   anything nor crash a scoring pass.
//!
//! - **Data preparation** (`prepare`): projections from raw entities into
//!   the flat [`DataRecord`] the evaluator reads, including the behavioral
//!   counters. Synthetic-signal substitution is isolated here.
//!
//! - **Evaluation service** (`evaluation`): fetches active rules through
//!   the [`RuleRepository`] boundary, runs the pure scoring pass, persists
//!   match audit rows, and degrades to an observable zero on dependency
//!   failure.

pub mod condition;
pub mod evaluation;
pub mod prepare;
pub mod record;
pub mod repository;
pub mod rule;

// Re-export primary types.
pub use condition::{CompareOp, Condition, Operand};
pub use evaluation::{score_rules, RiskEvaluationService, ScoredPass};
pub use prepare::{prepare_transaction_data, prepare_user_data, BehavioralSnapshot};
pub use record::DataRecord;
pub use repository::{EntityKind, RuleRepository};
pub use rule::{DegradeReason, MatchData, RiskAssessment, RiskMatch, RiskRule, RuleCategory};
