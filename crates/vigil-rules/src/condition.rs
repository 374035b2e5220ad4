//! # Condition Language
//!
//! The boolean expression trees risk rules are written in. A condition is
//! a tagged union — comparisons, membership, conjunction/disjunction, and
//! a divisibility check — evaluated recursively against a [`DataRecord`].
//!
//! ## Wire Format
//!
//! Rules are authored and stored as single-key JSON objects:
//!
//! ```json
//! {"and": [
//!     {">":  [{"var": "amount"}, 10000]},
//!     {"in": [{"var": "receiver_country"}, ["IR", "KP", "SY"]]}
//! ]}
//! ```
//!
//! Custom serde preserves that format while the in-memory representation
//! stays an exhaustively matched enum. An unknown operator does not fail
//! deserialization — it parses to [`Condition::Unsupported`], which always
//! evaluates to `false`. Fail-closed: a malformed rule can neither
//! authorize something it shouldn't nor crash a scoring pass.
//!
//! ## Evaluation Semantics
//!
//! - Variable references (`{"var": "dot.path"}`) resolve against the
//!   record; a missing path yields JSON null, never an error.
//! - Ordering comparisons require both operands numeric; otherwise `false`.
//! - Equality is deep JSON equality with numeric values compared by value
//!   (`1 == 1.0`); inequality is its negation.
//! - Membership requires the haystack to resolve to an array.
//! - `All([])` is `true`, `Any([])` is `false`.
//! - Divisibility requires numeric operands and a nonzero modulus.
//!
//! Evaluation is pure: no I/O, no mutation, identical inputs give
//! identical output — a requirement for deterministic audit replay.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::record::DataRecord;

/// One side of a comparison: a literal or a variable reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal JSON value.
    Literal(Value),
    /// A reference to a dot-separated path in the data record.
    Var {
        /// The dot-separated path.
        path: String,
    },
}

impl Operand {
    /// A literal operand.
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A variable reference operand.
    pub fn var(path: impl Into<String>) -> Self {
        Self::Var { path: path.into() }
    }

    /// Resolve against a record. Missing paths yield JSON null.
    pub fn resolve(&self, data: &DataRecord) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Var { path } => data.get_path(path).cloned().unwrap_or(Value::Null),
        }
    }

    fn from_value(value: &Value) -> Self {
        if let Value::Object(map) = value {
            if map.len() == 1 {
                if let Some(Value::String(path)) = map.get("var") {
                    return Self::Var { path: path.clone() };
                }
            }
        }
        Self::Literal(value.clone())
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Var { path } => json!({ "var": path }),
        }
    }
}

/// The six binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CompareOp {
    /// The wire-format symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }
}

/// A boolean condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Binary comparison of two operands.
    Compare {
        /// The operator.
        op: CompareOp,
        /// Left-hand operand.
        lhs: Operand,
        /// Right-hand operand.
        rhs: Operand,
    },
    /// Membership test: needle contained in an array haystack.
    Membership {
        /// The value to look for.
        needle: Operand,
        /// The array to look in.
        haystack: Operand,
    },
    /// Conjunction — every child must hold. Empty is `true`.
    All(Vec<Condition>),
    /// Disjunction — at least one child must hold. Empty is `false`.
    Any(Vec<Condition>),
    /// Divisibility check: `value % modulus == 0`.
    DivisibleBy {
        /// The dividend.
        value: Operand,
        /// The divisor.
        modulus: Operand,
    },
    /// An operator this engine does not recognize, or a recognized
    /// operator with malformed operands. Always evaluates to `false`.
    Unsupported {
        /// The offending operator key, for operator-facing logs.
        operator: String,
    },
}

impl Condition {
    /// Shorthand for a comparison condition.
    pub fn compare(op: CompareOp, lhs: Operand, rhs: Operand) -> Self {
        Self::Compare { op, lhs, rhs }
    }

    /// Shorthand for a membership condition.
    pub fn membership(needle: Operand, haystack: Operand) -> Self {
        Self::Membership { needle, haystack }
    }

    /// Evaluate the condition against a prepared record.
    ///
    /// Total and pure: never errors, never mutates, deterministic.
    pub fn evaluate(&self, data: &DataRecord) -> bool {
        match self {
            Self::Compare { op, lhs, rhs } => {
                let lhs = lhs.resolve(data);
                let rhs = rhs.resolve(data);
                match op {
                    CompareOp::Eq => value_eq(&lhs, &rhs),
                    CompareOp::Ne => !value_eq(&lhs, &rhs),
                    ordering => match (as_number(&lhs), as_number(&rhs)) {
                        (Some(l), Some(r)) => match ordering {
                            CompareOp::Gt => l > r,
                            CompareOp::Lt => l < r,
                            CompareOp::Ge => l >= r,
                            CompareOp::Le => l <= r,
                            // Eq/Ne handled above.
                            CompareOp::Eq | CompareOp::Ne => false,
                        },
                        _ => false,
                    },
                }
            }
            Self::Membership { needle, haystack } => {
                let needle = needle.resolve(data);
                match haystack.resolve(data) {
                    Value::Array(items) => items.iter().any(|item| value_eq(item, &needle)),
                    _ => false,
                }
            }
            Self::All(children) => children.iter().all(|child| child.evaluate(data)),
            Self::Any(children) => children.iter().any(|child| child.evaluate(data)),
            Self::DivisibleBy { value, modulus } => {
                match (
                    as_number(&value.resolve(data)),
                    as_number(&modulus.resolve(data)),
                ) {
                    (Some(v), Some(m)) if m != 0.0 => (v % m).abs() < 1e-9,
                    _ => false,
                }
            }
            Self::Unsupported { operator } => {
                tracing::warn!(
                    operator = %operator,
                    "unsupported condition operator, evaluating to false"
                );
                false
            }
        }
    }

    /// Parse a condition from its wire-format JSON value.
    ///
    /// Total: any shape this engine does not recognize becomes
    /// [`Condition::Unsupported`] rather than an error.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Unsupported {
                operator: "<non-object condition>".into(),
            };
        };
        if map.len() != 1 {
            return Self::Unsupported {
                operator: "<multi-key condition>".into(),
            };
        }
        let Some((operator, operands)) = map.iter().next() else {
            return Self::Unsupported {
                operator: "<empty condition>".into(),
            };
        };

        match operator.as_str() {
            "and" | "or" => {
                let Value::Array(items) = operands else {
                    return Self::Unsupported {
                        operator: operator.clone(),
                    };
                };
                let children = items.iter().map(Self::from_value).collect();
                if operator == "and" {
                    Self::All(children)
                } else {
                    Self::Any(children)
                }
            }
            "in" => match binary_operands(operands) {
                Some((needle, haystack)) => Self::Membership { needle, haystack },
                None => Self::Unsupported {
                    operator: operator.clone(),
                },
            },
            "%" => match binary_operands(operands) {
                Some((value, modulus)) => Self::DivisibleBy { value, modulus },
                None => Self::Unsupported {
                    operator: operator.clone(),
                },
            },
            symbol => match (CompareOp::from_symbol(symbol), binary_operands(operands)) {
                (Some(op), Some((lhs, rhs))) => Self::Compare { op, lhs, rhs },
                _ => Self::Unsupported {
                    operator: operator.clone(),
                },
            },
        }
    }

    /// Render the condition in its wire format.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Compare { op, lhs, rhs } => {
                json!({ (op.symbol()): [lhs.to_value(), rhs.to_value()] })
            }
            Self::Membership { needle, haystack } => {
                json!({ "in": [needle.to_value(), haystack.to_value()] })
            }
            Self::All(children) => {
                json!({ "and": children.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
            Self::Any(children) => {
                json!({ "or": children.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
            Self::DivisibleBy { value, modulus } => {
                json!({ "%": [value.to_value(), modulus.to_value()] })
            }
            Self::Unsupported { operator } => json!({ (operator.clone()): Value::Null }),
        }
    }
}

/// Extract exactly two operands from a wire-format operand array.
fn binary_operands(operands: &Value) -> Option<(Operand, Operand)> {
    match operands {
        Value::Array(items) if items.len() == 2 => Some((
            Operand::from_value(&items[0]),
            Operand::from_value(&items[1]),
        )),
        _ => None,
    }
}

/// Deep JSON equality with numbers compared by value.
///
/// `serde_json` distinguishes integer and float representations of the
/// same number; rule authors do not.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
