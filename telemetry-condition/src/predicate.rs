//! Threshold predicates over mnemonic values
//!
//! A predicate is a single stateless rule (`equal`, `greater`, `smaller`)
//! applied to one sample value. Evaluated against a mnemonic it inherits the
//! step-function semantics: the state at any instant is the rule applied to
//! the last-held value, and `false` before the first sample.

use crate::store::Mnemonic;
use crate::types::{EngineError, Result, Timestamp, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateOp {
    /// Exact equality (numeric or categorical)
    Equal,
    /// Strict numeric greater-than
    Greater,
    /// Strict numeric less-than
    Smaller,
}

impl PredicateOp {
    fn symbol(self) -> &'static str {
        match self {
            PredicateOp::Equal => "==",
            PredicateOp::Greater => ">",
            PredicateOp::Smaller => "<",
        }
    }
}

impl fmt::Display for PredicateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single threshold test against a mnemonic's value
///
/// Pure and stateless: owns only the operator and the comparison threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Comparison operator
    pub op: PredicateOp,
    /// Comparison threshold
    pub threshold: Value,
}

impl Predicate {
    /// `value == threshold` predicate (numeric or categorical)
    pub fn equal(threshold: impl Into<Value>) -> Self {
        Self {
            op: PredicateOp::Equal,
            threshold: threshold.into(),
        }
    }

    /// `value > threshold` predicate (numeric only)
    pub fn greater(threshold: f64) -> Self {
        Self {
            op: PredicateOp::Greater,
            threshold: Value::Number(threshold),
        }
    }

    /// `value < threshold` predicate (numeric only)
    pub fn smaller(threshold: f64) -> Self {
        Self {
            op: PredicateOp::Smaller,
            threshold: Value::Number(threshold),
        }
    }

    /// Apply the predicate to a single value
    ///
    /// Equality compares numbers exactly (no epsilon) and text
    /// case-sensitively; values of different kinds compare unequal. The
    /// ordered operators require numeric operands on both sides and fail
    /// with [`EngineError::TypeMismatch`] otherwise - no silent coercion.
    pub fn eval(&self, value: &Value) -> Result<bool> {
        match self.op {
            PredicateOp::Equal => Ok(match (value, &self.threshold) {
                (Value::Number(a), Value::Number(b)) => a == b,
                (Value::Text(a), Value::Text(b)) => a == b,
                _ => false,
            }),
            PredicateOp::Greater | PredicateOp::Smaller => {
                let v = value.as_number().ok_or_else(|| self.type_mismatch(value))?;
                let t = self
                    .threshold
                    .as_number()
                    .ok_or_else(|| self.type_mismatch(&self.threshold))?;
                Ok(match self.op {
                    PredicateOp::Greater => v > t,
                    PredicateOp::Smaller => v < t,
                    PredicateOp::Equal => unreachable!(),
                })
            }
        }
    }

    /// Predicate state at `time` under step-hold semantics
    ///
    /// `false` before the mnemonic's first sample.
    pub fn state(&self, mnemonic: &Mnemonic, time: Timestamp) -> Result<bool> {
        match mnemonic.value_at(time) {
            Some(value) => self.eval(value),
            None => Ok(false),
        }
    }

    /// Transition points of the predicate over a mnemonic's step function
    ///
    /// Returns the timestamps where the predicate's boolean result changes,
    /// each tagged with the result in effect from that instant on. The first
    /// sample is always included (the implicit state before it is `false`,
    /// so a leading `(t0, false)` entry carries no change and is kept only
    /// when it is the sole information about the series).
    pub(crate) fn transitions(&self, mnemonic: &Mnemonic) -> Result<Vec<(Timestamp, bool)>> {
        let mut points: Vec<(Timestamp, bool)> = Vec::new();
        for sample in mnemonic.samples() {
            let holds = self.eval(&sample.value)?;
            if let Some(last) = points.last_mut() {
                // Same instant: the later sample wins (step-hold tie-break)
                if last.0 == sample.time {
                    last.1 = holds;
                    continue;
                }
                if last.1 == holds {
                    continue;
                }
            }
            points.push((sample.time, holds));
        }
        // Collapse entries made redundant by same-instant overwrites
        points.dedup_by(|next, prev| prev.1 == next.1);
        Ok(points)
    }

    fn type_mismatch(&self, value: &Value) -> EngineError {
        EngineError::TypeMismatch {
            op: self.op.symbol(),
            value: value.to_string(),
        }
    }
}
