//! Core types for the telemetry condition engine
//!
//! This module defines the fundamental types the engine operates on. The
//! engine is purely functional over immutable inputs - it consumes loaded
//! telemetry series and produces derived values, it never performs I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the engine
pub type Timestamp = DateTime<Utc>;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while evaluating conditions
///
/// Both variants are local to the condition or extraction that raised them;
/// callers are expected to skip the affected computation and continue with
/// sibling mnemonics rather than abort a whole batch. "No data" is not an
/// error - extraction functions signal it with `None`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Mnemonic not found: {0}")]
    MnemonicNotFound(String),

    #[error("Type mismatch: '{op}' comparison against non-numeric value {value}")]
    TypeMismatch {
        /// The ordered operator that was applied
        op: &'static str,
        /// Display form of the offending value
        value: String,
    },
}

/// A single telemetry reading: numeric or categorical
///
/// Engineering telemetry mixes continuous readings (voltages, ratios) with
/// discrete status values ("OFF", "DETECTOR_READY"). Both appear in the
/// same sample streams, so the scalar type carries either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Continuous numeric reading
    Number(f64),
    /// Discrete categorical value (status words, position labels)
    Text(String),
}

impl Value {
    /// Numeric view of the value, `None` for categorical values
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    /// Categorical view of the value, `None` for numeric values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(v) => Some(v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A single timestamped sample belonging to exactly one mnemonic
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Sample time
    pub time: Timestamp,
    /// Sampled value
    pub value: Value,
}

impl Sample {
    /// Create a new sample
    pub fn new(time: Timestamp, value: impl Into<Value>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}
