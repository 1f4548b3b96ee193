//! Externally supplied configuration tables
//!
//! Condition sets and wheel-position nominals come from the surrounding
//! application's configuration; the engine never parses config files itself.
//! The types here are plain serde-deserializable values with builder methods
//! for programmatic construction.

use crate::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a condition set: a predicate bound to a mnemonic identifier
///
/// Deserializes from e.g. `{"mnemonic": "SE_ZIMIRICEA", "op": "greater",
/// "threshold": 0.2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateSpec {
    /// Identifier of the mnemonic the predicate applies to
    pub mnemonic: String,
    /// The predicate itself
    #[serde(flatten)]
    pub predicate: Predicate,
}

impl PredicateSpec {
    /// Create a new spec binding `predicate` to `mnemonic`
    pub fn new(mnemonic: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            predicate,
        }
    }
}

/// Expected reference values for discrete position labels
///
/// Maps each position label of a wheel-position mnemonic to the nominal
/// value its continuous ratio reading should sit near, together with the
/// allowed absolute deviation and the sentinel label marking an unknown
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalsTable {
    /// Position label -> expected ratio value
    #[serde(default)]
    pub nominals: HashMap<String, f64>,

    /// Allowed absolute deviation from a nominal for a match to count
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Sentinel label for an unknown position (skipped with a warning)
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
}

fn default_tolerance() -> f64 {
    0.5
}

fn default_unknown_label() -> String {
    "UNKNOWN".to_string()
}

impl Default for NominalsTable {
    fn default() -> Self {
        Self {
            nominals: HashMap::new(),
            tolerance: default_tolerance(),
            unknown_label: default_unknown_label(),
        }
    }
}

impl NominalsTable {
    /// Create a new table with default tolerance and sentinel
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a nominal value for a position label
    pub fn with_nominal(mut self, label: impl Into<String>, value: f64) -> Self {
        self.nominals.insert(label.into(), value);
        self
    }

    /// Builder method: set the match tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: set the unknown-position sentinel label
    pub fn with_unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    /// Nominal value for a position label, if configured
    pub fn get(&self, label: &str) -> Option<f64> {
        self.nominals.get(label).copied()
    }
}
