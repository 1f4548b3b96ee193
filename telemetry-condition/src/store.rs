//! Mnemonic store
//!
//! A mnemonic is a named, time-ordered telemetry series with last-value-hold
//! semantics: its value at any instant is the value of the latest sample at
//! or before that instant, and it is undefined before the first sample.
//! Series are immutable once built. Loading and parsing them is the job of
//! external collaborators; the engine only consumes the store interface.

use crate::types::{EngineError, Result, Sample, Timestamp, Value};
use std::collections::HashMap;

/// A named telemetry series interpreted as a step function
#[derive(Debug, Clone, PartialEq)]
pub struct Mnemonic {
    /// Mnemonic identifier (e.g., "IMIR_HK_ICE_SEC_VOLT1")
    id: String,
    /// Samples sorted by time, non-decreasing
    samples: Vec<Sample>,
}

impl Mnemonic {
    /// Create a mnemonic from an identifier and its samples
    ///
    /// Samples are sorted by time on ingest so the step-function invariant
    /// holds regardless of input order. The sort is stable: samples sharing
    /// a timestamp keep their input order, and the last one wins for
    /// step-hold lookups.
    pub fn new(id: impl Into<String>, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.time);
        Self {
            id: id.into(),
            samples,
        }
    }

    /// Mnemonic identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the first sample
    pub fn first_time(&self) -> Option<Timestamp> {
        self.samples.first().map(|s| s.time)
    }

    /// Time of the last sample
    pub fn last_time(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.time)
    }

    /// Step-function value at `time`: the value of the latest sample with
    /// `sample.time <= time`, or `None` before the first sample
    pub fn value_at(&self, time: Timestamp) -> Option<&Value> {
        let idx = self.samples.partition_point(|s| s.time <= time);
        if idx == 0 {
            None
        } else {
            Some(&self.samples[idx - 1].value)
        }
    }
}

/// Read-only mapping from identifier to loaded mnemonic series
///
/// Implemented by whatever loads the telemetry (file reader, database
/// client); the engine only ever calls `get`.
pub trait MnemonicStore {
    /// Look up a mnemonic by identifier
    ///
    /// # Returns
    /// * `Ok(&Mnemonic)` if the identifier is present
    /// * `Err(EngineError::MnemonicNotFound)` otherwise
    fn get(&self, id: &str) -> Result<&Mnemonic>;
}

/// In-memory mnemonic store backed by a hash map
#[derive(Debug, Default)]
pub struct MemoryStore {
    mnemonics: HashMap<String, Mnemonic>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mnemonic to the store, replacing any previous series with the
    /// same identifier
    pub fn insert(&mut self, mnemonic: Mnemonic) {
        self.mnemonics.insert(mnemonic.id().to_string(), mnemonic);
    }

    /// Number of mnemonics in the store
    pub fn len(&self) -> usize {
        self.mnemonics.len()
    }

    /// True if the store holds no mnemonics
    pub fn is_empty(&self) -> bool {
        self.mnemonics.is_empty()
    }

    /// All identifiers in the store, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.mnemonics.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl MnemonicStore for MemoryStore {
    fn get(&self, id: &str) -> Result<&Mnemonic> {
        self.mnemonics
            .get(id)
            .ok_or_else(|| EngineError::MnemonicNotFound(id.to_string()))
    }
}
