//! Telemetry Condition & Interval-Correlation Engine
//!
//! A library for evaluating boolean conditions over independently,
//! asynchronously sampled telemetry series ("mnemonics") and extracting the
//! data recorded while those conditions held.
//!
//! # Architecture
//!
//! The engine is intentionally minimal and purely functional:
//! - Mnemonics are immutable step functions (last-value-hold semantics)
//! - Predicates (`equal`/`greater`/`smaller`) test one mnemonic's value
//! - A condition ANDs predicates and derives the maximal half-open
//!   intervals over which the conjunction holds
//! - Extractors pull values of other mnemonics sampled inside those
//!   intervals, or correlate discrete position transitions with continuous
//!   ratio readings against per-position nominals
//! - An independent merger reduces integer ranges from several sources to
//!   the regions covered by a chosen number of them
//!
//! The library does NOT:
//! - Load or parse telemetry files (a [`MnemonicStore`] is consumed, never
//!   produced)
//! - Persist results or render plots
//! - Expose any network or CLI surface
//!
//! All of that belongs to the surrounding application layer.
//!
//! # Example Usage
//!
//! ```
//! use chrono::DateTime;
//! use telemetry_condition::{extract, Condition, Mnemonic, Predicate, Sample};
//!
//! let ts = |secs: i64| DateTime::from_timestamp(secs, 0).unwrap();
//!
//! // ICE current while the supply voltage is up
//! let volt = Mnemonic::new(
//!     "SE_ZIMIRICEA",
//!     vec![
//!         Sample::new(ts(0), 0.0),
//!         Sample::new(ts(10), 0.4),
//!         Sample::new(ts(50), 0.0),
//!     ],
//! );
//! let current = Mnemonic::new(
//!     "IMIR_HK_ICE_CUR",
//!     vec![Sample::new(ts(20), 1.5), Sample::new(ts(30), 1.6)],
//! );
//!
//! let condition = Condition::new(vec![(&volt, Predicate::greater(0.2))]).unwrap();
//! assert_eq!(condition.intervals().len(), 1);
//!
//! let values = extract(&condition, &current).unwrap();
//! assert_eq!(values.len(), 2);
//! ```

// Public modules
pub mod condition;
pub mod config;
pub mod extract;
pub mod merge;
pub mod predicate;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use condition::{Condition, Interval};
pub use config::{NominalsTable, PredicateSpec};
pub use extract::{extract, extract_all, extract_filter_positions, PositionReadings};
pub use merge::{merge_ranges, merge_ranges_sweep, Range};
pub use predicate::{Predicate, PredicateOp};
pub use store::{MemoryStore, Mnemonic, MnemonicStore};
pub use types::{EngineError, Result, Sample, Timestamp, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty store and an empty condition behave
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let condition = Condition::new(Vec::new()).unwrap();
        assert!(condition.intervals().is_empty());
    }
}
