//! Composite conditions and their validity intervals
//!
//! A condition is a conjunction of (mnemonic, predicate) pairs. Building one
//! derives, once, the sorted list of maximal half-open intervals
//! `[start, end)` during which every predicate holds simultaneously. The
//! derivation merges all per-predicate transition timelines instead of
//! rescanning the series per query, so subsequent `get_interval` lookups are
//! a single binary search.

use crate::config::PredicateSpec;
use crate::predicate::Predicate;
use crate::store::{Mnemonic, MnemonicStore};
use crate::types::{Result, Timestamp};
use std::fmt;

/// A maximal half-open time span `[start, end)` during which a condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Inclusive start of the span
    pub start: Timestamp,
    /// Exclusive end of the span
    pub end: Timestamp,
}

impl Interval {
    /// True if `time` lies inside the span (`start <= time < end`)
    pub fn contains(&self, time: Timestamp) -> bool {
        self.start <= time && time < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Conjunction of predicates across one or more mnemonics
///
/// Immutable once built: the constructor resolves all referenced mnemonics,
/// walks the merged transition timeline and stores the resulting intervals.
/// There is no incremental update - a changed input means a new condition.
#[derive(Debug)]
pub struct Condition<'a> {
    /// Ordered (mnemonic, predicate) terms; the mnemonics stay owned by the
    /// store, the condition only borrows them
    terms: Vec<(&'a Mnemonic, Predicate)>,
    /// Sorted, disjoint, maximal validity intervals
    intervals: Vec<Interval>,
    /// Last sample time across all referenced mnemonics; the composite state
    /// is undefined (treated as false) from this instant on, matching the
    /// close-out of a trailing open interval
    timeline_end: Option<Timestamp>,
}

impl<'a> Condition<'a> {
    /// Build a condition from resolved (mnemonic, predicate) terms
    ///
    /// Fails with [`crate::EngineError::TypeMismatch`] if an ordered
    /// predicate meets a categorical sample anywhere in its series. A
    /// condition with no terms never holds.
    pub fn new(terms: Vec<(&'a Mnemonic, Predicate)>) -> Result<Self> {
        let intervals = derive_intervals(&terms)?;
        let timeline_end = terms.iter().filter_map(|(m, _)| m.last_time()).max();
        log::debug!(
            "condition over {} mnemonic(s): {} valid interval(s)",
            terms.len(),
            intervals.len()
        );
        Ok(Self {
            terms,
            intervals,
            timeline_end,
        })
    }

    /// Build a condition by resolving predicate specs against a store
    ///
    /// Any missing mnemonic fails the whole condition with
    /// [`crate::EngineError::MnemonicNotFound`] - fatal to this condition
    /// instance only, callers continue with sibling conditions.
    pub fn from_specs<S>(store: &'a S, specs: &[PredicateSpec]) -> Result<Self>
    where
        S: MnemonicStore + ?Sized,
    {
        let mut terms = Vec::with_capacity(specs.len());
        for spec in specs {
            let mnemonic = store.get(&spec.mnemonic)?;
            terms.push((mnemonic, spec.predicate.clone()));
        }
        Self::new(terms)
    }

    /// The (mnemonic, predicate) terms of the conjunction
    pub fn terms(&self) -> &[(&'a Mnemonic, Predicate)] {
        &self.terms
    }

    /// The sorted, disjoint, maximal validity intervals
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Composite state at `time`: AND over all predicate states
    ///
    /// Evaluated directly from the step functions, independent of the
    /// precomputed intervals, so the two paths can be cross-checked. The
    /// state is false before the first sample and from the end of the
    /// observed timeline on (a trailing interval closes there, it is not
    /// extended to infinity).
    pub fn state(&self, time: Timestamp) -> Result<bool> {
        if self.terms.is_empty() {
            return Ok(false);
        }
        match self.timeline_end {
            Some(end) if time < end => {}
            _ => return Ok(false),
        }
        for (mnemonic, predicate) in &self.terms {
            if !predicate.state(mnemonic, time)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The validity interval containing `time`, if any
    ///
    /// Binary search over the sorted intervals; `None` iff the condition
    /// does not hold at `time`.
    pub fn get_interval(&self, time: Timestamp) -> Option<Interval> {
        let idx = self.intervals.partition_point(|iv| iv.start <= time);
        if idx == 0 {
            return None;
        }
        let interval = self.intervals[idx - 1];
        interval.contains(time).then_some(interval)
    }
}

/// Walk the merged transition timeline of all terms and emit the maximal
/// intervals where the conjunction holds
fn derive_intervals(terms: &[(&Mnemonic, Predicate)]) -> Result<Vec<Interval>> {
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    // One merged timeline of (time, term index, state after the transition)
    let mut events: Vec<(Timestamp, usize, bool)> = Vec::new();
    for (idx, (mnemonic, predicate)) in terms.iter().enumerate() {
        for (time, holds) in predicate.transitions(mnemonic)? {
            events.push((time, idx, holds));
        }
    }
    // Stable by time: simultaneous transitions keep their per-term order and
    // are all applied before the conjunction is evaluated
    events.sort_by_key(|&(time, _, _)| time);

    // A trailing open interval closes at the last sample time across all
    // mnemonics rather than extending to infinity
    let timeline_end = terms.iter().filter_map(|(m, _)| m.last_time()).max();

    let mut current = vec![false; terms.len()];
    let mut open: Option<Timestamp> = None;
    let mut intervals = Vec::new();

    let mut i = 0;
    while i < events.len() {
        let instant = events[i].0;
        while i < events.len() && events[i].0 == instant {
            let (_, term, holds) = events[i];
            current[term] = holds;
            i += 1;
        }
        let all_hold = current.iter().all(|&holds| holds);
        match (all_hold, open) {
            (true, None) => open = Some(instant),
            (false, Some(start)) => {
                // start < instant always: the conjunction flipped here
                intervals.push(Interval {
                    start,
                    end: instant,
                });
                open = None;
            }
            _ => {}
        }
    }

    if let (Some(start), Some(end)) = (open, timeline_end) {
        // Discard a zero-width trailing interval (condition became true
        // exactly at the final sample)
        if start < end {
            intervals.push(Interval { start, end });
        }
    }

    Ok(intervals)
}
