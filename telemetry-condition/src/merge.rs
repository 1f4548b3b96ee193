//! Merging of numeric ranges from several sources
//!
//! Given a flat collection of integer ranges and an arity `k`, find the
//! regions covered by at least `k` of them. Two algorithms are provided:
//! the combinatorial reference ([`merge_ranges`]) enumerates every
//! k-combination and prunes subset results, faithful to how the merged sets
//! are defined; the sweep line ([`merge_ranges_sweep`]) computes the covered
//! region in `O(n log n)` and is the one to use beyond a few tens of ranges.
//! Tests cross-validate the two on small inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer range `[low, high)` representing the point set `{low .. high-1}`
///
/// Distinct from a time [`crate::Interval`]: ranges are plain integers used
/// only by the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive lower bound
    pub low: i64,
    /// Exclusive upper bound
    pub high: i64,
}

impl Range {
    /// Create a new range
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// True if the range contains no points
    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }

    /// Number of points in the range
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.high - self.low) as usize
        }
    }

    /// Intersection of two ranges (possibly empty)
    pub fn intersect(self, other: Self) -> Self {
        Self {
            low: self.low.max(other.low),
            high: self.high.min(other.high),
        }
    }

    /// True if every point of `self` also lies in `other`
    ///
    /// An empty range is not considered a subset of anything; empty
    /// intersections are discarded before subset pruning applies.
    pub fn is_subset_of(self, other: Self) -> bool {
        !self.is_empty() && other.low <= self.low && self.high <= other.high
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.low, self.high)
    }
}

/// Reference combinatorial merger
///
/// Enumerates every combination of `arity` distinct ranges and intersects
/// them. A non-empty intersection is discarded if it is a subset of (or
/// equal to) a range already accumulated; otherwise it is added and any
/// accumulated range that became a subset of it is dropped. The result
/// therefore never contains an element that is a subset of another.
///
/// `arity == 0` or `arity > ranges.len()` yields an empty result.
///
/// Cost is `O(C(n, arity))`; acceptable for tens of ranges, use
/// [`merge_ranges_sweep`] beyond that.
pub fn merge_ranges(ranges: &[Range], arity: usize) -> Vec<Range> {
    if arity == 0 || arity > ranges.len() {
        return Vec::new();
    }

    let mut results: Vec<Range> = Vec::new();
    for combination in Combinations::new(ranges.len(), arity) {
        let mut intersection = ranges[combination[0]];
        for &idx in &combination[1..] {
            intersection = intersection.intersect(ranges[idx]);
        }
        if intersection.is_empty() {
            continue;
        }
        if results.iter().any(|r| intersection.is_subset_of(*r)) {
            continue;
        }
        results.retain(|r| !r.is_subset_of(intersection));
        results.push(intersection);
    }
    results
}

/// Sweep-line merger: maximal spans covered by at least `arity` ranges
///
/// Sorts all range boundaries and sweeps a counter of currently open
/// ranges. All boundaries at one point are applied before the coverage is
/// tested, so spans that merely touch fuse into one maximal span. The
/// output equals the union of [`merge_ranges`]'s result as a point set.
pub fn merge_ranges_sweep(ranges: &[Range], arity: usize) -> Vec<Range> {
    if arity == 0 || arity > ranges.len() {
        return Vec::new();
    }

    let mut bounds: Vec<(i64, i64)> = Vec::with_capacity(ranges.len() * 2);
    for range in ranges.iter().filter(|r| !r.is_empty()) {
        bounds.push((range.low, 1));
        bounds.push((range.high, -1));
    }
    bounds.sort_unstable();

    let arity = arity as i64;
    let mut open = 0i64;
    let mut span_start: Option<i64> = None;
    let mut spans = Vec::new();

    let mut i = 0;
    while i < bounds.len() {
        let point = bounds[i].0;
        while i < bounds.len() && bounds[i].0 == point {
            open += bounds[i].1;
            i += 1;
        }
        match (open >= arity, span_start) {
            (true, None) => span_start = Some(point),
            (false, Some(start)) => {
                spans.push(Range::new(start, point));
                span_start = None;
            }
            _ => {}
        }
    }
    // Every open gets a matching close, so no span is left open here

    spans
}

/// Index combinations in lexicographic order, smallest first
struct Combinations {
    indices: Vec<usize>,
    n: usize,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            indices: (0..k).collect(),
            n,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        // Advance the rightmost index that still has room
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] != i + self.n - k {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }

        Some(current)
    }
}
