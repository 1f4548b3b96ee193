//! Value extraction under a condition
//!
//! Pulls the samples of a target mnemonic that fall inside a condition's
//! validity intervals, and correlates discrete wheel-position transitions
//! with the continuous ratio readings that confirm them. All extraction is
//! per-item fault isolated: a mnemonic without matching data is logged and
//! skipped, never allowed to abort the rest of a batch.

use crate::condition::Condition;
use crate::config::NominalsTable;
use crate::store::{Mnemonic, MnemonicStore};
use crate::types::{Timestamp, Value};
use std::collections::BTreeMap;

/// Correlation result: position label -> ordered `(time, value)` readings
///
/// A label recurs across multiple transitions, so each key holds the full
/// sequence of recorded readings, in time order of the position samples.
pub type PositionReadings = BTreeMap<String, Vec<(Timestamp, f64)>>;

/// Extract the values of `mnemonic` sampled while `condition` holds
///
/// Membership is tested via [`Condition::get_interval`], not the raw boolean
/// state, so extraction and interval queries are guaranteed consistent.
///
/// # Returns
/// * `Some(values)` - matching values in original sample order
/// * `None` - zero samples matched; the explicit no-data signal, to be
///   treated as non-fatal by callers
pub fn extract(condition: &Condition, mnemonic: &Mnemonic) -> Option<Vec<Value>> {
    let values: Vec<Value> = mnemonic
        .samples()
        .iter()
        .filter(|sample| condition.get_interval(sample.time).is_some())
        .map(|sample| sample.value.clone())
        .collect();

    if values.is_empty() {
        log::debug!(
            "no samples of '{}' inside the condition intervals",
            mnemonic.id()
        );
        None
    } else {
        Some(values)
    }
}

/// Run the extractor over a list of mnemonic identifiers
///
/// Per-item fault isolation: a missing mnemonic or an empty extraction is
/// logged and skipped, the remaining identifiers are still processed. The
/// result only contains identifiers that produced data.
pub fn extract_all<S>(
    condition: &Condition,
    store: &S,
    identifiers: &[&str],
) -> BTreeMap<String, Vec<Value>>
where
    S: MnemonicStore + ?Sized,
{
    let mut extracted = BTreeMap::new();
    for &id in identifiers {
        let mnemonic = match store.get(id) {
            Ok(mnemonic) => mnemonic,
            Err(e) => {
                log::warn!("skipping '{}': {}", id, e);
                continue;
            }
        };
        match extract(condition, mnemonic) {
            Some(values) => {
                log::debug!("extracted {} value(s) for '{}'", values.len(), id);
                extracted.insert(id.to_string(), values);
            }
            None => log::warn!("no data for '{}' under the current condition", id),
        }
    }
    extracted
}

/// Correlate wheel-position transitions with matching ratio readings
///
/// For every sample of `pos_mnemonic`:
/// - the unknown-position sentinel is skipped with a warning;
/// - positions outside every validity interval are skipped silently;
/// - labels without a configured nominal are skipped with a warning;
/// - otherwise the ratio samples are scanned in a single forward pass from
///   the first sample at or after the position change, and the first reading
///   within `nominals.tolerance` of the label's nominal value and strictly
///   inside the covering interval is recorded under the label. First match
///   wins; a position change with no matching reading is not an error.
///
/// # Arguments
/// * `condition` - validity condition gating the correlation
/// * `nominals` - per-label nominal values, tolerance and unknown sentinel
/// * `ratio_mnemonic` - continuous ratio readings
/// * `pos_mnemonic` - discrete position labels
pub fn extract_filter_positions(
    condition: &Condition,
    nominals: &NominalsTable,
    ratio_mnemonic: &Mnemonic,
    pos_mnemonic: &Mnemonic,
) -> PositionReadings {
    let mut readings = PositionReadings::new();
    let ratio_samples = ratio_mnemonic.samples();

    for pos in pos_mnemonic.samples() {
        let label = match pos.value.as_text() {
            Some(label) => label,
            None => {
                log::warn!(
                    "non-categorical position value {} in '{}' at {}",
                    pos.value,
                    pos_mnemonic.id(),
                    pos.time
                );
                continue;
            }
        };

        if label == nominals.unknown_label {
            log::warn!("unknown position in '{}' at {}", pos_mnemonic.id(), pos.time);
            continue;
        }

        let interval = match condition.get_interval(pos.time) {
            Some(interval) => interval,
            None => continue,
        };

        let nominal = match nominals.get(label) {
            Some(nominal) => nominal,
            None => {
                log::warn!("no nominal value configured for position '{}'", label);
                continue;
            }
        };

        // Never scan backward from the position sample
        let start = ratio_samples.partition_point(|s| s.time < pos.time);
        for ratio in &ratio_samples[start..] {
            if ratio.time >= interval.end {
                break;
            }
            let value = match ratio.value.as_number() {
                Some(value) => value,
                None => continue,
            };
            if interval.start < ratio.time && (value - nominal).abs() < nominals.tolerance {
                readings
                    .entry(label.to_string())
                    .or_default()
                    .push((ratio.time, value));
                break; // first match wins
            }
        }
    }

    readings
}
