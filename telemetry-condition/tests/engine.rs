//! Integration tests for the condition engine
//!
//! Cross-validates the interval-based engine against independent brute-force
//! evaluations on randomized series, and exercises the batch routines end to
//! end the way a monitor run would.

use chrono::DateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use telemetry_condition::{
    extract, extract_all, extract_filter_positions, merge_ranges, merge_ranges_sweep, Condition,
    MemoryStore, Mnemonic, NominalsTable, Predicate, PredicateSpec, Range, Sample, Timestamp,
    Value,
};

fn ts(secs: i64) -> Timestamp {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Random numeric series: integer-second timestamps, small integer values so
/// predicate transitions are frequent
fn random_numeric(rng: &mut StdRng, id: &str) -> Mnemonic {
    let mut samples = Vec::new();
    let mut t = rng.gen_range(0..5);
    for _ in 0..rng.gen_range(1..25) {
        samples.push(Sample::new(ts(t), rng.gen_range(0..8i64) as f64));
        t += rng.gen_range(1..4);
    }
    Mnemonic::new(id, samples)
}

/// Random categorical series over two status words
fn random_status(rng: &mut StdRng, id: &str) -> Mnemonic {
    let mut samples = Vec::new();
    let mut t = rng.gen_range(0..5);
    for _ in 0..rng.gen_range(1..25) {
        let status = if rng.gen_bool(0.5) { "ON" } else { "OFF" };
        samples.push(Sample::new(ts(t), status));
        t += rng.gen_range(1..4);
    }
    Mnemonic::new(id, samples)
}

/// Brute-force composite state: per-term linear backward scan, no binary
/// search, no precomputed intervals
fn brute_force_state(terms: &[(&Mnemonic, Predicate)], time: Timestamp) -> bool {
    let timeline_end = terms.iter().filter_map(|(m, _)| m.last_time()).max();
    match timeline_end {
        Some(end) if time < end => {}
        _ => return false,
    }
    terms.iter().all(|(mnemonic, predicate)| {
        let held = mnemonic
            .samples()
            .iter()
            .rev()
            .find(|s| s.time <= time)
            .map(|s| &s.value);
        match held {
            Some(value) => predicate.eval(value).unwrap(),
            None => false,
        }
    })
}

#[test]
fn interval_engine_agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(20260823);

    for round in 0..50 {
        let a = random_numeric(&mut rng, "A");
        let b = random_numeric(&mut rng, "B");
        let s = random_status(&mut rng, "S");

        let terms = vec![
            (&a, Predicate::greater(3.0)),
            (&b, Predicate::smaller(6.0)),
            (&s, Predicate::equal("ON")),
        ];
        let condition = Condition::new(terms.clone()).unwrap();

        // Probe every second across the whole timeline, including every
        // transition instant (samples sit on integer seconds)
        for t in -2..90 {
            let expected = brute_force_state(&terms, ts(t));
            let state = condition.state(ts(t)).unwrap();
            let interval = condition.get_interval(ts(t));

            assert_eq!(state, expected, "state mismatch at t={} (round {})", t, round);
            assert_eq!(
                interval.is_some(),
                expected,
                "interval/state mismatch at t={} (round {})",
                t,
                round
            );
            if let Some(interval) = interval {
                assert!(interval.start <= ts(t) && ts(t) < interval.end);
            }
        }

        // Intervals are sorted, disjoint and maximal: the state flips just
        // outside each boundary
        let intervals = condition.intervals();
        for window in intervals.windows(2) {
            assert!(window[0].end <= window[1].start);
        }
        for interval in intervals {
            assert!(interval.start < interval.end);
            assert!(condition.state(interval.start).unwrap());
            assert!(!condition.state(interval.end).unwrap());
        }
    }
}

#[test]
fn extraction_matches_per_sample_scan() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let gate = random_numeric(&mut rng, "GATE");
        let target = random_numeric(&mut rng, "TARGET");
        let terms = vec![(&gate, Predicate::greater(3.0))];
        let condition = Condition::new(terms.clone()).unwrap();

        let expected: Vec<Value> = target
            .samples()
            .iter()
            .filter(|s| brute_force_state(&terms, s.time))
            .map(|s| s.value.clone())
            .collect();

        let extracted = extract(&condition, &target);
        match extracted {
            Some(values) => assert_eq!(values, expected),
            None => assert!(expected.is_empty()),
        }

        // Side-effect free and idempotent
        assert_eq!(extract(&condition, &target), extract(&condition, &target));
    }
}

#[test]
fn merger_sweep_agrees_with_naive_combinatorial() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let n: usize = rng.gen_range(2..8);
        let ranges: Vec<Range> = (0..n)
            .map(|_| {
                let low: i64 = rng.gen_range(0..15);
                Range::new(low, low + rng.gen_range(0..6))
            })
            .collect();

        for arity in 1..=n {
            let naive = merge_ranges(&ranges, arity);
            let sweep = merge_ranges_sweep(&ranges, arity);

            // No element of the naive result is a subset of another
            for (i, a) in naive.iter().enumerate() {
                for (j, b) in naive.iter().enumerate() {
                    if i != j {
                        assert!(!a.is_subset_of(*b), "{} within {}", a, b);
                    }
                }
            }

            // Identical covered point sets
            assert_eq!(covered_points(&naive), covered_points(&sweep));
        }
    }
}

fn covered_points(ranges: &[Range]) -> Vec<i64> {
    let mut points: Vec<i64> = ranges.iter().flat_map(|r| r.low..r.high).collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// End-to-end batch run in the shape of a daily monitor pass: one condition
/// set gates several mnemonics, failures stay local to their mnemonic
#[test]
fn daily_batch_routine() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut store = MemoryStore::new();
    store.insert(Mnemonic::new(
        "IMIR_HK_POM_LOOP",
        vec![
            Sample::new(ts(0), "ON"),
            Sample::new(ts(100), "OFF"),
            Sample::new(ts(500), "ON"),
            Sample::new(ts(600), "ON"),
        ],
    ));
    store.insert(Mnemonic::new(
        "SE_ZIMIRICEA",
        vec![
            Sample::new(ts(0), 0.1),
            Sample::new(ts(50), 0.4),
            Sample::new(ts(550), 0.1),
            Sample::new(ts(600), 0.1),
        ],
    ));
    store.insert(Mnemonic::new(
        "IMIR_HK_ICE_CUR",
        vec![
            Sample::new(ts(80), 1.0),
            Sample::new(ts(200), 1.1),
            Sample::new(ts(300), 1.2),
            Sample::new(ts(520), 1.3),
        ],
    ));
    store.insert(Mnemonic::new(
        "IMIR_HK_FPE_CUR",
        vec![Sample::new(ts(550), 2.0)], // outside the valid window
    ));

    let specs = vec![
        PredicateSpec::new("IMIR_HK_POM_LOOP", Predicate::equal("OFF")),
        PredicateSpec::new("SE_ZIMIRICEA", Predicate::greater(0.2)),
    ];
    let condition = Condition::from_specs(&store, &specs).unwrap();

    // Loop OFF over [100, 500), voltage up over [50, 550): valid [100, 500)
    assert_eq!(condition.intervals().len(), 1);
    let interval = condition.intervals()[0];
    assert_eq!(interval.start, ts(100));
    assert_eq!(interval.end, ts(500));

    let extracted = extract_all(
        &condition,
        &store,
        &["IMIR_HK_ICE_CUR", "IMIR_HK_FPE_CUR", "NOT_IN_STORE"],
    );

    // Only the gated current made it; the no-data and missing mnemonics were
    // skipped without aborting the batch
    assert_eq!(extracted.len(), 1);
    assert_eq!(
        extracted["IMIR_HK_ICE_CUR"],
        vec![Value::Number(1.1), Value::Number(1.2)]
    );
}

/// Wheel-position correlation over a realistic pass: two wheels, recurring
/// labels, an UNKNOWN transition and one out-of-tolerance reading
#[test]
fn wheel_position_correlation_pass() {
    let gate = Mnemonic::new(
        "SE_ZIMIRFPEA",
        vec![
            Sample::new(ts(0), 1.0),
            Sample::new(ts(1000), 1.0), // condition holds over [0, 1000)
        ],
    );
    let condition = Condition::new(vec![(&gate, Predicate::greater(0.5))]).unwrap();

    let pos = Mnemonic::new(
        "IMIR_HK_FW_CUR_POS",
        vec![
            Sample::new(ts(10), "F560W"),
            Sample::new(ts(200), "UNKNOWN"),
            Sample::new(ts(300), "F770W"),
            Sample::new(ts(600), "F560W"),
        ],
    );
    let ratio = Mnemonic::new(
        "IMIR_HK_FW_POS_RATIO",
        vec![
            Sample::new(ts(20), 250.8),
            Sample::new(ts(310), 180.0), // far from the F770W nominal
            Sample::new(ts(320), 121.3),
            Sample::new(ts(610), 251.2),
        ],
    );
    let nominals = NominalsTable::new()
        .with_nominal("F560W", 251.0)
        .with_nominal("F770W", 121.0)
        .with_tolerance(5.0);

    let readings = extract_filter_positions(&condition, &nominals, &ratio, &pos);

    assert_eq!(readings.len(), 2);
    assert_eq!(readings["F560W"], vec![(ts(20), 250.8), (ts(610), 251.2)]);
    assert_eq!(readings["F770W"], vec![(ts(320), 121.3)]);
}
