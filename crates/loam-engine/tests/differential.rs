//! Randomized differential tests: the interval engine against brute-force
//! enumeration, and the scalar path against the range path.
//!
//! All randomness is seeded, so failures reproduce exactly.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use loam_core::Interval;
use loam_engine::{min_of_spans, min_of_values, par_min_of_spans};
use loam_test_utils::{brute_force_min, naive_remap, synthetic_chain, synthetic_spans};

#[test]
fn range_driver_matches_brute_force() {
    for seed in 0..8u64 {
        let chain = synthetic_chain(4, 5, seed);
        // Spans of at most 400 values keep the brute force tractable.
        let spans = synthetic_spans(6, 400, seed ^ 0x5eed);
        let expected = brute_force_min(&chain, &spans);
        let actual = min_of_spans(&chain, &spans).unwrap();
        assert_eq!(actual, expected, "seed {seed} diverged");
    }
}

#[test]
fn parallel_range_driver_matches_brute_force() {
    for seed in 0..4u64 {
        let chain = synthetic_chain(3, 4, seed);
        let spans = synthetic_spans(8, 250, seed ^ 0xca5c);
        let expected = brute_force_min(&chain, &spans);
        let actual = par_min_of_spans(&chain, &spans, Some(3)).unwrap();
        assert_eq!(actual, expected, "seed {seed} diverged");
    }
}

#[test]
fn scalar_driver_matches_naive_walk() {
    let chain = synthetic_chain(5, 6, 99);
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let values: Vec<i64> = (0..500).map(|_| rng.random_range(-600..2_600)).collect();

    let expected = values.iter().map(|&v| naive_remap(&chain, v)).min();
    let actual = min_of_values(&chain, &values).unwrap();
    assert_eq!(actual, expected);

    // The two scalar implementations agree value for value, not just on
    // the minimum.
    for &v in &values {
        assert_eq!(
            chain.remap_value(v, chain.entry()).unwrap(),
            naive_remap(&chain, v),
            "value {v} diverged"
        );
    }
}

#[test]
fn scalar_and_range_paths_agree_per_span() {
    // For every individual span, enumerating values and remapping them
    // one at a time finds the same minimum the interval path reports.
    for seed in 0..6u64 {
        let chain = synthetic_chain(4, 5, seed.wrapping_mul(31));
        for span in synthetic_spans(4, 300, seed) {
            if span.is_empty() {
                continue;
            }
            let by_values: Option<i64> = (span.start()..span.end())
                .map(|v| chain.remap_value(v, chain.entry()).unwrap())
                .min();
            let by_span = min_of_spans(&chain, &[span]).unwrap();
            assert_eq!(by_span, by_values, "seed {seed}, span {span} diverged");
        }
    }
}

#[test]
fn propagated_fragments_cover_every_remapped_value() {
    // Stronger than minima agreement: each individually remapped value
    // must land inside some propagated terminal interval.
    let chain = synthetic_chain(3, 5, 7);
    let span = Interval::new(-50, 250);
    let out = chain.propagate(span, chain.entry()).unwrap();
    for v in span.start()..span.end() {
        let mapped = naive_remap(&chain, v);
        assert!(
            out.iter().any(|iv| iv.contains_value(mapped)),
            "remapped value {mapped} missing from propagated output"
        );
    }
}
