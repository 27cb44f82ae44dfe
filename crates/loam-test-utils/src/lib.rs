//! Test fixtures and reference evaluators for loam development.
//!
//! Provides the worked almanac fixture (a seven-stage chain with known
//! minima), deterministic synthetic chain builders for differential and
//! benchmark use, and a value-at-a-time brute-force evaluator that the
//! interval engine is tested against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use loam_core::{Interval, Rule, Tag};
use loam_engine::{Chain, Stage};

/// Minimum terminal value of [`sample_chain`] over [`sample_values`].
pub const SAMPLE_MIN_OF_VALUES: i64 = 35;

/// Minimum terminal value of [`sample_chain`] over [`sample_spans`].
pub const SAMPLE_MIN_OF_SPANS: i64 = 46;

/// Build one stage from `(dest_start, src_start, length)` table lines.
pub fn stage_from_lines(source: &str, target: &str, lines: &[(i64, i64, i64)]) -> Stage {
    let rules = lines
        .iter()
        .map(|&(dest, src, len)| Rule::new(dest, src, len).expect("fixture rule is well formed"))
        .collect();
    Stage::new(Tag::from(source), Tag::from(target), rules)
        .expect("fixture rule sources are disjoint")
}

/// The worked seven-stage almanac fixture.
///
/// Remaps seed numbers down to location numbers through soil, fertilizer,
/// water, light, temperature, and humidity. The expected minima over
/// [`sample_values`] and [`sample_spans`] are
/// [`SAMPLE_MIN_OF_VALUES`] and [`SAMPLE_MIN_OF_SPANS`].
pub fn sample_chain() -> Chain {
    Chain::new(vec![
        stage_from_lines("seed", "soil", &[(50, 98, 2), (52, 50, 48)]),
        stage_from_lines("soil", "fertilizer", &[(0, 15, 37), (37, 52, 2), (39, 0, 15)]),
        stage_from_lines(
            "fertilizer",
            "water",
            &[(49, 53, 8), (0, 11, 42), (42, 0, 7), (57, 7, 4)],
        ),
        stage_from_lines("water", "light", &[(88, 18, 7), (18, 25, 70)]),
        stage_from_lines(
            "light",
            "temperature",
            &[(45, 77, 23), (81, 45, 19), (68, 64, 13)],
        ),
        stage_from_lines("temperature", "humidity", &[(0, 69, 1), (1, 0, 69)]),
        stage_from_lines("humidity", "location", &[(60, 56, 37), (56, 93, 4)]),
    ])
    .expect("fixture stages form a linear chain")
}

/// The fixture's individual input values.
pub fn sample_values() -> Vec<i64> {
    vec![79, 14, 55, 13]
}

/// The fixture's input spans: the same numbers read as `(start, length)`
/// pairs.
pub fn sample_spans() -> Vec<Interval> {
    vec![Interval::new(79, 93), Interval::new(55, 68)]
}

/// Build a deterministic synthetic chain: `stage_count` stages tagged
/// `t0 -> t1 -> ...`, each with `rules_per_stage` disjoint rules laid end
/// to end with random gaps, lengths, and offsets.
pub fn synthetic_chain(stage_count: usize, rules_per_stage: usize, seed: u64) -> Chain {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stages = Vec::with_capacity(stage_count);
    for i in 0..stage_count {
        let mut rules = Vec::with_capacity(rules_per_stage);
        let mut cursor: i64 = rng.random_range(-100..100);
        for _ in 0..rules_per_stage {
            cursor += rng.random_range(1..50);
            let length = rng.random_range(1..80);
            let offset = rng.random_range(-200..=200);
            rules.push(
                Rule::new(cursor + offset, cursor, length).expect("synthetic rule is well formed"),
            );
            cursor += length;
        }
        stages.push(
            Stage::new(Tag::new(format!("t{i}")), Tag::new(format!("t{}", i + 1)), rules)
                .expect("synthetic rule sources are disjoint"),
        );
    }
    Chain::new(stages).expect("synthetic stages form a linear chain")
}

/// Deterministic random input spans for differential and benchmark runs.
pub fn synthetic_spans(count: usize, max_len: i64, seed: u64) -> Vec<Interval> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let start = rng.random_range(-500..2_000);
            let length = rng.random_range(0..max_len.max(1));
            Interval::new(start, start + length)
        })
        .collect()
}

/// Reference scalar evaluation: walk the chain tag by tag, finding the
/// matching rule by linear scan.
///
/// Mirrors the obvious one-value-at-a-time implementation so the interval
/// engine has something independent to be tested against.
pub fn naive_remap(chain: &Chain, value: i64) -> i64 {
    let mut tag = chain.entry();
    let mut v = value;
    while tag != chain.terminal() {
        let stage = chain.stage(tag.as_str()).expect("walk stays on the chain");
        v = stage
            .rules()
            .iter()
            .find(|rule| rule.applies(v))
            .map(|rule| rule.map(v))
            .unwrap_or(v);
        tag = stage.target();
    }
    v
}

/// Brute-force minimum over spans: enumerate every value and remap it
/// individually. Intractable for real inputs, exact for small ones.
pub fn brute_force_min(chain: &Chain, spans: &[Interval]) -> Option<i64> {
    let mut best: Option<i64> = None;
    for span in spans {
        for v in span.start()..span.end() {
            let mapped = naive_remap(chain, v);
            best = Some(match best {
                Some(current) => current.min(mapped),
                None => mapped,
            });
        }
    }
    best
}
