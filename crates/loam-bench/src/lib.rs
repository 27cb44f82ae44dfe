//! Benchmark profiles for the loam range-remapping engine.
//!
//! Provides pre-built chains and input sets shared by the criterion
//! benches:
//!
//! - [`reference_chain`]: 7 stages of 32 rules, the shape of a realistic
//!   remapping table set
//! - [`stress_chain`]: 24 stages of 128 rules for worst-case fan-out
//! - [`reference_spans`]: 64 deterministic input spans

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use loam_core::Interval;
use loam_engine::Chain;
use loam_test_utils::{synthetic_chain, synthetic_spans};

/// Reference profile: 7 stages of 32 rules each.
pub fn reference_chain() -> Chain {
    synthetic_chain(7, 32, 42)
}

/// Stress profile: 24 stages of 128 rules each, for fan-out behavior.
pub fn stress_chain() -> Chain {
    synthetic_chain(24, 128, 42)
}

/// 64 deterministic input spans up to 5000 values wide.
pub fn reference_spans() -> Vec<Interval> {
    synthetic_spans(64, 5_000, 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_chain_builds() {
        let chain = reference_chain();
        assert_eq!(chain.len(), 7);
    }

    #[test]
    fn stress_chain_builds() {
        let chain = stress_chain();
        assert_eq!(chain.len(), 24);
    }

    #[test]
    fn reference_spans_are_stable() {
        assert_eq!(reference_spans(), reference_spans());
        assert_eq!(reference_spans().len(), 64);
    }
}
