//! Loam: a range-algebra engine for piecewise shift pipelines.
//!
//! Loam remaps half-open integer intervals through a linear chain of
//! shift-rule tables and answers minimum-reachable-value queries in time
//! proportional to the number of interval fragments, never the width of
//! the input ranges.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // One stage: [98, 100) shifts down to [50, 52), [50, 98) up to [52, 100).
//! let stage = Stage::new(
//!     Tag::from("seed"),
//!     Tag::from("soil"),
//!     vec![
//!         Rule::new(50, 98, 2).unwrap(),
//!         Rule::new(52, 50, 48).unwrap(),
//!     ],
//! )
//! .unwrap();
//! let chain = Chain::new(vec![stage]).unwrap();
//!
//! // Scalar path.
//! assert_eq!(chain.remap_value(79, chain.entry()).unwrap(), 81);
//!
//! // Whole-interval path: no value is ever enumerated.
//! let min = min_of_spans(&chain, &[Interval::new(79, 93)]).unwrap();
//! assert_eq!(min, Some(81));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `loam-core` | Intervals, rules, tags, construction errors |
//! | [`engine`] | `loam-engine` | Stages, chains, query drivers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`loam-core`).
///
/// Half-open [`types::Interval`]s and their set algebra, shift
/// [`types::Rule`]s, and stage identity [`types::Tag`]s.
pub use loam_core as types;

/// Stages, chains, and query drivers (`loam-engine`).
///
/// [`engine::Stage`] is one remapping step; [`engine::Chain`] links
/// stages into a validated pipeline; the `engine::query` functions reduce
/// inputs to minimum terminal values.
pub use loam_engine as engine;

/// Common imports for typical loam usage.
///
/// ```rust
/// use loam::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use loam_core::{Interval, Rule, RuleError, Tag};

    // Engine
    pub use loam_engine::{Chain, ChainError, Stage, StageError};

    // Query drivers
    pub use loam_engine::{min_of_spans, min_of_values, par_min_of_spans, par_min_of_values};
}
