//! Stage and chain engine for loam range remapping.
//!
//! A [`Stage`] remaps values of one tag onto the next through a table of
//! disjoint shift rules; a [`Chain`] links stages into a single pipeline
//! and propagates whole intervals through it. The [`query`] drivers
//! reduce a set of input values or spans to the minimum reachable
//! terminal value, sequentially or data-parallel across inputs.
//!
//! Everything is built once and frozen: chains validate their structure
//! at assembly time and are pure reads afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod query;
pub mod stage;

pub use chain::{Chain, ChainError};
pub use query::{min_of_spans, min_of_values, par_min_of_spans, par_min_of_values};
pub use stage::{Stage, StageError};
