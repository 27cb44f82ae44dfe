//! Core types for the loam range-remapping engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types the rest of the workspace is built from: half-open
//! [`Interval`]s with their set algebra, shift [`Rule`]s, stage identity
//! [`Tag`]s, and the construction error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interval;
pub mod rule;
pub mod tag;

pub use error::RuleError;
pub use interval::Interval;
pub use rule::Rule;
pub use tag::Tag;
