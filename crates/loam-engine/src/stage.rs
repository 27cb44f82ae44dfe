//! A single remapping stage and the interval-splitting algorithm.

use std::error::Error;
use std::fmt;

use loam_core::{Interval, Rule, Tag};
use smallvec::SmallVec;

/// Errors from [`Stage`] construction (build-time, never per-query).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageError {
    /// Two rules in the same stage claim overlapping source intervals.
    ///
    /// The splitting algorithm partitions its input against each rule in
    /// turn and relies on every value matching at most one rule; an
    /// overlapping table would silently double-map the shared values, so
    /// it is rejected up front.
    OverlappingRules {
        /// The tag the stage consumes.
        tag: Tag,
        /// The earlier rule (lower source start).
        first: Rule,
        /// The later rule it collides with.
        second: Rule,
    },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverlappingRules { tag, first, second } => {
                write!(
                    f,
                    "stage consuming '{tag}': rules {first} and {second} overlap in source space"
                )
            }
        }
    }
}

impl Error for StageError {}

/// One remapping step: an ordered table of disjoint shift rules.
///
/// A stage consumes values tagged `source` and produces values tagged
/// `target`. A value inside some rule's source interval is shifted by that
/// rule; a value no rule claims passes through unchanged (identity is the
/// default policy for unmapped values).
///
/// Rules are sorted by source start at construction and their sources are
/// verified disjoint, so scalar lookup is a binary search and the interval
/// split below needs no conflict handling.
#[derive(Clone, Debug)]
pub struct Stage {
    source: Tag,
    target: Tag,
    rules: Vec<Rule>,
}

impl Stage {
    /// Build a stage from its consumed tag, produced tag, and rule table.
    ///
    /// Rules may arrive in any order; they are sorted by source start.
    /// Zero-length rules match nothing and are dropped. Returns
    /// [`StageError::OverlappingRules`] if any two rule sources share a
    /// value.
    pub fn new(source: Tag, target: Tag, mut rules: Vec<Rule>) -> Result<Self, StageError> {
        rules.sort_by_key(|r| r.source().start());
        // Sorted by start, so each non-empty rule only needs checking
        // against the previous non-empty one.
        let mut prev: Option<Rule> = None;
        for &rule in &rules {
            if rule.is_empty() {
                continue;
            }
            if let Some(first) = prev {
                if first.source().end() > rule.source().start() {
                    return Err(StageError::OverlappingRules {
                        tag: source,
                        first,
                        second: rule,
                    });
                }
            }
            prev = Some(rule);
        }
        rules.retain(|r| !r.is_empty());
        Ok(Self {
            source,
            target,
            rules,
        })
    }

    /// The tag this stage consumes.
    pub fn source(&self) -> &Tag {
        &self.source
    }

    /// The tag this stage produces.
    pub fn target(&self) -> &Tag {
        &self.target
    }

    /// The rule table, sorted by source start.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Remap a single value through this stage.
    ///
    /// Binary-searches the sorted rule table for the one rule that can
    /// hold `value`; identity passthrough if none does.
    pub fn remap(&self, value: i64) -> i64 {
        let idx = self
            .rules
            .partition_point(|r| r.source().start() <= value);
        if idx > 0 {
            let rule = &self.rules[idx - 1];
            if rule.applies(value) {
                return rule.map(value);
            }
        }
        value
    }

    /// Remap a whole interval through this stage.
    ///
    /// Returns destination-space intervals whose union is exactly the
    /// image of `span` under the rule table: each value of `span` appears
    /// in exactly one output interval, shifted if a rule claims it and
    /// unchanged otherwise. The number of outputs is bounded by the rule
    /// count, not by the width of `span`.
    ///
    /// The algorithm threads two call-local sets through the rule loop:
    /// `pending` holds source-space fragments not yet claimed by any rule,
    /// `done` holds finished destination-space pieces. Each rule consumes
    /// the overlap of every pending fragment and returns the uncovered
    /// remainders to `pending`; whatever survives the whole loop passes
    /// through unchanged. Nothing is shared between calls, so a frozen
    /// stage can be projected from any number of threads at once.
    pub fn project(&self, span: Interval) -> Vec<Interval> {
        if span.is_empty() {
            return Vec::new();
        }
        let mut pending: SmallVec<[Interval; 8]> = smallvec::smallvec![span];
        let mut done: Vec<Interval> = Vec::new();
        for rule in &self.rules {
            let mut unclaimed: SmallVec<[Interval; 8]> = SmallVec::new();
            for piece in pending.drain(..) {
                match piece.intersect(rule.source()) {
                    Some(overlap) => {
                        done.push(rule.map_interval(overlap));
                        unclaimed.extend(piece.difference(overlap));
                    }
                    None => unclaimed.push(piece),
                }
            }
            pending = unclaimed;
        }
        done.extend(pending);
        done
    }
}
