//! A single remapping directive: shift one source interval onto a
//! destination interval of equal length.

use std::fmt;

use crate::error::RuleError;
use crate::interval::Interval;

/// One remapping rule within a stage.
///
/// A rule binds a `source` interval to a `dest` interval of identical
/// length. A value `v` inside the source maps to
/// `dest.start + (v - source.start)`; the mapping is an order-preserving
/// affine shift, never a reversal or rescale. Query drivers rely on that
/// property when they take the minimum of an interval at its lower bound.
///
/// Rules are built once, when the stage tables are assembled, and never
/// change afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    source: Interval,
    dest: Interval,
}

impl Rule {
    /// Build a rule from one table line: destination start, source start,
    /// and shared length.
    ///
    /// Rejects a negative length; a zero-length rule is legal but matches
    /// nothing.
    pub fn new(dest_start: i64, src_start: i64, length: i64) -> Result<Self, RuleError> {
        if length < 0 {
            return Err(RuleError::NegativeLength { length });
        }
        Ok(Self {
            source: Interval::new(src_start, src_start + length),
            dest: Interval::new(dest_start, dest_start + length),
        })
    }

    /// Build a rule from two explicit intervals.
    ///
    /// Rejects intervals whose lengths differ: a shift cannot stretch or
    /// shrink its input.
    pub fn from_intervals(source: Interval, dest: Interval) -> Result<Self, RuleError> {
        if source.len() != dest.len() {
            return Err(RuleError::LengthMismatch { source, dest });
        }
        Ok(Self { source, dest })
    }

    /// The interval of input values this rule matches.
    pub const fn source(&self) -> Interval {
        self.source
    }

    /// The interval the source is shifted onto.
    pub const fn dest(&self) -> Interval {
        self.dest
    }

    /// Number of values the rule covers.
    pub const fn len(&self) -> i64 {
        self.source.len()
    }

    /// Whether the rule covers no values.
    pub const fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// The signed shift this rule applies.
    pub const fn offset(&self) -> i64 {
        self.dest.start() - self.source.start()
    }

    /// Whether `value` falls inside the source interval.
    pub const fn applies(&self, value: i64) -> bool {
        self.source.contains_value(value)
    }

    /// Map a single value through the rule.
    ///
    /// The caller must ensure [`applies`](Self::applies) holds; outside the
    /// source interval the result is meaningless.
    pub fn map(&self, value: i64) -> i64 {
        debug_assert!(self.applies(value), "value {value} outside rule source");
        value + self.offset()
    }

    /// Map a whole interval through the rule.
    ///
    /// The interval must lie entirely within the source; stages guarantee
    /// this by intersecting before mapping.
    pub fn map_interval(&self, interval: Interval) -> Interval {
        debug_assert!(
            self.source.start() <= interval.start() && interval.end() <= self.source.end(),
            "interval {interval} escapes rule source {}",
            self.source,
        );
        interval.shift(self.offset())
    }

    /// Whether `interval` shares any value with the rule's source.
    pub fn overlaps_source(&self, interval: Interval) -> bool {
        self.source.overlaps(interval)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}
