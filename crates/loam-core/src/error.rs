//! Construction errors for core types.

use std::error::Error;
use std::fmt;

use crate::interval::Interval;

/// Errors from [`Rule`](crate::Rule) construction.
///
/// A rule is a pure shift, so its source and destination intervals must
/// have identical lengths. Malformed rules are rejected here, at build
/// time, rather than detected mid-query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// Source and destination intervals differ in length.
    LengthMismatch {
        /// The offered source interval.
        source: Interval,
        /// The offered destination interval.
        dest: Interval,
    },
    /// A rule was declared with a negative length.
    NegativeLength {
        /// The offending length.
        length: i64,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { source, dest } => {
                write!(
                    f,
                    "rule source {source} and destination {dest} differ in length"
                )
            }
            Self::NegativeLength { length } => {
                write!(f, "rule length must be non-negative, got {length}")
            }
        }
    }
}

impl Error for RuleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_length_mismatch() {
        let err = RuleError::LengthMismatch {
            source: Interval::new(0, 10),
            dest: Interval::new(50, 55),
        };
        assert_eq!(
            err.to_string(),
            "rule source [0, 10) and destination [50, 55) differ in length"
        );
    }

    #[test]
    fn display_negative_length() {
        let err = RuleError::NegativeLength { length: -3 };
        assert_eq!(err.to_string(), "rule length must be non-negative, got -3");
    }
}
