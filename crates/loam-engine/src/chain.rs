//! The stage chain: validation, scalar remapping, and whole-interval
//! propagation.
//!
//! [`Chain::new`] runs once at assembly time to check the stage list for
//! structural errors (duplicates, cycles, stranded stages) and to discover
//! the entry and terminal tags. Queries afterwards are pure reads over the
//! frozen structure.

use std::collections::{HashSet, VecDeque};
use std::error::Error;
use std::fmt;

use indexmap::IndexMap;
use loam_core::{Interval, Tag};

use crate::stage::Stage;

/// Errors from chain assembly and propagation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    /// No stages were supplied.
    Empty,

    /// Two stages consume the same tag.
    DuplicateSource {
        /// The contested tag.
        tag: Tag,
    },

    /// Every consumed tag is also produced by some stage, so no tag can
    /// start the chain: the stages form a closed cycle.
    NoEntry,

    /// More than one consumed tag is produced by no stage; the stages do
    /// not form a single chain.
    MultipleEntries {
        /// The candidate entry tags, sorted.
        tags: Vec<Tag>,
    },

    /// Walking the chain from the entry revisited a tag.
    Cycle {
        /// The tag reached twice.
        tag: Tag,
    },

    /// A stage is not reachable from the entry tag.
    Disconnected {
        /// The consumed tag of the stranded stage.
        tag: Tag,
    },

    /// Propagation reached a tag that no stage consumes and that is not
    /// the terminal tag.
    MissingStage {
        /// The unhandled tag.
        tag: Tag,
    },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "chain has no stages"),
            Self::DuplicateSource { tag } => {
                write!(f, "more than one stage consumes tag '{tag}'")
            }
            Self::NoEntry => {
                write!(f, "no entry tag: every consumed tag is also produced")
            }
            Self::MultipleEntries { tags } => {
                write!(f, "multiple entry tags: ")?;
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{tag}'")?;
                }
                Ok(())
            }
            Self::Cycle { tag } => {
                write!(f, "chain re-enters tag '{tag}' after leaving it")
            }
            Self::Disconnected { tag } => {
                write!(f, "stage consuming '{tag}' is unreachable from the entry")
            }
            Self::MissingStage { tag } => {
                write!(f, "no stage consumes tag '{tag}'")
            }
        }
    }
}

impl Error for ChainError {}

/// An ordered sequence of stages forming one linear remapping pipeline.
///
/// Stages are keyed by the tag they consume; each stage's target names the
/// next stage, and the one target no stage consumes is the terminal tag.
/// The whole structure is configuration data: chain length and stage order
/// come from the supplied stages, nothing is compiled in.
///
/// A `Chain` is immutable after construction and holds no interior state,
/// so it can be queried from many threads at once.
#[derive(Clone, Debug)]
pub struct Chain {
    stages: IndexMap<Tag, Stage>,
    entry: Tag,
    terminal: Tag,
}

impl Chain {
    /// Assemble and validate a chain from a stage list (any order).
    ///
    /// Checks performed, all at assembly time:
    ///
    /// 1. At least one stage.
    /// 2. No two stages consume the same tag.
    /// 3. Exactly one entry tag (consumed but produced by no stage).
    /// 4. Following target links from the entry visits every stage
    ///    exactly once (no cycles, no stranded stages).
    pub fn new(stages: Vec<Stage>) -> Result<Self, ChainError> {
        if stages.is_empty() {
            return Err(ChainError::Empty);
        }

        let mut map: IndexMap<Tag, Stage> = IndexMap::with_capacity(stages.len());
        for stage in stages {
            let tag = stage.source().clone();
            if map.insert(tag.clone(), stage).is_some() {
                return Err(ChainError::DuplicateSource { tag });
            }
        }

        let produced: HashSet<Tag> = map.values().map(|s| s.target().clone()).collect();
        let mut entries: Vec<Tag> = map
            .keys()
            .filter(|tag| !produced.contains(tag.as_str()))
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(ChainError::NoEntry);
        }
        if entries.len() > 1 {
            entries.sort();
            return Err(ChainError::MultipleEntries { tags: entries });
        }
        let entry = entries.remove(0);

        // Walk the chain; the first tag no stage consumes is the terminal.
        let mut visited: HashSet<Tag> = HashSet::with_capacity(map.len());
        let mut current = entry.clone();
        loop {
            match map.get(&current) {
                Some(stage) => {
                    if !visited.insert(current.clone()) {
                        return Err(ChainError::Cycle { tag: current });
                    }
                    current = stage.target().clone();
                }
                None => break,
            }
        }
        if let Some(stranded) = map.keys().find(|tag| !visited.contains(tag.as_str())) {
            return Err(ChainError::Disconnected {
                tag: stranded.clone(),
            });
        }

        Ok(Self {
            stages: map,
            entry,
            terminal: current,
        })
    }

    /// The tag the chain consumes.
    pub fn entry(&self) -> &Tag {
        &self.entry
    }

    /// The tag the chain ultimately produces.
    pub fn terminal(&self) -> &Tag {
        &self.terminal
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: construction rejects empty chains.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look up the stage consuming `tag`, if any.
    pub fn stage(&self, tag: &str) -> Option<&Stage> {
        self.stages.get(tag)
    }

    /// Remap a single value from `from` down to the terminal tag.
    ///
    /// Returns [`ChainError::MissingStage`] if the walk reaches a tag no
    /// stage consumes before arriving at the terminal.
    pub fn remap_value(&self, value: i64, from: &Tag) -> Result<i64, ChainError> {
        let mut tag = from;
        let mut v = value;
        while tag != &self.terminal {
            let stage = self
                .stages
                .get(tag)
                .ok_or_else(|| ChainError::MissingStage { tag: tag.clone() })?;
            v = stage.remap(v);
            tag = stage.target();
        }
        Ok(v)
    }

    /// Remap a single value, recording the intermediate value at every
    /// tag along the way.
    ///
    /// The first entry is `(from, value)` and the last is the terminal
    /// tag with the final value. Useful for diagnostic printing of one
    /// value's journey through the chain.
    pub fn trace(&self, value: i64, from: &Tag) -> Result<Vec<(Tag, i64)>, ChainError> {
        let mut steps = vec![(from.clone(), value)];
        let mut tag = from;
        let mut v = value;
        while tag != &self.terminal {
            let stage = self
                .stages
                .get(tag)
                .ok_or_else(|| ChainError::MissingStage { tag: tag.clone() })?;
            v = stage.remap(v);
            tag = stage.target();
            steps.push((tag.clone(), v));
        }
        Ok(steps)
    }

    /// Propagate a whole interval from `from` down to the terminal tag.
    ///
    /// Runs an explicit work-list of `(tag, interval)` pairs rather than
    /// call recursion: per-stage fan-out is small but compounds over the
    /// chain, and a queue keeps memory behavior flat regardless of chain
    /// length. Returns the terminal-space intervals; their union is
    /// exactly the image of `span`. An empty `span` yields no output.
    pub fn propagate(&self, span: Interval, from: &Tag) -> Result<Vec<Interval>, ChainError> {
        if span.is_empty() {
            return Ok(Vec::new());
        }
        let mut queue: VecDeque<(Tag, Interval)> = VecDeque::new();
        queue.push_back((from.clone(), span));
        let mut out = Vec::new();
        while let Some((tag, piece)) = queue.pop_front() {
            if tag == self.terminal {
                out.push(piece);
                continue;
            }
            let stage = self
                .stages
                .get(&tag)
                .ok_or_else(|| ChainError::MissingStage { tag: tag.clone() })?;
            let target = stage.target();
            for mapped in stage.project(piece) {
                queue.push_back((target.clone(), mapped));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_core::Rule;

    fn stage(source: &str, target: &str, rules: &[(i64, i64, i64)]) -> Stage {
        let rules = rules
            .iter()
            .map(|&(dest, src, len)| Rule::new(dest, src, len).unwrap())
            .collect();
        Stage::new(Tag::from(source), Tag::from(target), rules).unwrap()
    }

    // ── Assembly ────────────────────────────────────────────────

    #[test]
    fn valid_two_stage_chain() {
        let chain = Chain::new(vec![
            stage("seed", "soil", &[(52, 50, 48)]),
            stage("soil", "fertilizer", &[]),
        ])
        .unwrap();
        assert_eq!(chain.entry(), &Tag::from("seed"));
        assert_eq!(chain.terminal(), &Tag::from("fertilizer"));
        assert_eq!(chain.len(), 2);
        assert!(!chain.is_empty());
        assert!(chain.stage("seed").is_some());
        assert!(chain.stage("fertilizer").is_none());
    }

    #[test]
    fn stage_order_does_not_matter() {
        let chain = Chain::new(vec![
            stage("soil", "water", &[]),
            stage("seed", "soil", &[]),
        ])
        .unwrap();
        assert_eq!(chain.entry(), &Tag::from("seed"));
        assert_eq!(chain.terminal(), &Tag::from("water"));
    }

    #[test]
    fn empty_chain_rejected() {
        assert_eq!(Chain::new(Vec::new()).unwrap_err(), ChainError::Empty);
    }

    #[test]
    fn duplicate_source_rejected() {
        let err = Chain::new(vec![
            stage("seed", "soil", &[]),
            stage("seed", "water", &[]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ChainError::DuplicateSource {
                tag: Tag::from("seed")
            }
        );
    }

    #[test]
    fn closed_cycle_rejected() {
        let err = Chain::new(vec![stage("a", "b", &[]), stage("b", "a", &[])]).unwrap_err();
        assert_eq!(err, ChainError::NoEntry);
    }

    #[test]
    fn tail_into_cycle_rejected() {
        // a -> b -> c -> b: has an entry, but the walk revisits b.
        let err = Chain::new(vec![
            stage("a", "b", &[]),
            stage("b", "c", &[]),
            stage("c", "b", &[]),
        ])
        .unwrap_err();
        assert_eq!(err, ChainError::Cycle { tag: Tag::from("b") });
    }

    #[test]
    fn stranded_component_rejected() {
        // a -> b plus a closed c/d loop: only 'a' is an entry, c and d
        // are never reached.
        let err = Chain::new(vec![
            stage("a", "b", &[]),
            stage("c", "d", &[]),
            stage("d", "c", &[]),
        ])
        .unwrap_err();
        assert!(matches!(err, ChainError::Disconnected { .. }));
    }

    #[test]
    fn forked_inputs_rejected() {
        let err = Chain::new(vec![stage("a", "c", &[]), stage("b", "c", &[])]).unwrap_err();
        assert_eq!(
            err,
            ChainError::MultipleEntries {
                tags: vec![Tag::from("a"), Tag::from("b")]
            }
        );
    }

    // ── Scalar remapping ────────────────────────────────────────

    #[test]
    fn remap_value_chains_stages() {
        let chain = Chain::new(vec![
            stage("seed", "soil", &[(52, 50, 48)]),
            stage("soil", "water", &[(0, 80, 5)]),
        ])
        .unwrap();
        // 79 -> 81 -> 1
        assert_eq!(chain.remap_value(79, chain.entry()).unwrap(), 1);
        // Passthrough at both stages.
        assert_eq!(chain.remap_value(10, chain.entry()).unwrap(), 10);
    }

    #[test]
    fn remap_value_from_terminal_is_identity() {
        let chain = Chain::new(vec![stage("seed", "soil", &[(52, 50, 48)])]).unwrap();
        assert_eq!(chain.remap_value(79, chain.terminal()).unwrap(), 79);
    }

    #[test]
    fn remap_value_unknown_tag_fails() {
        let chain = Chain::new(vec![stage("seed", "soil", &[])]).unwrap();
        let err = chain.remap_value(1, &Tag::from("water")).unwrap_err();
        assert_eq!(
            err,
            ChainError::MissingStage {
                tag: Tag::from("water")
            }
        );
    }

    #[test]
    fn trace_records_every_tag() {
        let chain = Chain::new(vec![
            stage("seed", "soil", &[(52, 50, 48)]),
            stage("soil", "water", &[(0, 80, 5)]),
        ])
        .unwrap();
        let steps = chain.trace(79, chain.entry()).unwrap();
        assert_eq!(
            steps,
            vec![
                (Tag::from("seed"), 79),
                (Tag::from("soil"), 81),
                (Tag::from("water"), 1),
            ]
        );
    }

    // ── Interval propagation ────────────────────────────────────

    #[test]
    fn propagate_two_stage_worked_example() {
        // Stage A maps [0, 10) -> [50, 60); stage B maps [55, 60) -> [0, 5).
        // Input [0, 10) must land as {[50, 55), [0, 5)}.
        let chain = Chain::new(vec![
            stage("a", "b", &[(50, 0, 10)]),
            stage("b", "c", &[(0, 55, 5)]),
        ])
        .unwrap();
        let mut out = chain.propagate(Interval::new(0, 10), chain.entry()).unwrap();
        out.sort();
        assert_eq!(out, vec![Interval::new(0, 5), Interval::new(50, 55)]);
        assert_eq!(out.iter().map(|iv| iv.start()).min(), Some(0));
    }

    #[test]
    fn propagate_from_terminal_returns_input() {
        let chain = Chain::new(vec![stage("a", "b", &[(50, 0, 10)])]).unwrap();
        let span = Interval::new(3, 9);
        assert_eq!(
            chain.propagate(span, chain.terminal()).unwrap(),
            vec![span]
        );
    }

    #[test]
    fn propagate_unknown_tag_fails() {
        let chain = Chain::new(vec![stage("a", "b", &[])]).unwrap();
        let err = chain
            .propagate(Interval::new(0, 5), &Tag::from("x"))
            .unwrap_err();
        assert_eq!(err, ChainError::MissingStage { tag: Tag::from("x") });
    }

    #[test]
    fn propagate_empty_span_yields_nothing() {
        let chain = Chain::new(vec![stage("a", "b", &[(50, 0, 10)])]).unwrap();
        assert!(chain
            .propagate(Interval::new(4, 4), chain.entry())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn propagate_preserves_total_width_across_stages() {
        let chain = Chain::new(vec![
            stage("a", "b", &[(100, 5, 10), (300, 20, 5)]),
            stage("b", "c", &[(0, 102, 6)]),
            stage("c", "d", &[(1000, 0, 2)]),
        ])
        .unwrap();
        let span = Interval::new(0, 40);
        let out = chain.propagate(span, chain.entry()).unwrap();
        let total: i64 = out.iter().map(|iv| iv.len()).sum();
        assert_eq!(total, span.len());
    }
}
