//! Alignment paths recovered by the engine.

use core::fmt;

use c4_core::Scored;

use crate::graph::{StateId, StateRole, TransitionId};
use crate::label::{Advance, Label};

/// One transition taken by an alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentStep {
    pub transition: TransitionId,
    pub label: Label,
    pub from: StateId,
    pub to: StateId,
    /// Role of the state the step lands in.
    pub role: StateRole,
    /// Query position before the step (0-based).
    pub query_pos: usize,
    /// Target position before the step (0-based).
    pub target_pos: usize,
    pub advance: Advance,
    pub score: i32,
}

/// A run of consecutive steps with the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub label: Label,
    pub query: usize,
    pub target: usize,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.label, self.query, self.target)
    }
}

/// The optimal path through a compiled model for one (query, target) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentPath {
    pub model_name: String,
    pub score: i32,
    /// Start position in the query (0-based, inclusive).
    pub query_start: usize,
    /// End position in the query (0-based, exclusive).
    pub query_end: usize,
    /// Start position in the target (0-based, inclusive).
    pub target_start: usize,
    /// End position in the target (0-based, exclusive).
    pub target_end: usize,
    pub steps: Vec<AlignmentStep>,
}

impl AlignmentPath {
    /// Total symbols consumed over all steps.
    pub fn advance(&self) -> Advance {
        self.steps
            .iter()
            .fold(Advance::ZERO, |acc, step| acc + step.advance)
    }

    /// Whether any step lands in a state with `role`.
    pub fn visits(&self, role: StateRole) -> bool {
        self.steps.iter().any(|s| s.role == role)
    }

    /// Number of steps carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.steps.iter().filter(|s| s.label == label).count()
    }

    /// Consecutive steps merged by label.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out: Vec<Segment> = Vec::new();
        for step in &self.steps {
            match out.last_mut() {
                Some(seg) if seg.label == step.label => {
                    seg.query += step.advance.query;
                    seg.target += step.advance.target;
                }
                _ => out.push(Segment {
                    label: step.label,
                    query: step.advance.query,
                    target: step.advance.target,
                }),
            }
        }
        out
    }

    /// Segments as one space-separated string, e.g. `"match 1 3 5'ss 0 2"`.
    pub fn segment_string(&self) -> String {
        self.segments()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Scored for AlignmentPath {
    fn score(&self) -> i32 {
        self.score
    }
}
