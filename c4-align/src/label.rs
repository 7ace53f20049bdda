//! Transition labels, advance pairs and label data.
//!
//! A label says what kind of edit a transition performs; its [`LabelData`]
//! carries only what that kind needs in order to be scored. The compiler
//! resolves each (label, data) pair to a scoring closure with one exhaustive
//! `match`, so an unexpected combination is caught before any alignment runs.

use core::fmt;
use core::ops::Add;
use std::sync::Arc;

use crate::matching::Match;
use crate::phase::SplitCodon;
use crate::splice::SpliceSite;

/// The operation a transition performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    /// Structural edge. Silent when it advances nothing and carries no data.
    Passthrough,
    /// Aligned residue/base/codon pair.
    Match,
    /// First position of a gap.
    GapOpen,
    /// Each further position of a gap.
    GapExtend,
    /// Target bases skipped to shift the reading frame.
    Frameshift,
    /// 5' splice site: the first two intron bases.
    SpliceDonor,
    /// One intron base.
    Intron,
    /// 3' splice site: the last two intron bases.
    SpliceAcceptor,
    /// Part of a codon interrupted by an intron.
    SplitCodon,
}

impl Label {
    /// Lowercase name used in logs and summaries.
    pub fn name(self) -> &'static str {
        match self {
            Label::Passthrough => "passthrough",
            Label::Match => "match",
            Label::GapOpen => "gap-open",
            Label::GapExtend => "gap-extend",
            Label::Frameshift => "frameshift",
            Label::SpliceDonor => "5'ss",
            Label::Intron => "intron",
            Label::SpliceAcceptor => "3'ss",
            Label::SplitCodon => "split-codon",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many query and target symbols a transition consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Advance {
    pub query: usize,
    pub target: usize,
}

impl Advance {
    pub const ZERO: Advance = Advance::new(0, 0);

    pub const fn new(query: usize, target: usize) -> Self {
        Self { query, target }
    }

    /// Whether neither sequence advances.
    pub fn is_zero(self) -> bool {
        self.query == 0 && self.target == 0
    }
}

impl Add for Advance {
    type Output = Advance;

    fn add(self, rhs: Advance) -> Advance {
        Advance::new(self.query + rhs.query, self.target + rhs.target)
    }
}

impl fmt::Display for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.query, self.target)
    }
}

/// Scoring payload attached to a transition.
#[derive(Debug, Clone)]
pub enum LabelData {
    /// Residue/codon comparison.
    Match(Arc<Match>),
    /// A fixed score added every time the transition is taken.
    Penalty(i32),
    /// Dinucleotide-dependent splice-site score.
    Splice(SpliceSite),
    /// One half of a codon split by an intron.
    SplitCodon(SplitCodon),
}

impl LabelData {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            LabelData::Match(_) => "match",
            LabelData::Penalty(_) => "penalty",
            LabelData::Splice(_) => "splice",
            LabelData::SplitCodon(_) => "split-codon",
        }
    }

    /// The wrapped [`Match`], if this payload scores through one.
    pub fn as_match(&self) -> Option<&Arc<Match>> {
        match self {
            LabelData::Match(m) => Some(m),
            LabelData::SplitCodon(split) => Some(split.matcher()),
            _ => None,
        }
    }
}
