//! Traits the aligner's inputs and outputs implement.

use crate::alphabet::AlphabetType;

/// A sequence as the aligner sees it: symbols plus the alphabet tag that
/// decides which comparison models may read it.
pub trait Sequence {
    fn as_bytes(&self) -> &[u8];

    fn alphabet(&self) -> AlphabetType;

    /// Length in residues or bases.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Something carrying an integer Viterbi score.
pub trait Scored {
    fn score(&self) -> i32;
}

/// A named record. The name is what reports print.
pub trait Annotated {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }
}
