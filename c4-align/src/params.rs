//! Scoring parameters consumed by the model factories.

use c4_core::AlphabetType;
use c4_seq::GeneticCodeId;

use crate::scoring::{ScoringMatrix, ScoringScheme, SubstitutionMatrix};
use crate::splice::SpliceScores;

/// Everything a factory needs to attach scores to transitions.
#[derive(Debug, Clone)]
pub struct ModelParams {
    /// Residue scoring and gap penalties.
    pub scoring: ScoringScheme,
    /// Penalty for each frameshift in codon models (default: -28).
    pub frameshift: i32,
    /// Intron scoring for spliced models.
    pub splice: SpliceScores,
    /// Translation table for codon comparisons (default: standard).
    pub genetic_code: GeneticCodeId,
}

impl Default for ModelParams {
    /// Nucleotide defaults.
    fn default() -> Self {
        Self {
            scoring: ScoringMatrix::dna_default().into(),
            frameshift: -28,
            splice: SpliceScores::default(),
            genetic_code: GeneticCodeId::Standard,
        }
    }
}

impl ModelParams {
    /// BLOSUM62 when either side is protein, nucleotide defaults otherwise.
    pub fn for_alphabets(query: AlphabetType, target: AlphabetType) -> Self {
        let mut params = Self::default();
        if query == AlphabetType::Protein || target == AlphabetType::Protein {
            params.scoring = SubstitutionMatrix::blosum62().into();
        }
        params
    }

    pub fn with_scoring(mut self, scoring: impl Into<ScoringScheme>) -> Self {
        self.scoring = scoring.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_pairs_use_blosum() {
        let p = ModelParams::for_alphabets(AlphabetType::Protein, AlphabetType::Dna);
        assert_eq!(p.scoring.score_pair(b'W', b'W'), 11);
        let d = ModelParams::for_alphabets(AlphabetType::Dna, AlphabetType::Dna);
        assert_eq!(d.scoring.score_pair(b'A', b'A'), 5);
        assert_eq!(d.frameshift, -28);
    }
}
