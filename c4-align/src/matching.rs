//! Match scoring: comparing the symbols one MATCH step consumes.

use c4_core::{AlphabetType, C4Error, Result};
use c4_seq::{GeneticCode, GeneticCodeId};

use crate::label::Advance;
use crate::scoring::ScoringScheme;

/// Which pair of alphabets a match compares, and therefore how far it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// One base against one base.
    DnaToDna,
    /// One residue against one residue.
    ProteinToProtein,
    /// One query residue against one target codon.
    ProteinToDna,
    /// One query codon against one target residue.
    DnaToProtein,
}

impl MatchType {
    /// Pick the match type for a (query, target) alphabet pair.
    ///
    /// Nucleotide pairs must use the same alphabet; [`AlphabetType::Unknown`]
    /// never matches.
    ///
    /// # Errors
    ///
    /// Returns [`C4Error::AlphabetMismatch`] for any other combination.
    pub fn from_alphabets(query: AlphabetType, target: AlphabetType) -> Result<Self> {
        use AlphabetType::*;
        match (query, target) {
            (Dna, Dna) | (Rna, Rna) => Ok(MatchType::DnaToDna),
            (Protein, Protein) => Ok(MatchType::ProteinToProtein),
            (Protein, Dna) => Ok(MatchType::ProteinToDna),
            (Dna, Protein) => Ok(MatchType::DnaToProtein),
            (Unknown, _) => Err(C4Error::AlphabetMismatch {
                context: "query".into(),
                expected: target,
                found: query,
            }),
            _ => Err(C4Error::AlphabetMismatch {
                context: "target".into(),
                expected: query,
                found: target,
            }),
        }
    }

    /// Symbols consumed by one match step.
    pub fn advance(self) -> Advance {
        match self {
            MatchType::DnaToDna | MatchType::ProteinToProtein => Advance::new(1, 1),
            MatchType::ProteinToDna => Advance::new(1, 3),
            MatchType::DnaToProtein => Advance::new(3, 1),
        }
    }
}

/// The scoring object carried by MATCH transitions.
///
/// Shared (read-only) between a host model and any sub-model built to wrap
/// its MATCH transition.
#[derive(Debug, Clone)]
pub struct Match {
    kind: MatchType,
    scheme: ScoringScheme,
    code: GeneticCode,
}

impl Match {
    pub fn new(kind: MatchType, scheme: ScoringScheme, code: GeneticCodeId) -> Self {
        Self {
            kind,
            scheme,
            code: GeneticCode::from_id(code),
        }
    }

    pub fn kind(&self) -> MatchType {
        self.kind
    }

    pub fn advance(&self) -> Advance {
        self.kind.advance()
    }

    pub fn scheme(&self) -> &ScoringScheme {
        &self.scheme
    }

    /// Score the symbols one match step consumes.
    ///
    /// `query` and `target` must be exactly [`Match::advance`] long.
    pub fn score(&self, query: &[u8], target: &[u8]) -> i32 {
        match self.kind {
            MatchType::DnaToDna | MatchType::ProteinToProtein => {
                self.scheme.score_pair(query[0], target[0])
            }
            MatchType::ProteinToDna => self.score_codon(query[0], target),
            MatchType::DnaToProtein => self
                .scheme
                .score_pair(self.code.translate_codon(query), target[0]),
        }
    }

    /// Score a residue against a (possibly reassembled) codon.
    pub fn score_codon(&self, residue: u8, codon: &[u8]) -> i32 {
        self.scheme
            .score_pair(residue, self.code.translate_codon(codon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoringMatrix, SubstitutionMatrix};

    fn protein_match(kind: MatchType) -> Match {
        Match::new(
            kind,
            SubstitutionMatrix::blosum62().into(),
            GeneticCodeId::Standard,
        )
    }

    #[test]
    fn alphabet_pairs() {
        use AlphabetType::*;
        assert_eq!(MatchType::from_alphabets(Dna, Dna).unwrap(), MatchType::DnaToDna);
        assert_eq!(MatchType::from_alphabets(Rna, Rna).unwrap(), MatchType::DnaToDna);
        assert_eq!(
            MatchType::from_alphabets(Protein, Dna).unwrap(),
            MatchType::ProteinToDna
        );
        assert_eq!(
            MatchType::from_alphabets(Dna, Protein).unwrap(),
            MatchType::DnaToProtein
        );
        assert!(matches!(
            MatchType::from_alphabets(Dna, Rna),
            Err(C4Error::AlphabetMismatch { .. })
        ));
        assert!(matches!(
            MatchType::from_alphabets(Unknown, Dna),
            Err(C4Error::AlphabetMismatch { .. })
        ));
    }

    #[test]
    fn advances() {
        assert_eq!(MatchType::ProteinToDna.advance(), Advance::new(1, 3));
        assert_eq!(MatchType::DnaToProtein.advance(), Advance::new(3, 1));
        assert_eq!(MatchType::DnaToDna.advance(), Advance::new(1, 1));
    }

    #[test]
    fn codon_scoring_translates_target() {
        let m = protein_match(MatchType::ProteinToDna);
        assert_eq!(m.score(b"M", b"ATG"), 5);
        assert_eq!(m.score(b"F", b"TTT"), 6);
        assert_eq!(m.score(b"M", b"TAA"), -4);
    }

    #[test]
    fn reverse_translation_direction() {
        let m = protein_match(MatchType::DnaToProtein);
        assert_eq!(m.score(b"TGG", b"W"), 11);
    }

    #[test]
    fn simple_scheme_on_nucleotides() {
        let m = Match::new(
            MatchType::DnaToDna,
            ScoringMatrix::dna_default().into(),
            GeneticCodeId::Standard,
        );
        assert_eq!(m.score(b"A", b"a"), 5);
        assert_eq!(m.score(b"A", b"C"), -4);
    }
}
