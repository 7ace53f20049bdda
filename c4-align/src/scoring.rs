//! Residue scoring schemes.
//!
//! The comparison models never hard-code a table: a [`Match`](crate::matching::Match)
//! wraps a [`ScoringScheme`] and the gap transitions read their penalties
//! from it. Pair scores are looked up inside the Viterbi fill, so both
//! schemes resolve a residue pair with a table lookup and no branching on
//! the residue itself.

use c4_core::{C4Error, Result};

/// Affine gap costs shared by both schemes. Both values are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapCosts {
    pub open: i32,
    pub extend: i32,
}

/// Nucleotide scoring: one score for identities, one for everything else.
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl ScoringMatrix {
    /// Create a matrix from a match bonus and three penalties.
    ///
    /// # Errors
    ///
    /// Returns [`C4Error::InvalidInput`] unless `match_score` is positive and
    /// the other three values are negative.
    pub fn new(
        match_score: i32,
        mismatch_score: i32,
        gap_open: i32,
        gap_extend: i32,
    ) -> Result<Self> {
        let checks = [
            (match_score > 0, "match score must be positive"),
            (mismatch_score < 0, "mismatch score must be negative"),
            (gap_open < 0, "gap open penalty must be negative"),
            (gap_extend < 0, "gap extend penalty must be negative"),
        ];
        if let Some((_, msg)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(C4Error::InvalidInput(format!(
                "{msg} (got {match_score}/{mismatch_score}/{gap_open}/{gap_extend})"
            )));
        }
        Ok(Self {
            match_score,
            mismatch_score,
            gap_open,
            gap_extend,
        })
    }

    /// +5 match, -4 mismatch, -12 gap open, -4 gap extend.
    pub fn dna_default() -> Self {
        Self {
            match_score: 5,
            mismatch_score: -4,
            gap_open: -12,
            gap_extend: -4,
        }
    }

    /// Score two bases, ignoring case.
    pub fn score_pair(&self, a: u8, b: u8) -> i32 {
        if a.eq_ignore_ascii_case(&b) {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Residue order of the substitution tables.
const AA_ORDER: &[u8; AA_DIM] = b"ARNDCQEGHILKMFPSTWYVBZX*";
const AA_DIM: usize = 24;
const NO_RESIDUE: u8 = u8::MAX;

/// Byte to table row, both cases; [`NO_RESIDUE`] for anything else.
const AA_INDEX: [u8; 256] = {
    let mut index = [NO_RESIDUE; 256];
    let mut i = 0;
    while i < AA_DIM {
        let c = AA_ORDER[i];
        index[c as usize] = i as u8;
        index[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    index
};

/// A 24x24 amino-acid substitution matrix (20 residues, B, Z, X and stop).
///
/// Bytes outside the table score the matrix minimum, so a stray symbol is
/// penalised like the worst substitution rather than rejected mid-fill.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    scores: &'static [i32; AA_DIM * AA_DIM],
    floor: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    name: &'static str,
}

impl SubstitutionMatrix {
    fn from_table(
        name: &'static str,
        scores: &'static [i32; AA_DIM * AA_DIM],
        gaps: GapCosts,
    ) -> Self {
        let floor = scores.iter().copied().min().unwrap_or(0);
        Self {
            scores,
            floor,
            gap_open: gaps.open,
            gap_extend: gaps.extend,
            name,
        }
    }

    /// BLOSUM62 with -11 open and -1 extend.
    pub fn blosum62() -> Self {
        Self::from_table("BLOSUM62", &BLOSUM62, GapCosts { open: -11, extend: -1 })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Score two residues, ignoring case.
    pub fn score_pair(&self, a: u8, b: u8) -> i32 {
        let (i, j) = (AA_INDEX[a as usize], AA_INDEX[b as usize]);
        if i == NO_RESIDUE || j == NO_RESIDUE {
            return self.floor;
        }
        self.scores[i as usize * AA_DIM + j as usize]
    }

    /// Lowest entry of the table.
    pub fn floor(&self) -> i32 {
        self.floor
    }
}

/// The scheme a comparison model scores its residue pairs with.
#[derive(Debug, Clone)]
pub enum ScoringScheme {
    Simple(ScoringMatrix),
    Substitution(SubstitutionMatrix),
}

impl ScoringScheme {
    pub fn score_pair(&self, a: u8, b: u8) -> i32 {
        match self {
            ScoringScheme::Simple(m) => m.score_pair(a, b),
            ScoringScheme::Substitution(m) => m.score_pair(a, b),
        }
    }

    /// Gap costs the affine and codon factories attach to their gap transitions.
    pub fn gaps(&self) -> GapCosts {
        let (open, extend) = match self {
            ScoringScheme::Simple(m) => (m.gap_open, m.gap_extend),
            ScoringScheme::Substitution(m) => (m.gap_open, m.gap_extend),
        };
        GapCosts { open, extend }
    }

    pub fn gap_open(&self) -> i32 {
        self.gaps().open
    }

    pub fn gap_extend(&self) -> i32 {
        self.gaps().extend
    }
}

impl From<ScoringMatrix> for ScoringScheme {
    fn from(m: ScoringMatrix) -> Self {
        ScoringScheme::Simple(m)
    }
}

impl From<SubstitutionMatrix> for ScoringScheme {
    fn from(m: SubstitutionMatrix) -> Self {
        ScoringScheme::Substitution(m)
    }
}

// Row/column order: A R N D C Q E G H I L K M F P S T W Y V B Z X *
#[rustfmt::skip]
static BLOSUM62: [i32; AA_DIM * AA_DIM] = [
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];
