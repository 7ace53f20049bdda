//! Genetic codes for translating target codons.
//!
//! Tables are stored as the 64-letter strings NCBI publishes, indexed in
//! TCAG order. Translation never fails: stop codons come back as `b'*'` and
//! codons containing ambiguity codes as `b'X'`.

use std::fmt;
use std::str::FromStr;

use c4_core::C4Error;

const NO_BASE: u8 = u8::MAX;

/// Base to TCAG rank, both cases, U read as T.
const BASE_RANK: [u8; 256] = {
    let mut rank = [NO_BASE; 256];
    let bases = *b"TCAG";
    let mut i = 0;
    while i < 4 {
        rank[bases[i] as usize] = i as u8;
        rank[bases[i].to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    rank[b'U' as usize] = 0;
    rank[b'u' as usize] = 0;
    rank
};

fn codon_rank(codon: &[u8]) -> Option<usize> {
    let [a, b, c] = codon else {
        return None;
    };
    let mut rank = 0;
    for &base in [a, b, c] {
        let r = BASE_RANK[base as usize];
        if r == NO_BASE {
            return None;
        }
        rank = rank * 4 + r as usize;
    }
    Some(rank)
}

const STANDARD: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const VERTEBRATE_MITO: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG";

/// NCBI translation table numbers understood by the codon models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneticCodeId {
    #[default]
    Standard = 1,
    VertebrateMitochondrial = 2,
    BacterialPlastid = 11,
}

impl GeneticCodeId {
    /// The NCBI table number.
    pub fn ncbi_id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for GeneticCodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ncbi_id())
    }
}

impl FromStr for GeneticCodeId {
    type Err = C4Error;

    /// Parse an NCBI table number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Standard),
            "2" => Ok(Self::VertebrateMitochondrial),
            "11" => Ok(Self::BacterialPlastid),
            other => Err(C4Error::Parse(format!(
                "unsupported genetic code '{other}' (expected 1, 2 or 11)"
            ))),
        }
    }
}

/// A translation table.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    id: GeneticCodeId,
    table: &'static [u8; 64],
}

impl GeneticCode {
    pub fn from_id(id: GeneticCodeId) -> Self {
        let table = match id {
            GeneticCodeId::VertebrateMitochondrial => VERTEBRATE_MITO,
            // Table 11 differs from table 1 only in its start codons.
            GeneticCodeId::Standard | GeneticCodeId::BacterialPlastid => STANDARD,
        };
        Self { id, table }
    }

    pub fn standard() -> Self {
        Self::from_id(GeneticCodeId::Standard)
    }

    pub fn id(&self) -> GeneticCodeId {
        self.id
    }

    /// Amino acid for one codon; `b'X'` unless `codon` is three unambiguous bases.
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        codon_rank(codon).map_or(b'X', |rank| self.table[rank])
    }

    /// Translate whole codons from the start of `seq`; a trailing partial
    /// codon is dropped.
    pub fn translate(&self, seq: &[u8]) -> Vec<u8> {
        seq.chunks_exact(3)
            .map(|codon| self.translate_codon(codon))
            .collect()
    }

    pub fn is_stop(&self, codon: &[u8]) -> bool {
        self.translate_codon(codon) == b'*'
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::standard()
    }
}
