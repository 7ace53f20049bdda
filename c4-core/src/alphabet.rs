//! The alphabet tag carried by every sequence handed to the core.

use core::fmt;
use core::str::FromStr;

use crate::error::{C4Error, Result};

/// Which symbol set a sequence is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphabetType {
    Protein,
    Dna,
    Rna,
    /// Not yet determined; never satisfies a model's alphabet requirement.
    Unknown,
}

impl AlphabetType {
    /// Human-readable name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            AlphabetType::Protein => "protein",
            AlphabetType::Dna => "DNA",
            AlphabetType::Rna => "RNA",
            AlphabetType::Unknown => "unknown",
        }
    }

    /// Whether this is a nucleotide alphabet.
    pub fn is_nucleotide(self) -> bool {
        matches!(self, AlphabetType::Dna | AlphabetType::Rna)
    }
}

impl fmt::Display for AlphabetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlphabetType {
    type Err = C4Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "protein" | "p" | "aa" => Ok(AlphabetType::Protein),
            "dna" | "d" | "nucleotide" => Ok(AlphabetType::Dna),
            "rna" | "r" => Ok(AlphabetType::Rna),
            "unknown" | "u" => Ok(AlphabetType::Unknown),
            other => Err(C4Error::Parse(format!("unknown alphabet type '{other}'"))),
        }
    }
}
