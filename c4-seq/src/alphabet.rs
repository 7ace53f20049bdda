//! Alphabet validation and guessing.
//!
//! The core only ever sees an [`AlphabetType`] tag; this module decides which
//! tag a raw byte string deserves and checks that its symbols belong to it.

use c4_core::{AlphabetType, C4Error, Result};

/// IUPAC DNA alphabet: `ACGTNRYSWKMBDHV`.
const DNA_BYTES: &[u8] = b"ACGTNRYSWKMBDHV";

/// IUPAC RNA alphabet: `ACGUNRYSWKMBDHV`.
const RNA_BYTES: &[u8] = b"ACGUNRYSWKMBDHV";

/// 20 standard amino acids plus `XBZJUO*`.
const PROTEIN_BYTES: &[u8] = b"ACDEFGHIKLMNPQRSTVWYXBZJUO*";

/// Fraction of unambiguous-nucleotide symbols above which a sequence is
/// taken to be nucleic acid.
const NUCLEOTIDE_FRACTION: f64 = 0.9;

/// The set of valid uppercase bytes for an alphabet, or `None` for
/// [`AlphabetType::Unknown`].
pub fn valid_bytes(alphabet: AlphabetType) -> Option<&'static [u8]> {
    match alphabet {
        AlphabetType::Dna => Some(DNA_BYTES),
        AlphabetType::Rna => Some(RNA_BYTES),
        AlphabetType::Protein => Some(PROTEIN_BYTES),
        AlphabetType::Unknown => None,
    }
}

/// Check every symbol of `seq` against `alphabet`. Case-insensitive.
///
/// # Errors
///
/// Returns [`C4Error::InvalidInput`] naming the first offending position, or
/// if `alphabet` is [`AlphabetType::Unknown`].
pub fn validate(seq: &[u8], alphabet: AlphabetType) -> Result<()> {
    let valid = valid_bytes(alphabet).ok_or_else(|| {
        C4Error::InvalidInput("cannot validate against an unknown alphabet".into())
    })?;
    match seq
        .iter()
        .position(|b| !valid.contains(&b.to_ascii_uppercase()))
    {
        Some(pos) => Err(C4Error::InvalidInput(format!(
            "invalid {} symbol '{}' at position {}",
            alphabet,
            seq[pos] as char,
            pos
        ))),
        None => Ok(()),
    }
}

/// Guess the alphabet of a raw sequence.
///
/// A sequence is nucleic acid when at least 90% of its letters are
/// `A`, `C`, `G`, `T`, `U` or `N`; it is RNA if it then contains `U` but no
/// `T`. Anything else is protein. Empty input is [`AlphabetType::Unknown`].
pub fn guess_alphabet(seq: &[u8]) -> AlphabetType {
    let mut letters = 0usize;
    let mut nucleotides = 0usize;
    let mut has_t = false;
    let mut has_u = false;
    for &b in seq {
        let up = b.to_ascii_uppercase();
        if !up.is_ascii_alphabetic() && up != b'*' {
            continue;
        }
        letters += 1;
        match up {
            b'A' | b'C' | b'G' | b'N' => nucleotides += 1,
            b'T' => {
                nucleotides += 1;
                has_t = true;
            }
            b'U' => {
                nucleotides += 1;
                has_u = true;
            }
            _ => {}
        }
    }
    if letters == 0 {
        return AlphabetType::Unknown;
    }
    if nucleotides as f64 >= letters as f64 * NUCLEOTIDE_FRACTION {
        if has_u && !has_t {
            AlphabetType::Rna
        } else {
            AlphabetType::Dna
        }
    } else {
        AlphabetType::Protein
    }
}
