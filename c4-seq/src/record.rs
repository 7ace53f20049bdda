//! Sequence records: the handle the core receives for a query or target.

use c4_core::{Annotated, AlphabetType, C4Error, Result, Sequence};

use crate::alphabet::{guess_alphabet, validate};

/// A named sequence with its alphabet tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    id: String,
    description: Option<String>,
    data: Vec<u8>,
    alphabet: AlphabetType,
}

impl SeqRecord {
    /// Create a record, validating `data` against `alphabet`.
    ///
    /// An [`AlphabetType::Unknown`] tag is replaced by a guess from the data.
    /// Symbols are uppercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty or contains symbols outside the
    /// (given or guessed) alphabet.
    pub fn new(id: impl Into<String>, data: &[u8], alphabet: AlphabetType) -> Result<Self> {
        let id = id.into();
        if data.is_empty() {
            return Err(C4Error::InvalidInput(format!("sequence '{id}' is empty")));
        }
        let alphabet = match alphabet {
            AlphabetType::Unknown => guess_alphabet(data),
            known => known,
        };
        validate(data, alphabet)
            .map_err(|e| C4Error::InvalidInput(format!("sequence '{id}': {e}")))?;
        Ok(Self {
            id,
            description: None,
            data: data.to_ascii_uppercase(),
            alphabet,
        })
    }

    /// Record identifier (first word of the FASTA header).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Sequence for SeqRecord {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn alphabet(&self) -> AlphabetType {
        self.alphabet
    }
}

impl Annotated for SeqRecord {
    fn name(&self) -> &str {
        &self.id
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uppercases_and_keeps_tag() {
        let rec = SeqRecord::new("q1", b"mf", AlphabetType::Protein).unwrap();
        assert_eq!(rec.as_bytes(), b"MF");
        assert_eq!(rec.alphabet(), AlphabetType::Protein);
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.name(), "q1");
    }

    #[test]
    fn unknown_alphabet_is_guessed() {
        let rec = SeqRecord::new("t1", b"ATGTTT", AlphabetType::Unknown).unwrap();
        assert_eq!(rec.alphabet(), AlphabetType::Dna);
    }

    #[test]
    fn empty_record_rejected() {
        assert!(SeqRecord::new("e", b"", AlphabetType::Dna).is_err());
    }

    #[test]
    fn invalid_symbol_names_the_record() {
        let err = SeqRecord::new("bad", b"ACGJ", AlphabetType::Dna).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
