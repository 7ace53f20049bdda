//! Sequence handling for the c4 aligner.
//!
//! Everything the core needs to receive a sequence, and nothing more:
//!
//! - **Alphabets**: validation and guessing of [`AlphabetType`](c4_core::AlphabetType) tags
//! - **Records**: [`SeqRecord`], the sequence handle passed to the engine
//! - **Codon translation**: [`GeneticCode`] (NCBI tables 1, 2, 11)
//! - **FASTA loading**: [`read_fasta`] and [`select_chunk`] for partitioned jobs
//!
//! # Example
//!
//! ```
//! use c4_core::{AlphabetType, Sequence};
//! use c4_seq::{GeneticCode, SeqRecord};
//!
//! let target = SeqRecord::new("t", b"atgttt", AlphabetType::Unknown).unwrap();
//! assert_eq!(target.alphabet(), AlphabetType::Dna);
//! assert_eq!(GeneticCode::standard().translate(target.as_bytes()), b"MF");
//! ```

pub mod alphabet;
pub mod codon;
pub mod fasta;
pub mod record;

pub use alphabet::{guess_alphabet, validate};
pub use codon::{GeneticCode, GeneticCodeId};
pub use fasta::{read_fasta, select_chunk};
pub use record::SeqRecord;
