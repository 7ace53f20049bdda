//! Batch alignment of many pairs against one compiled model.
//!
//! Pairs are aligned in parallel with rayon; each alignment owns its DP
//! table and only reads the shared recurrence. Results come back in input
//! order, one `Result` per pair, so a failing pair does not abort the rest.

use rayon::prelude::*;

use c4_core::{Result, Sequence};

use crate::path::AlignmentPath;
use crate::viterbi::Viterbi;

/// Align every `(query, target)` byte pair.
pub fn align_batch(
    engine: &Viterbi<'_>,
    pairs: &[(&[u8], &[u8])],
) -> Vec<Result<Option<AlignmentPath>>> {
    pairs
        .par_iter()
        .map(|(query, target)| engine.align(query, target))
        .collect()
}

/// Align every pair of sequence records, checking alphabets per pair.
pub fn align_sequence_batch<Q, T>(
    engine: &Viterbi<'_>,
    pairs: &[(&Q, &T)],
) -> Vec<Result<Option<AlignmentPath>>>
where
    Q: Sequence + Sync + ?Sized,
    T: Sequence + Sync + ?Sized,
{
    pairs
        .par_iter()
        .map(|(query, target)| engine.align_sequences(*query, *target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelBuilder;
    use crate::compile::{compile, CompiledRecurrence};
    use crate::model_type::{AffineModelType, ModelKind, ModelType};
    use crate::tracer::Tracer;
    use c4_core::{AlphabetType, C4Error};
    use c4_seq::SeqRecord;

    fn dna_global() -> CompiledRecurrence {
        let model = ModelBuilder::new(AlphabetType::Dna, AlphabetType::Dna)
            .with_tracer(Tracer::silent())
            .build(ModelType::new(ModelKind::Affine, AffineModelType::Global))
            .unwrap();
        compile(&model).unwrap()
    }

    #[test]
    fn batch_multiple_pairs() {
        let c = dna_global();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        let pairs: Vec<(&[u8], &[u8])> = vec![
            (b"ACGT", b"ACGT"),
            (b"AAAA", b"TTTT"),
            (b"ACGT", b"ACT"),
        ];
        let results = align_batch(&engine, &pairs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().as_ref().unwrap().score, 20);
        assert_eq!(results[1].as_ref().unwrap().as_ref().unwrap().score, -16);
        assert!(results[2].as_ref().unwrap().is_some());
    }

    #[test]
    fn batch_matches_serial() {
        let c = dna_global();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        let pairs: Vec<(&[u8], &[u8])> = vec![
            (b"ACGTTGCA", b"ACGGTTGA"),
            (b"GATTACA", b"GATCACA"),
            (b"CCCC", b"CCGCC"),
        ];
        let parallel = align_batch(&engine, &pairs);
        for (result, (q, t)) in parallel.into_iter().zip(&pairs) {
            assert_eq!(result.unwrap(), engine.align(q, t).unwrap());
        }
    }

    #[test]
    fn mismatch_is_local_to_its_pair() {
        let c = dna_global();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        let dna = SeqRecord::new("d", b"ACGT", AlphabetType::Dna).unwrap();
        let protein = SeqRecord::new("p", b"MKV", AlphabetType::Protein).unwrap();
        let pairs = vec![(&dna, &dna), (&protein, &dna), (&dna, &dna)];
        let results = align_sequence_batch(&engine, &pairs);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(C4Error::AlphabetMismatch { .. })));
        assert!(results[2].is_ok());
    }

    #[test]
    fn empty_batch() {
        let c = dna_global();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        assert!(align_batch(&engine, &[]).is_empty());
    }
}
