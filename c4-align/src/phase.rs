//! The phase sub-model: codons interrupted by introns.
//!
//! Built around the `Match` of a protein-vs-DNA MATCH transition, it offers
//! four ways to consume one residue against one codon:
//!
//! * unspliced: the codon in one (1,3) step;
//! * phase 0: an intron, then the whole codon;
//! * phase 1: one base, an intron, then the last two bases;
//! * phase 2: two bases, an intron, then the last base.
//!
//! Split paths remember the bases read before the intron by branching on
//! them (4 branches for phase 1, 16 for phase 2), so the codon is scored
//! whole once its last base is read. Every intron position is left as a
//! silent slot for the intron model to be inserted into.

use std::sync::Arc;

use c4_core::{C4Error, Result};

use crate::graph::{StateRole, TransitionId};
use crate::label::{Advance, Label, LabelData};
use crate::matching::{Match, MatchType};
use crate::model::Model;

const BASES: [u8; 4] = *b"ACGT";

/// Which half of a split codon a transition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodonPart {
    /// Bases before the intron. Only permitted when they equal the held bases.
    Prefix,
    /// Bases after the intron, scored together with the held bases.
    Suffix,
}

/// Label data for one half of a split codon.
#[derive(Debug, Clone)]
pub struct SplitCodon {
    part: CodonPart,
    held: Vec<u8>,
    matcher: Arc<Match>,
}

impl SplitCodon {
    pub fn new(part: CodonPart, held: &[u8], matcher: Arc<Match>) -> Self {
        Self {
            part,
            held: held.to_ascii_uppercase(),
            matcher,
        }
    }

    pub fn part(&self) -> CodonPart {
        self.part
    }

    /// The codon prefix this branch stands for.
    pub fn held(&self) -> &[u8] {
        &self.held
    }

    pub fn matcher(&self) -> &Arc<Match> {
        &self.matcher
    }

    /// Symbols this half consumes.
    pub fn advance(&self) -> Advance {
        match self.part {
            CodonPart::Prefix => Advance::new(0, self.held.len()),
            CodonPart::Suffix => Advance::new(1, 3 - self.held.len()),
        }
    }

    /// Score the consumed symbols, or `None` if this branch does not apply.
    pub fn score(&self, query: &[u8], target: &[u8]) -> Option<i32> {
        match self.part {
            CodonPart::Prefix => target.eq_ignore_ascii_case(&self.held).then_some(0),
            CodonPart::Suffix => {
                let mut codon = [0u8; 3];
                let split = self.held.len();
                codon[..split].copy_from_slice(&self.held);
                codon[split..].copy_from_slice(target);
                Some(self.matcher.score_codon(*query.first()?, &codon))
            }
        }
    }
}

/// An open phase model plus the silent slots awaiting intron insertion.
#[derive(Debug)]
pub struct PhaseModel {
    pub model: Model,
    pub intron_slots: Vec<TransitionId>,
}

/// Build the phase model around a protein-vs-DNA match.
///
/// # Errors
///
/// [`C4Error::ModelStructure`] if `matcher` is not a protein-to-codon match.
pub fn phase_model(matcher: Arc<Match>) -> Result<PhaseModel> {
    if matcher.kind() != MatchType::ProteinToDna {
        return Err(C4Error::ModelStructure(format!(
            "phase model needs a protein-to-DNA match, got {:?}",
            matcher.kind()
        )));
    }
    let codon = matcher.advance();
    let mut model = Model::new("phase");
    let start = model.add_state("START", StateRole::Start)?;
    let end = model.add_state("END", StateRole::End)?;
    model.set_start(start)?;
    model.add_end(end)?;
    let mut intron_slots = Vec::new();

    model.add_transition(
        start,
        end,
        Label::Passthrough,
        codon,
        Some(LabelData::Match(Arc::clone(&matcher))),
    )?;

    let p0 = model.add_state("P0", StateRole::Phase)?;
    intron_slots.push(model.add_silent(start, p0)?);
    model.add_transition(
        p0,
        end,
        Label::Passthrough,
        codon,
        Some(LabelData::Match(Arc::clone(&matcher))),
    )?;

    let mut prefixes: Vec<Vec<u8>> = BASES.iter().map(|&b| vec![b]).collect();
    prefixes.extend(
        BASES
            .iter()
            .flat_map(|&a| BASES.iter().map(move |&b| vec![a, b])),
    );
    for held in &prefixes {
        let tag = String::from_utf8_lossy(held);
        let phase = held.len();
        let before = model.add_state(format!("P{phase}_{tag}"), StateRole::Phase)?;
        let after = model.add_state(format!("P{phase}_{tag}'"), StateRole::Phase)?;

        let prefix = SplitCodon::new(CodonPart::Prefix, held, Arc::clone(&matcher));
        let suffix = SplitCodon::new(CodonPart::Suffix, held, Arc::clone(&matcher));
        model.add_transition(
            start,
            before,
            Label::SplitCodon,
            prefix.advance(),
            Some(LabelData::SplitCodon(prefix)),
        )?;
        intron_slots.push(model.add_silent(before, after)?);
        model.add_transition(
            after,
            end,
            Label::SplitCodon,
            suffix.advance(),
            Some(LabelData::SplitCodon(suffix)),
        )?;
    }

    Ok(PhaseModel {
        model,
        intron_slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SubstitutionMatrix;
    use c4_seq::GeneticCodeId;

    fn matcher() -> Arc<Match> {
        Arc::new(Match::new(
            MatchType::ProteinToDna,
            SubstitutionMatrix::blosum62().into(),
            GeneticCodeId::Standard,
        ))
    }

    #[test]
    fn shape() {
        let phase = phase_model(matcher()).unwrap();
        // START, END, P0, and a before/after pair per held prefix
        assert_eq!(phase.model.graph().state_count(), 3 + 2 * 20);
        assert_eq!(phase.intron_slots.len(), 21);
        assert!(phase.model.select_transitions(Label::Match).is_empty());
        assert_eq!(phase.model.select_transitions(Label::SplitCodon).len(), 40);
        phase.model.validate().unwrap();
    }

    #[test]
    fn split_codon_halves() {
        let m = matcher();
        let prefix = SplitCodon::new(CodonPart::Prefix, b"at", Arc::clone(&m));
        assert_eq!(prefix.advance(), Advance::new(0, 2));
        assert_eq!(prefix.score(b"", b"AT"), Some(0));
        assert_eq!(prefix.score(b"", b"AC"), None);

        let suffix = SplitCodon::new(CodonPart::Suffix, b"AT", m);
        assert_eq!(suffix.advance(), Advance::new(1, 1));
        // ATG reassembled
        assert_eq!(suffix.score(b"M", b"G"), Some(5));
    }

    #[test]
    fn every_accepting_path_reads_one_codon() {
        let phase = phase_model(matcher()).unwrap();
        let g = phase.model.graph();
        let start = phase.model.start().unwrap();
        for &first in g.state(start).unwrap().outgoing() {
            let mut total = Advance::ZERO;
            let mut t = g.transition(first).unwrap();
            loop {
                total = total + t.advance();
                if phase.model.is_end(t.destination()) {
                    break;
                }
                let next = g.state(t.destination()).unwrap().outgoing()[0];
                t = g.transition(next).unwrap();
            }
            assert_eq!(total, Advance::new(1, 3));
        }
    }

    #[test]
    fn rejects_nucleotide_match() {
        let m = Arc::new(Match::new(
            MatchType::DnaToDna,
            crate::scoring::ScoringMatrix::dna_default().into(),
            GeneticCodeId::Standard,
        ));
        assert!(phase_model(m).is_err());
    }
}
