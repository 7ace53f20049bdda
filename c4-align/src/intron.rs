//! The intron sub-model.
//!
//! ```text
//! START --5'ss (0,2)--> INTRON --3'ss (0,2)--> END
//!                       ^    |
//!                       +----+ intron (0,1)
//! ```
//!
//! Inserted wherever a spliced model allows the target to skip an intron.

use c4_core::Result;

use crate::graph::StateRole;
use crate::label::{Advance, Label, LabelData};
use crate::model::Model;
use crate::splice::{SpliceScores, SpliceSite};

/// Build the (open) intron model. Its shortest intron is four bases.
pub fn intron_model(scores: SpliceScores) -> Result<Model> {
    let mut model = Model::new("intron");
    let start = model.add_state("START", StateRole::Start)?;
    let intron = model.add_state("INTRON", StateRole::Intron)?;
    let end = model.add_state("END", StateRole::End)?;
    model.set_start(start)?;
    model.add_end(end)?;

    model.add_transition(
        start,
        intron,
        Label::SpliceDonor,
        Advance::new(0, 2),
        Some(LabelData::Splice(SpliceSite::donor(scores))),
    )?;
    model.add_transition(
        intron,
        intron,
        Label::Intron,
        Advance::new(0, 1),
        Some(LabelData::Penalty(scores.intron_extend)),
    )?;
    model.add_transition(
        intron,
        end,
        Label::SpliceAcceptor,
        Advance::new(0, 2),
        Some(LabelData::Splice(SpliceSite::acceptor(scores))),
    )?;
    Ok(model)
}
