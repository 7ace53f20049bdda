//! Base model factories.
//!
//! Every base model is built from the same MATCH core:
//!
//! ```text
//! START --> MATCH --> END          ungapped: MATCH loops on itself
//!           ^  | \
//!   INSERT -+  |  +- DELETE        affine: gap states opened from MATCH
//!              +-- frameshift      protein2dna: (0,1) and (0,2) loops
//! ```
//!
//! Structural edges are silent passthroughs; every model has exactly one
//! transition labelled MATCH.

use std::sync::Arc;

use c4_core::{AlphabetType, C4Error, Result};

use crate::graph::{StateId, StateRole};
use crate::label::{Advance, Label, LabelData};
use crate::matching::{Match, MatchType};
use crate::model::Model;
use crate::model_type::{ModelKind, ModelType};
use crate::params::ModelParams;

/// Build the open base model for `model_type`.
///
/// The alphabet pair is checked before anything else.
///
/// # Errors
///
/// * [`C4Error::AlphabetMismatch`] if the pair does not suit the kind.
/// * [`C4Error::UnsupportedModelKind`] if the kind is derived rather than
///   base (use [`ModelBuilder::build`](crate::builder::ModelBuilder::build)).
pub fn create_base_model(
    model_type: ModelType,
    query: AlphabetType,
    target: AlphabetType,
    params: &ModelParams,
) -> Result<Model> {
    model_type.kind.check_alphabets(query, target)?;
    let mut model = match model_type.kind {
        ModelKind::Ungapped => ungapped(model_type, query, target, params)?.0,
        ModelKind::Affine => affine(model_type, query, target, params)?.0,
        ModelKind::Protein2Dna => protein2dna(model_type, params)?,
        ModelKind::Protein2Genome | ModelKind::Est2Genome => {
            return Err(C4Error::UnsupportedModelKind(format!(
                "{} is not a base model kind",
                model_type.kind.name()
            )));
        }
    };
    let (start_scope, end_scope) = model_type.affine.scopes();
    model.set_scopes(start_scope, end_scope)?;
    model.set_alphabets(query, target)?;
    Ok(model)
}

/// Handles of the core states, for factories that extend the core.
struct Core {
    matching: StateId,
    matcher: Arc<Match>,
}

fn ungapped(
    model_type: ModelType,
    query: AlphabetType,
    target: AlphabetType,
    params: &ModelParams,
) -> Result<(Model, Core)> {
    let kind = MatchType::from_alphabets(query, target)?;
    let matcher = Arc::new(Match::new(
        kind,
        params.scoring.clone(),
        params.genetic_code,
    ));
    let mut model = Model::new(model_type.name());
    let start = model.add_state("START", StateRole::Start)?;
    let matching = model.add_state("MATCH", StateRole::Match)?;
    let end = model.add_state("END", StateRole::End)?;
    model.set_start(start)?;
    model.add_end(end)?;

    model.add_silent(start, matching)?;
    model.add_transition(
        matching,
        matching,
        Label::Match,
        matcher.advance(),
        Some(LabelData::Match(Arc::clone(&matcher))),
    )?;
    model.add_silent(matching, end)?;
    Ok((model, Core { matching, matcher }))
}

fn affine(
    model_type: ModelType,
    query: AlphabetType,
    target: AlphabetType,
    params: &ModelParams,
) -> Result<(Model, Core)> {
    let (mut model, core) = ungapped(model_type, query, target, params)?;
    let step = core.matcher.advance();
    let gaps = params.scoring.gaps();

    for (name, role, advance) in [
        ("INSERT", StateRole::Insert, Advance::new(step.query, 0)),
        ("DELETE", StateRole::Delete, Advance::new(0, step.target)),
    ] {
        let gap = model.add_state(name, role)?;
        model.add_transition(
            core.matching,
            gap,
            Label::GapOpen,
            advance,
            Some(LabelData::Penalty(gaps.open)),
        )?;
        model.add_transition(
            gap,
            gap,
            Label::GapExtend,
            advance,
            Some(LabelData::Penalty(gaps.extend)),
        )?;
        model.add_silent(gap, core.matching)?;
    }
    Ok((model, core))
}

fn protein2dna(model_type: ModelType, params: &ModelParams) -> Result<Model> {
    let (mut model, core) = affine(
        model_type,
        AlphabetType::Protein,
        AlphabetType::Dna,
        params,
    )?;
    for shift in 1..=2 {
        model.add_transition(
            core.matching,
            core.matching,
            Label::Frameshift,
            Advance::new(0, shift),
            Some(LabelData::Penalty(params.frameshift)),
        )?;
    }
    Ok(model)
}
