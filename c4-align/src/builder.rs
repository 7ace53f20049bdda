//! Model builder: base factories plus sub-model insertion.
//!
//! `ModelBuilder::build` returns a closed model for any [`ModelKind`].
//! Derived kinds are assembled step by step, and each step is reported
//! through the builder's [`Tracer`].

use std::sync::Arc;

use c4_core::{AlphabetType, C4Error, Result};

use crate::factory;
use crate::intron::intron_model;
use crate::label::{Label, LabelData};
use crate::model::Model;
use crate::model_type::{ModelKind, ModelType};
use crate::params::ModelParams;
use crate::phase::phase_model;
use crate::tracer::Tracer;

/// Builds comparison models for one (query, target) alphabet pair.
#[derive(Debug, Clone)]
pub struct ModelBuilder<'a> {
    query: AlphabetType,
    target: AlphabetType,
    params: ModelParams,
    tracer: Tracer<'a>,
}

impl ModelBuilder<'static> {
    /// A builder with parameters chosen from the alphabets and logging
    /// through the global logger.
    pub fn new(query: AlphabetType, target: AlphabetType) -> Self {
        Self {
            query,
            target,
            params: ModelParams::for_alphabets(query, target),
            tracer: Tracer::global(),
        }
    }
}

impl<'a> ModelBuilder<'a> {
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_tracer<'b>(self, tracer: Tracer<'b>) -> ModelBuilder<'b> {
        ModelBuilder {
            query: self.query,
            target: self.target,
            params: self.params,
            tracer,
        }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// The open base model for a base kind. See [`factory::create_base_model`].
    pub fn create_base_model(&self, model_type: ModelType) -> Result<Model> {
        factory::create_base_model(model_type, self.query, self.target, &self.params)
    }

    /// Build and close the model for any kind.
    ///
    /// # Errors
    ///
    /// [`C4Error::AlphabetMismatch`] if the builder's alphabets do not suit
    /// the kind; structural errors from insertion or closing otherwise.
    pub fn build(&self, model_type: ModelType) -> Result<Model> {
        model_type.kind.check_alphabets(self.query, self.target)?;
        self.tracer
            .info(format_args!("Building {model_type} model"));
        let mut model = match model_type.kind {
            ModelKind::Ungapped | ModelKind::Affine | ModelKind::Protein2Dna => {
                self.create_base_model(model_type)?
            }
            ModelKind::Protein2Genome => self.protein2genome(model_type)?,
            ModelKind::Est2Genome => self.est2genome(model_type)?,
        };
        model.close()?;
        self.tracer.info(format_args!(
            "Closed model {} ({} states, {} transitions)",
            model.name(),
            model.graph().state_count(),
            model.graph().transition_count()
        ));
        Ok(model)
    }

    fn protein2genome(&self, model_type: ModelType) -> Result<Model> {
        let mut model =
            self.create_base_model(ModelType::new(ModelKind::Protein2Dna, model_type.affine))?;
        model.rename(model_type.name())?;
        self.tracer
            .debug(format_args!("Renamed base model to {}", model.name()));

        let at = model.select_single_transition(Label::Match)?;
        let matcher = match model.transition(at).and_then(|t| t.data()) {
            Some(LabelData::Match(m)) => Arc::clone(m),
            _ => {
                return Err(C4Error::ModelStructure(format!(
                    "MATCH transition {at} of '{}' carries no match data",
                    model.name()
                )))
            }
        };
        self.tracer
            .debug(format_args!("Selected MATCH transition {at}"));

        let mut phase = phase_model(matcher)?;
        self.tracer.debug(format_args!(
            "Created phase model ({} intron slots)",
            phase.intron_slots.len()
        ));
        let intron = intron_model(self.params.splice)?;
        for &slot in &phase.intron_slots {
            phase.model.insert(&intron, slot)?;
        }
        intron.destroy();

        let insertion = model.insert(&phase.model, at)?;
        self.tracer.debug(format_args!(
            "Inserted phase model at {at} (entry {})",
            insertion.entry
        ));
        phase.model.destroy();
        Ok(model)
    }

    fn est2genome(&self, model_type: ModelType) -> Result<Model> {
        let mut model =
            self.create_base_model(ModelType::new(ModelKind::Affine, model_type.affine))?;
        model.rename(model_type.name())?;
        let matching = model.find_state("MATCH").ok_or_else(|| {
            C4Error::ModelStructure(format!("model '{}' has no MATCH state", model.name()))
        })?;
        let slot = model.add_silent(matching, matching)?;

        let intron = intron_model(self.params.splice)?;
        model.insert(&intron, slot)?;
        self.tracer
            .debug(format_args!("Inserted intron model at {slot}"));
        intron.destroy();
        Ok(model)
    }
}
