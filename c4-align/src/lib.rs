//! Composable comparison models for pairwise sequence alignment.
//!
//! An alignment model is a small state machine whose transitions consume
//! query and target symbols and carry scores. Base models (ungapped, affine,
//! protein-vs-DNA codon) are built by factories; derived models such as
//! protein2genome splice sub-models (phase, intron) into a single transition
//! of a base model. A closed model compiles to a [`CompiledRecurrence`] that
//! the [`Viterbi`] engine runs over a (query, target) pair.
//!
//! # Quick start
//!
//! ```
//! use c4_align::{compile, align, ModelBuilder, ModelType};
//! use c4_core::AlphabetType;
//!
//! let model = ModelBuilder::new(AlphabetType::Protein, AlphabetType::Dna)
//!     .build("protein2dna:global".parse::<ModelType>().unwrap())
//!     .unwrap();
//! let compiled = compile(&model).unwrap();
//! let path = align(&compiled, b"MF", b"ATGTTT").unwrap().unwrap();
//! assert_eq!(path.advance().target, 6);
//! ```

pub mod batch;
pub mod builder;
pub mod compile;
pub mod factory;
pub mod graph;
pub mod insert;
pub mod intron;
pub mod label;
pub mod matching;
pub mod model;
pub mod model_type;
pub mod params;
pub mod path;
pub mod phase;
pub mod scoring;
pub mod splice;
pub mod tracer;
pub mod viterbi;

pub use batch::{align_batch, align_sequence_batch};
pub use builder::ModelBuilder;
pub use compile::{compile, Cell, CompiledRecurrence, CompiledState, Incoming, ScoreFn};
pub use factory::create_base_model;
pub use graph::{Graph, State, StateId, StateRole, Transition, TransitionId};
pub use insert::{insert, Insertion};
pub use intron::intron_model;
pub use label::{Advance, Label, LabelData};
pub use matching::{Match, MatchType};
pub use model::{Lifecycle, Model};
pub use model_type::{AffineModelType, ModelKind, ModelType, Scope};
pub use params::ModelParams;
pub use path::{AlignmentPath, AlignmentStep, Segment};
pub use phase::{phase_model, CodonPart, PhaseModel, SplitCodon};
pub use scoring::{GapCosts, ScoringMatrix, ScoringScheme, SubstitutionMatrix};
pub use splice::{SiteClass, SpliceScores, SpliceSide, SpliceSite};
pub use tracer::Tracer;
pub use viterbi::{align, Viterbi, DEFAULT_MAX_CELLS};
