//! Shared primitives for the c4 comparison-model aligner.
//!
//! `c4-core` provides the foundation the other c4 crates build on:
//!
//! - **Error types**: [`C4Error`] and [`Result`] for structured error handling
//! - **Alphabet tag**: [`AlphabetType`], carried by every input sequence
//! - **Traits**: [`Sequence`], [`Scored`], [`Annotated`]

pub mod alphabet;
pub mod error;
pub mod traits;

pub use alphabet::AlphabetType;
pub use error::{C4Error, Result};
pub use traits::*;
