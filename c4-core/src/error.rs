//! Structured error types for the c4 workspace.

use thiserror::Error;

use crate::alphabet::AlphabetType;

/// Unified error type for model construction, compilation and alignment.
#[derive(Debug, Error)]
pub enum C4Error {
    /// A sequence's alphabet does not match what the requested model needs.
    #[error("alphabet mismatch for {context}: expected {expected}, found {found}")]
    AlphabetMismatch {
        /// What was being checked (e.g. "protein2genome query").
        context: String,
        expected: AlphabetType,
        found: AlphabetType,
    },

    /// The model graph failed a well-formedness check.
    #[error("model structure error: {0}")]
    ModelStructure(String),

    /// No factory exists for the requested model kind.
    #[error("unsupported model kind: {0}")]
    UnsupportedModelKind(String),

    /// A transition carries no (or the wrong kind of) scoring data.
    #[error("unresolved label data on transition {transition} ({label})")]
    UnresolvedLabelData {
        transition: String,
        label: String,
    },

    /// A lifecycle operation was applied in the wrong state (e.g. opening an open model).
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A transition consumes nothing between distinct states, or silent edges form a cycle.
    #[error("zero-advance regress: {0}")]
    ZeroAdvance(String),

    /// Alignment was cancelled through the cooperative cancellation flag.
    #[error("alignment cancelled")]
    Cancelled,

    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias used throughout the c4 crates.
pub type Result<T> = std::result::Result<T, C4Error>;
