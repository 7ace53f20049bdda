//! Model selection: which comparison model to build and how its ends are
//! anchored.

use core::fmt;
use core::str::FromStr;

use c4_core::{AlphabetType, C4Error, Result};

/// Where an alignment may start or end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// Only at the corner: (0, 0) for a start, (|q|, |t|) for an end.
    Corner,
    /// Anywhere along the query edge: query fully consumed, target free.
    Query,
    /// Anywhere on either sequence boundary.
    Edge,
    /// Any cell.
    Anywhere,
}

impl Scope {
    /// Whether an alignment may begin at (`i`, `j`).
    pub fn allows_start(self, i: usize, j: usize) -> bool {
        match self {
            Scope::Corner => i == 0 && j == 0,
            Scope::Query => i == 0,
            Scope::Edge => i == 0 || j == 0,
            Scope::Anywhere => true,
        }
    }

    /// Whether an alignment may finish at (`i`, `j`) on sequences of
    /// lengths `m` and `n`.
    pub fn allows_end(self, i: usize, j: usize, m: usize, n: usize) -> bool {
        match self {
            Scope::Corner => i == m && j == n,
            Scope::Query => i == m,
            Scope::Edge => i == m || j == n,
            Scope::Anywhere => true,
        }
    }
}

/// How the alignment is anchored to the two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AffineModelType {
    /// Both sequences end to end.
    Global,
    /// Whole query against part of the target.
    Bestfit,
    /// Best-scoring region of each.
    #[default]
    Local,
    /// Suffix of one against prefix of the other.
    Overlap,
}

impl AffineModelType {
    pub const ALL: [AffineModelType; 4] = [
        AffineModelType::Global,
        AffineModelType::Bestfit,
        AffineModelType::Local,
        AffineModelType::Overlap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AffineModelType::Global => "global",
            AffineModelType::Bestfit => "bestfit",
            AffineModelType::Local => "local",
            AffineModelType::Overlap => "overlap",
        }
    }

    /// (start scope, end scope).
    pub fn scopes(self) -> (Scope, Scope) {
        match self {
            AffineModelType::Global => (Scope::Corner, Scope::Corner),
            AffineModelType::Bestfit => (Scope::Query, Scope::Query),
            AffineModelType::Local => (Scope::Anywhere, Scope::Anywhere),
            AffineModelType::Overlap => (Scope::Edge, Scope::Edge),
        }
    }
}

impl FromStr for AffineModelType {
    type Err = C4Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "g" => Ok(AffineModelType::Global),
            "bestfit" | "b" => Ok(AffineModelType::Bestfit),
            "local" | "l" => Ok(AffineModelType::Local),
            "overlap" | "o" => Ok(AffineModelType::Overlap),
            _ => Err(C4Error::UnsupportedModelKind(format!(
                "unknown affine model type '{s}'"
            ))),
        }
    }
}

/// The family of comparison model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    Ungapped,
    Affine,
    /// Protein query against DNA target, codon by codon, with frameshifts.
    Protein2Dna,
    /// [`ModelKind::Protein2Dna`] with introns allowed in every codon phase.
    Protein2Genome,
    /// DNA against DNA with introns.
    Est2Genome,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Ungapped,
        ModelKind::Affine,
        ModelKind::Protein2Dna,
        ModelKind::Protein2Genome,
        ModelKind::Est2Genome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Ungapped => "ungapped",
            ModelKind::Affine => "affine",
            ModelKind::Protein2Dna => "protein2dna",
            ModelKind::Protein2Genome => "protein2genome",
            ModelKind::Est2Genome => "est2genome",
        }
    }

    /// Base kinds are built directly; derived kinds need sub-model insertion.
    pub fn is_base(self) -> bool {
        matches!(
            self,
            ModelKind::Ungapped | ModelKind::Affine | ModelKind::Protein2Dna
        )
    }

    /// Check that a (query, target) alphabet pair suits this kind.
    ///
    /// # Errors
    ///
    /// Returns [`C4Error::AlphabetMismatch`] naming the offending side.
    pub fn check_alphabets(self, query: AlphabetType, target: AlphabetType) -> Result<()> {
        let required = match self {
            ModelKind::Ungapped | ModelKind::Affine => {
                return crate::matching::MatchType::from_alphabets(query, target)
                    .map(|_| ())
                    .map_err(|e| match e {
                        C4Error::AlphabetMismatch { context, expected, found } => {
                            C4Error::AlphabetMismatch {
                                context: format!("{} {context}", self.name()),
                                expected,
                                found,
                            }
                        }
                        other => other,
                    });
            }
            ModelKind::Protein2Dna | ModelKind::Protein2Genome => {
                (AlphabetType::Protein, AlphabetType::Dna)
            }
            ModelKind::Est2Genome => (AlphabetType::Dna, AlphabetType::Dna),
        };
        if query != required.0 {
            return Err(C4Error::AlphabetMismatch {
                context: format!("{} query", self.name()),
                expected: required.0,
                found: query,
            });
        }
        if target != required.1 {
            return Err(C4Error::AlphabetMismatch {
                context: format!("{} target", self.name()),
                expected: required.1,
                found: target,
            });
        }
        Ok(())
    }
}

impl FromStr for ModelKind {
    type Err = C4Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ungapped" => Ok(ModelKind::Ungapped),
            "affine" => Ok(ModelKind::Affine),
            "protein2dna" | "p2d" => Ok(ModelKind::Protein2Dna),
            "protein2genome" | "p2g" => Ok(ModelKind::Protein2Genome),
            "est2genome" | "e2g" => Ok(ModelKind::Est2Genome),
            _ => Err(C4Error::UnsupportedModelKind(format!(
                "unknown model kind '{s}'"
            ))),
        }
    }
}

/// A fully specified model selection, named `"<kind>:<affine>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelType {
    pub kind: ModelKind,
    pub affine: AffineModelType,
}

impl ModelType {
    pub fn new(kind: ModelKind, affine: AffineModelType) -> Self {
        Self { kind, affine }
    }

    pub fn name(&self) -> String {
        format!("{}:{}", self.kind.name(), self.affine.name())
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.name(), self.affine.name())
    }
}

impl FromStr for ModelType {
    type Err = C4Error;

    /// Accepts `kind` or `kind:affine`; a bare kind is local.
    fn from_str(s: &str) -> Result<Self> {
        let (kind, affine) = match s.split_once(':') {
            Some((kind, affine)) => (kind.parse()?, affine.parse()?),
            None => (s.parse()?, AffineModelType::default()),
        };
        Ok(Self { kind, affine })
    }
}
