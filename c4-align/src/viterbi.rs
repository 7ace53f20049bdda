//! Viterbi engine over a compiled recurrence.
//!
//! The table holds one score and one back-pointer per (query position,
//! target position, state), filled in row-major order. A cell may be seeded
//! (score 0) where the start scope allows; otherwise, and in addition, each
//! incoming edge offers `pred + delta`, and only a strictly greater
//! candidate replaces the incumbent. Ties therefore go to the seed, then to
//! the earliest transition.

use std::sync::atomic::{AtomicBool, Ordering};

use c4_core::{C4Error, Result, Sequence};

use crate::compile::{Cell, CompiledRecurrence};
use crate::path::{AlignmentPath, AlignmentStep};
use crate::tracer::Tracer;

const NEG_INF: i32 = i32::MIN / 2;

/// Default cap on (query + 1) x (target + 1) x states table cells.
///
/// A cell costs 8 bytes (score and back-pointer), so the default table is
/// at most 2 GiB.
pub const DEFAULT_MAX_CELLS: usize = 1 << 28;

// ---------------------------------------------------------------------------
// Back-pointers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackPtr {
    /// Unreachable cell.
    None,
    /// Alignment starts here.
    Seed,
    /// Index into the state's incoming list.
    Edge(u32),
}

const PACKED_NONE: u32 = u32::MAX;
const PACKED_SEED: u32 = u32::MAX - 1;

impl BackPtr {
    /// Four-byte table encoding. Edge indices stay below `PACKED_SEED`
    /// because incoming lists are bounded by the transition count.
    #[inline]
    fn pack(self) -> u32 {
        match self {
            BackPtr::None => PACKED_NONE,
            BackPtr::Seed => PACKED_SEED,
            BackPtr::Edge(k) => k,
        }
    }

    #[inline]
    fn unpack(raw: u32) -> Self {
        match raw {
            PACKED_NONE => BackPtr::None,
            PACKED_SEED => BackPtr::Seed,
            k => BackPtr::Edge(k),
        }
    }
}

struct Table {
    cols: usize,
    states: usize,
    scores: Vec<i32>,
    back: Vec<u32>,
}

impl Table {
    /// Allocate a table, refusing sizes above `max_cells` or ones the
    /// allocator cannot satisfy.
    fn new(rows: usize, cols: usize, states: usize, max_cells: usize) -> Result<Self> {
        let too_large = || {
            C4Error::InvalidInput(format!(
                "DP table of {rows} x {cols} x {states} cells exceeds the limit of {max_cells}"
            ))
        };
        let cells = rows
            .checked_mul(cols)
            .and_then(|c| c.checked_mul(states))
            .filter(|&c| c <= max_cells)
            .ok_or_else(too_large)?;
        let mut scores = Vec::new();
        let mut back = Vec::new();
        scores.try_reserve_exact(cells).map_err(|e| {
            C4Error::InvalidInput(format!("DP table of {cells} cells: {e}"))
        })?;
        back.try_reserve_exact(cells).map_err(|e| {
            C4Error::InvalidInput(format!("DP table of {cells} cells: {e}"))
        })?;
        scores.resize(cells, NEG_INF);
        back.resize(cells, PACKED_NONE);
        Ok(Self {
            cols,
            states,
            scores,
            back,
        })
    }

    #[inline]
    fn idx(&self, i: usize, j: usize, s: usize) -> usize {
        (i * self.cols + j) * self.states + s
    }

    #[inline]
    fn back(&self, at: usize) -> BackPtr {
        BackPtr::unpack(self.back[at])
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs a [`CompiledRecurrence`] over (query, target) pairs.
///
/// ```
/// use c4_align::{compile, AffineModelType, ModelBuilder, ModelKind, ModelType, Viterbi};
/// use c4_core::AlphabetType;
///
/// let model = ModelBuilder::new(AlphabetType::Dna, AlphabetType::Dna)
///     .build(ModelType::new(ModelKind::Affine, AffineModelType::Global))
///     .unwrap();
/// let compiled = compile(&model).unwrap();
/// let path = Viterbi::new(&compiled).align(b"ACGT", b"ACGT").unwrap().unwrap();
/// assert_eq!(path.score, 20);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Viterbi<'a> {
    compiled: &'a CompiledRecurrence,
    min_score: Option<i32>,
    cancel: Option<&'a AtomicBool>,
    max_cells: usize,
    tracer: Tracer<'a>,
}

impl<'a> Viterbi<'a> {
    pub fn new(compiled: &'a CompiledRecurrence) -> Self {
        Self {
            compiled,
            min_score: None,
            cancel: None,
            max_cells: DEFAULT_MAX_CELLS,
            tracer: Tracer::global(),
        }
    }

    /// Report no alignment when the best score is below `min_score`.
    /// `None` (the default) accepts any complete path.
    pub fn with_threshold(mut self, min_score: Option<i32>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Check `flag` at every row boundary and stop with
    /// [`C4Error::Cancelled`] once it is set.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Refuse pairs whose table would exceed `max_cells` cells
    /// (default [`DEFAULT_MAX_CELLS`]).
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn compiled(&self) -> &'a CompiledRecurrence {
        self.compiled
    }

    /// Align two sequences, checking their alphabets against the ones the
    /// model was built for.
    ///
    /// # Errors
    ///
    /// [`C4Error::AlphabetMismatch`] if either alphabet differs from the
    /// model's; otherwise as [`Viterbi::align`].
    pub fn align_sequences<Q, T>(&self, query: &Q, target: &T) -> Result<Option<AlignmentPath>>
    where
        Q: Sequence + ?Sized,
        T: Sequence + ?Sized,
    {
        if let Some((q, t)) = self.compiled.alphabets() {
            if query.alphabet() != q {
                return Err(C4Error::AlphabetMismatch {
                    context: format!("{} query", self.compiled.model_name()),
                    expected: q,
                    found: query.alphabet(),
                });
            }
            if target.alphabet() != t {
                return Err(C4Error::AlphabetMismatch {
                    context: format!("{} target", self.compiled.model_name()),
                    expected: t,
                    found: target.alphabet(),
                });
            }
        }
        self.align(query.as_bytes(), target.as_bytes())
    }

    /// Find the best-scoring path.
    ///
    /// Returns `Ok(None)` when no path reaches an accepting state within the
    /// end scope, or when the best score is below the threshold. Every path
    /// returned takes at least one transition.
    ///
    /// # Errors
    ///
    /// [`C4Error::Cancelled`] if the cancellation flag was raised, or
    /// [`C4Error::InvalidInput`] if the table would exceed the cell limit or
    /// cannot be allocated. Both are checked before the fill starts.
    pub fn align(&self, query: &[u8], target: &[u8]) -> Result<Option<AlignmentPath>> {
        let states = self.compiled.states();
        let (m, n) = (query.len(), target.len());
        let mut table = Table::new(m + 1, n + 1, states.len(), self.max_cells)?;
        let start_scope = self.compiled.start_scope();

        for i in 0..=m {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                self.tracer.warn(format_args!(
                    "{}: alignment cancelled at row {i} of {m}",
                    self.compiled.model_name()
                ));
                return Err(C4Error::Cancelled);
            }
            for j in 0..=n {
                let seed = start_scope.allows_start(i, j);
                for (s, state) in states.iter().enumerate() {
                    let (mut best, mut bp) = if seed && state.seeded {
                        (0, BackPtr::Seed)
                    } else {
                        (NEG_INF, BackPtr::None)
                    };
                    for (k, edge) in state.incoming.iter().enumerate() {
                        let (a, b) = (edge.advance.query, edge.advance.target);
                        if a > i || b > j {
                            continue;
                        }
                        let prev = table.scores[table.idx(i - a, j - b, edge.from)];
                        if prev == NEG_INF {
                            continue;
                        }
                        let cell = Cell {
                            query,
                            target,
                            query_pos: i - a,
                            target_pos: j - b,
                        };
                        let Some(delta) = edge.score(&cell) else {
                            continue;
                        };
                        let candidate = prev.saturating_add(delta).max(NEG_INF + 1);
                        if candidate > best {
                            best = candidate;
                            bp = BackPtr::Edge(k as u32);
                        }
                    }
                    let at = table.idx(i, j, s);
                    table.scores[at] = best;
                    table.back[at] = bp.pack();
                }
            }
        }

        let Some((score, i, j, s)) = self.terminal(&table, m, n) else {
            self.tracer.debug(format_args!(
                "{}: no path reaches an END state",
                self.compiled.model_name()
            ));
            return Ok(None);
        };
        if self.min_score.is_some_and(|min| score < min) {
            self.tracer.debug(format_args!(
                "{}: best score {score} is below the threshold",
                self.compiled.model_name()
            ));
            return Ok(None);
        }
        let path = self.backtrace(&table, query, target, score, (i, j, s))?;
        self.tracer.debug(format_args!(
            "{}: score {score}, query {}..{}, target {}..{}, {} steps",
            self.compiled.model_name(),
            path.query_start,
            path.query_end,
            path.target_start,
            path.target_end,
            path.steps.len()
        ));
        Ok(Some(path))
    }

    /// Best accepting cell inside the end scope that was not merely seeded.
    fn terminal(&self, table: &Table, m: usize, n: usize) -> Option<(i32, usize, usize, usize)> {
        let end_scope = self.compiled.end_scope();
        let accepting: Vec<usize> = self
            .compiled
            .states()
            .iter()
            .enumerate()
            .filter(|(_, st)| st.accepting)
            .map(|(s, _)| s)
            .collect();
        let mut best: Option<(i32, usize, usize, usize)> = None;
        for i in 0..=m {
            for j in 0..=n {
                if !end_scope.allows_end(i, j, m, n) {
                    continue;
                }
                for &s in &accepting {
                    let at = table.idx(i, j, s);
                    if !matches!(table.back(at), BackPtr::Edge(_)) {
                        continue;
                    }
                    let score = table.scores[at];
                    if best.map_or(true, |(b, ..)| score > b) {
                        best = Some((score, i, j, s));
                    }
                }
            }
        }
        best
    }

    fn backtrace(
        &self,
        table: &Table,
        query: &[u8],
        target: &[u8],
        score: i32,
        end: (usize, usize, usize),
    ) -> Result<AlignmentPath> {
        let states = self.compiled.states();
        let (mut i, mut j, mut s) = end;
        let mut steps = Vec::new();
        loop {
            match table.back(table.idx(i, j, s)) {
                BackPtr::Seed => break,
                BackPtr::None => {
                    return Err(C4Error::ModelStructure(format!(
                        "{}: broken back-pointer at ({i}, {j}) in state '{}'",
                        self.compiled.model_name(),
                        states[s].name
                    )))
                }
                BackPtr::Edge(k) => {
                    let edge = &states[s].incoming[k as usize];
                    let (pi, pj) = (i - edge.advance.query, j - edge.advance.target);
                    let cell = Cell {
                        query,
                        target,
                        query_pos: pi,
                        target_pos: pj,
                    };
                    steps.push(AlignmentStep {
                        transition: edge.transition,
                        label: edge.label,
                        from: states[edge.from].id,
                        to: states[s].id,
                        role: states[s].role,
                        query_pos: pi,
                        target_pos: pj,
                        advance: edge.advance,
                        score: edge.score(&cell).unwrap_or(0),
                    });
                    (i, j, s) = (pi, pj, edge.from);
                }
            }
        }
        steps.reverse();
        Ok(AlignmentPath {
            model_name: self.compiled.model_name().to_owned(),
            score,
            query_start: i,
            query_end: end.0,
            target_start: j,
            target_end: end.1,
            steps,
        })
    }
}

/// Align one pair with default engine settings.
pub fn align(
    compiled: &CompiledRecurrence,
    query: &[u8],
    target: &[u8],
) -> Result<Option<AlignmentPath>> {
    Viterbi::new(compiled).align(query, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelBuilder;
    use crate::compile::compile;
    use crate::label::Label;
    use crate::model_type::{AffineModelType, ModelKind, ModelType};
    use crate::params::ModelParams;
    use crate::scoring::ScoringMatrix;
    use c4_core::AlphabetType;
    use c4_seq::SeqRecord;

    fn dna(kind: ModelKind, affine: AffineModelType) -> CompiledRecurrence {
        let model = ModelBuilder::new(AlphabetType::Dna, AlphabetType::Dna)
            .with_tracer(Tracer::silent())
            .build(ModelType::new(kind, affine))
            .unwrap();
        compile(&model).unwrap()
    }

    fn run(c: &CompiledRecurrence, q: &[u8], t: &[u8]) -> Option<AlignmentPath> {
        Viterbi::new(c)
            .with_tracer(Tracer::silent())
            .align(q, t)
            .unwrap()
    }

    #[test]
    fn global_identical() {
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let p = run(&c, b"ACGTACGT", b"ACGTACGT").unwrap();
        assert_eq!(p.score, 40);
        assert_eq!(p.count(Label::Match), 8);
        assert_eq!((p.query_start, p.query_end), (0, 8));
        assert_eq!((p.target_start, p.target_end), (0, 8));
    }

    #[test]
    fn global_gap_matches_affine_cost() {
        // one deletion of length 2: open -12 charged on the first base, extend -4 on the second
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let p = run(&c, b"ACGTACGT", b"ACGTTTACGT").unwrap();
        assert_eq!(p.score, 8 * 5 - 12 - 4);
        assert_eq!(p.count(Label::GapOpen), 1);
        assert_eq!(p.count(Label::GapExtend), 1);
    }

    #[test]
    fn local_finds_core() {
        let c = dna(ModelKind::Affine, AffineModelType::Local);
        let p = run(&c, b"TTTTACGTACGTTTTT", b"GGGGACGTACGTGGGG").unwrap();
        assert_eq!(p.score, 40);
        assert_eq!((p.query_start, p.query_end), (4, 12));
        assert_eq!((p.target_start, p.target_end), (4, 12));
        assert_eq!(p.advance().query, p.query_end - p.query_start);
    }

    #[test]
    fn local_with_nothing_positive() {
        let c = dna(ModelKind::Ungapped, AffineModelType::Local);
        assert!(run(&c, b"AAAA", b"CCCC").is_none());
    }

    #[test]
    fn global_needs_full_consumption() {
        let c = dna(ModelKind::Ungapped, AffineModelType::Global);
        // ungapped cannot absorb a length difference
        assert!(run(&c, b"ACG", b"ACGT").is_none());
        assert!(run(&c, b"", b"").is_none());
    }

    #[test]
    fn threshold_rejects_low_scores() {
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        assert!(engine.align(b"ACGT", b"ACGA").unwrap().is_some());
        let strict = engine.with_threshold(Some(100));
        assert!(strict.align(b"ACGT", b"ACGA").unwrap().is_none());
    }

    #[test]
    fn cancellation_flag() {
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let flag = AtomicBool::new(true);
        let err = Viterbi::new(&c)
            .with_tracer(Tracer::silent())
            .with_cancel_flag(&flag)
            .align(b"ACGT", b"ACGT")
            .unwrap_err();
        assert!(matches!(err, C4Error::Cancelled));
    }

    #[test]
    fn step_scores_sum_to_total() {
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let p = run(&c, b"ACGTTGCA", b"ACGGTTGA").unwrap();
        let total: i32 = p.steps.iter().map(|s| s.score).sum();
        assert_eq!(total, p.score);
    }

    #[test]
    fn bestfit_consumes_whole_query() {
        let c = dna(ModelKind::Affine, AffineModelType::Bestfit);
        let p = run(&c, b"ACGT", b"TTTTACGTTTTT").unwrap();
        assert_eq!((p.query_start, p.query_end), (0, 4));
        assert_eq!((p.target_start, p.target_end), (4, 8));
        assert_eq!(p.score, 20);
    }

    #[test]
    fn overlap_joins_query_suffix_to_target_prefix() {
        let c = dna(ModelKind::Affine, AffineModelType::Overlap);
        let p = run(&c, b"GGGGGACGTACGT", b"ACGTACGTTTTT").unwrap();
        assert_eq!(p.score, 40);
        assert_eq!((p.query_start, p.query_end), (5, 13));
        assert_eq!((p.target_start, p.target_end), (0, 8));
    }

    #[test]
    fn dna_query_against_protein_target() {
        let model = ModelBuilder::new(AlphabetType::Dna, AlphabetType::Protein)
            .with_tracer(Tracer::silent())
            .build(ModelType::new(ModelKind::Affine, AffineModelType::Global))
            .unwrap();
        let c = compile(&model).unwrap();
        let p = run(&c, b"ATGTTT", b"MF").unwrap();
        // BLOSUM62: M/M 5, F/F 6
        assert_eq!(p.score, 11);
        assert_eq!(p.count(Label::Match), 2);
        assert_eq!(p.advance().query, 6);
        assert_eq!(p.advance().target, 2);
    }

    #[test]
    fn oversized_table_is_refused_before_allocation() {
        let model = ModelBuilder::new(AlphabetType::Protein, AlphabetType::Dna)
            .with_tracer(Tracer::silent())
            .build(ModelType::new(ModelKind::Protein2Genome, AffineModelType::Local))
            .unwrap();
        let c = compile(&model).unwrap();
        let query = vec![b'M'; 1_000_000];
        let target = vec![b'A'; 1_000_000];
        let err = Viterbi::new(&c)
            .with_tracer(Tracer::silent())
            .align(&query, &target)
            .unwrap_err();
        assert!(matches!(err, C4Error::InvalidInput(_)));
    }

    #[test]
    fn cell_limit_is_configurable() {
        let c = dna(ModelKind::Affine, AffineModelType::Global);
        let cells = 5 * 5 * c.state_count();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        assert!(engine.with_max_cells(cells).align(b"ACGT", b"ACGT").unwrap().is_some());
        let err = engine
            .with_max_cells(cells - 1)
            .align(b"ACGT", b"ACGT")
            .unwrap_err();
        assert!(matches!(err, C4Error::InvalidInput(_)));
    }

    #[test]
    fn back_pointers_pack_into_four_bytes() {
        for bp in [BackPtr::None, BackPtr::Seed, BackPtr::Edge(0), BackPtr::Edge(7)] {
            assert_eq!(BackPtr::unpack(bp.pack()), bp);
        }
    }

    #[test]
    fn sequence_alphabets_checked() {
        let model = ModelBuilder::new(AlphabetType::Protein, AlphabetType::Dna)
            .with_params(
                ModelParams::for_alphabets(AlphabetType::Protein, AlphabetType::Dna)
                    .with_scoring(ScoringMatrix::new(5, -4, -11, -1).unwrap()),
            )
            .with_tracer(Tracer::silent())
            .build(ModelType::new(ModelKind::Protein2Dna, AffineModelType::Global))
            .unwrap();
        let c = compile(&model).unwrap();
        let engine = Viterbi::new(&c).with_tracer(Tracer::silent());
        let q = SeqRecord::new("q", b"MF", AlphabetType::Protein).unwrap();
        let t = SeqRecord::new("t", b"ATGTTT", AlphabetType::Dna).unwrap();
        assert_eq!(engine.align_sequences(&q, &t).unwrap().unwrap().score, 10);
        let err = engine.align_sequences(&t, &t).unwrap_err();
        assert!(matches!(err, C4Error::AlphabetMismatch { .. }));
    }
}
