//! Compiling a closed model into a DP recurrence.
//!
//! The recurrence keeps only the states a DP cell can sit in: END states and
//! states with at least one scored (non-silent) outgoing transition. Silent
//! passthroughs are contracted away. A scored transition `u -> v` feeds every
//! kept state in the silent closure of `v`, and the START seed reaches every
//! kept state in the silent closure of START.
//!
//! Each kept state lists its incoming transitions in transition-handle order,
//! each with a resolved scoring closure. Every incoming transition advances at
//! least one sequence, so a cell only depends on cells strictly before it in
//! row-major order.

use core::fmt;
use std::sync::Arc;

use c4_core::{AlphabetType, C4Error, Result};

use crate::graph::{Graph, StateId, StateRole, Transition, TransitionId};
use crate::label::{Advance, Label, LabelData};
use crate::model::Model;
use crate::model_type::Scope;
use crate::splice::SpliceSide;

/// Position context handed to a scoring closure.
///
/// `query_pos`/`target_pos` are the predecessor cell's coordinates: the
/// transition consumes `query[query_pos..query_pos + advance.query]` and the
/// matching target range.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'s> {
    pub query: &'s [u8],
    pub target: &'s [u8],
    pub query_pos: usize,
    pub target_pos: usize,
}

impl<'s> Cell<'s> {
    pub fn query_slice(&self, len: usize) -> &'s [u8] {
        &self.query[self.query_pos..self.query_pos + len]
    }

    pub fn target_slice(&self, len: usize) -> &'s [u8] {
        &self.target[self.target_pos..self.target_pos + len]
    }
}

/// A resolved scoring function. `None` forbids the transition at that cell.
pub type ScoreFn = Arc<dyn Fn(&Cell<'_>) -> Option<i32> + Send + Sync>;

/// One incoming edge of a compiled state.
pub struct Incoming {
    /// The model transition this edge was compiled from.
    pub transition: TransitionId,
    /// Index of the predecessor in [`CompiledRecurrence::states`].
    pub from: usize,
    pub label: Label,
    pub advance: Advance,
    score: ScoreFn,
}

impl Incoming {
    pub fn score(&self, cell: &Cell<'_>) -> Option<i32> {
        (self.score)(cell)
    }
}

impl fmt::Debug for Incoming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incoming")
            .field("transition", &self.transition)
            .field("from", &self.from)
            .field("label", &self.label)
            .field("advance", &self.advance)
            .finish_non_exhaustive()
    }
}

/// A state of the recurrence.
#[derive(Debug)]
pub struct CompiledState {
    pub id: StateId,
    pub name: String,
    pub role: StateRole,
    /// Reachable from START without consuming anything.
    pub seeded: bool,
    /// An END state of the model.
    pub accepting: bool,
    pub incoming: Vec<Incoming>,
}

/// The executable form of a closed model. Immutable; share it freely
/// between threads.
#[derive(Debug)]
pub struct CompiledRecurrence {
    model_name: String,
    states: Vec<CompiledState>,
    start_scope: Scope,
    end_scope: Scope,
    alphabets: Option<(AlphabetType, AlphabetType)>,
}

impl CompiledRecurrence {
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn states(&self) -> &[CompiledState] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Total number of incoming edges over all states.
    pub fn edge_count(&self) -> usize {
        self.states.iter().map(|s| s.incoming.len()).sum()
    }

    pub fn start_scope(&self) -> Scope {
        self.start_scope
    }

    pub fn end_scope(&self) -> Scope {
        self.end_scope
    }

    pub fn alphabets(&self) -> Option<(AlphabetType, AlphabetType)> {
        self.alphabets
    }

    /// Index of a model state in [`CompiledRecurrence::states`], if kept.
    pub fn state_index(&self, id: StateId) -> Option<usize> {
        self.states.binary_search_by_key(&id, |s| s.id).ok()
    }
}

/// Compile a closed model.
///
/// # Errors
///
/// * [`C4Error::InvalidStateTransition`] if the model is open.
/// * [`C4Error::ZeroAdvance`] for a scored transition that advances neither
///   sequence, or for a cycle of silent transitions.
/// * [`C4Error::UnresolvedLabelData`] if a transition's data does not fit its
///   label.
pub fn compile(model: &Model) -> Result<CompiledRecurrence> {
    if model.is_open() {
        return Err(C4Error::InvalidStateTransition(format!(
            "cannot compile open model '{}'",
            model.name()
        )));
    }
    let graph = model.graph();
    let start = model.start().ok_or_else(|| {
        C4Error::ModelStructure(format!("model '{}' has no START state", model.name()))
    })?;

    for (id, t) in graph.transitions() {
        if !t.is_silent() && t.advance().is_zero() {
            return Err(C4Error::ZeroAdvance(format!(
                "transition {id} ({}) of '{}' advances neither sequence",
                t.label(),
                model.name()
            )));
        }
    }
    check_silent_cycles(graph, model.name())?;

    // kept states, in handle order
    let mut index = vec![None; graph.state_capacity()];
    let mut states = Vec::new();
    for (id, state) in graph.states() {
        let scored = state
            .outgoing()
            .iter()
            .filter_map(|&t| graph.transition(t))
            .any(|t| !t.is_silent());
        let accepting = model.is_end(id);
        if scored || accepting {
            index[id.index()] = Some(states.len());
            states.push(CompiledState {
                id,
                name: state.name().to_owned(),
                role: state.role(),
                seeded: false,
                accepting,
                incoming: Vec::new(),
            });
        }
    }

    for s in silent_closure(graph, start) {
        if let Some(k) = index[s.index()] {
            states[k].seeded = true;
        }
    }

    for (id, t) in graph.transitions() {
        if t.is_silent() {
            continue;
        }
        let score = resolve(id, t)?;
        let Some(from) = index[t.source().index()] else {
            continue;
        };
        for s in silent_closure(graph, t.destination()) {
            if let Some(k) = index[s.index()] {
                states[k].incoming.push(Incoming {
                    transition: id,
                    from,
                    label: t.label(),
                    advance: t.advance(),
                    score: Arc::clone(&score),
                });
            }
        }
    }

    Ok(CompiledRecurrence {
        model_name: model.name().to_owned(),
        states,
        start_scope: model.start_scope(),
        end_scope: model.end_scope(),
        alphabets: model.alphabets(),
    })
}

/// `from` and every state reachable from it over silent transitions, in
/// handle order.
fn silent_closure(graph: &Graph, from: StateId) -> Vec<StateId> {
    let mut seen = vec![false; graph.state_capacity()];
    let mut stack = vec![from];
    seen[from.index()] = true;
    while let Some(s) = stack.pop() {
        let Some(state) = graph.state(s) else { continue };
        for t in state.outgoing().iter().filter_map(|&t| graph.transition(t)) {
            let next = t.destination();
            if t.is_silent() && !seen[next.index()] {
                seen[next.index()] = true;
                stack.push(next);
            }
        }
    }
    graph
        .states()
        .map(|(id, _)| id)
        .filter(|id| seen[id.index()])
        .collect()
}

fn check_silent_cycles(graph: &Graph, model_name: &str) -> Result<()> {
    const WHITE: u8 = 0;
    const GREY: u8 = 1;
    const BLACK: u8 = 2;

    let mut colour = vec![WHITE; graph.state_capacity()];
    for (root, _) in graph.states() {
        if colour[root.index()] != WHITE {
            continue;
        }
        // (state, next outgoing position)
        let mut stack: Vec<(StateId, usize)> = vec![(root, 0)];
        colour[root.index()] = GREY;
        while let Some(top) = stack.last_mut() {
            let (s, pos) = *top;
            top.1 += 1;
            let outgoing = graph.state(s).map(|st| st.outgoing()).unwrap_or(&[]);
            let Some(&t) = outgoing.get(pos) else {
                colour[s.index()] = BLACK;
                stack.pop();
                continue;
            };
            let Some(t) = graph.transition(t).filter(|t| t.is_silent()) else {
                continue;
            };
            let next = t.destination();
            match colour[next.index()] {
                WHITE => {
                    colour[next.index()] = GREY;
                    stack.push((next, 0));
                }
                GREY => {
                    let name = graph.state(next).map_or("?", |st| st.name());
                    return Err(C4Error::ZeroAdvance(format!(
                        "silent transitions of '{model_name}' form a cycle through state '{name}'"
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn unresolved(id: TransitionId, label: Label, detail: &str) -> C4Error {
    C4Error::UnresolvedLabelData {
        transition: id.to_string(),
        label: format!("{label}: {detail}"),
    }
}

/// Turn a transition's label data into a scoring closure.
fn resolve(id: TransitionId, t: &Transition) -> Result<ScoreFn> {
    let advance = t.advance();
    let label = t.label();
    let score: ScoreFn = match (label, t.data()) {
        (Label::Passthrough, None) => Arc::new(|_: &Cell<'_>| Some(0)),
        (Label::Match | Label::Passthrough, Some(LabelData::Match(m))) => {
            if m.advance() != advance {
                return Err(unresolved(
                    id,
                    label,
                    &format!("match consumes {} but transition advances {advance}", m.advance()),
                ));
            }
            let m = Arc::clone(m);
            Arc::new(move |cell: &Cell<'_>| {
                Some(m.score(
                    cell.query_slice(advance.query),
                    cell.target_slice(advance.target),
                ))
            })
        }
        (
            Label::GapOpen | Label::GapExtend | Label::Frameshift | Label::Intron,
            Some(LabelData::Penalty(p)),
        ) => {
            let p = *p;
            Arc::new(move |_: &Cell<'_>| Some(p))
        }
        (Label::SpliceDonor, Some(LabelData::Splice(site))) if site.side() == SpliceSide::Donor => {
            splice_fn(id, label, advance, *site)?
        }
        (Label::SpliceAcceptor, Some(LabelData::Splice(site)))
            if site.side() == SpliceSide::Acceptor =>
        {
            splice_fn(id, label, advance, *site)?
        }
        (Label::SplitCodon, Some(LabelData::SplitCodon(split))) => {
            if split.advance() != advance {
                return Err(unresolved(
                    id,
                    label,
                    &format!(
                        "split codon consumes {} but transition advances {advance}",
                        split.advance()
                    ),
                ));
            }
            let split = split.clone();
            Arc::new(move |cell: &Cell<'_>| {
                split.score(
                    cell.query_slice(advance.query),
                    cell.target_slice(advance.target),
                )
            })
        }
        (label, Some(data)) => {
            return Err(unresolved(id, label, &format!("unexpected {} data", data.kind())))
        }
        (label, None) => return Err(unresolved(id, label, "no scoring data")),
    };
    Ok(score)
}

fn splice_fn(
    id: TransitionId,
    label: Label,
    advance: Advance,
    site: crate::splice::SpliceSite,
) -> Result<ScoreFn> {
    if advance != Advance::new(0, 2) {
        return Err(unresolved(
            id,
            label,
            &format!("splice site must advance (0,2), not {advance}"),
        ));
    }
    Ok(Arc::new(move |cell: &Cell<'_>| Some(site.score(cell.target_slice(2)))))
}
