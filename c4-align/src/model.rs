//! Named comparison models and their edit lifecycle.
//!
//! A [`Model`] is OPEN while it is being built: states and transitions may be
//! added, removed or redirected. [`Model::close`] validates the graph and
//! freezes it; only closed models can be compiled. Every mutating call on a
//! closed model fails with [`C4Error::InvalidStateTransition`] and leaves the
//! model untouched.

use core::fmt;

use c4_core::{AlphabetType, C4Error, Result};

use crate::graph::{Graph, State, StateId, StateRole, Transition, TransitionId};
use crate::insert::{self, Insertion};
use crate::label::{Advance, Label, LabelData};
use crate::model_type::Scope;

/// Edit lifecycle of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Open,
    Closed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Open => f.write_str("open"),
            Lifecycle::Closed => f.write_str("closed"),
        }
    }
}

/// A named comparison model.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    graph: Graph,
    start: Option<StateId>,
    ends: Vec<StateId>,
    lifecycle: Lifecycle,
    start_scope: Scope,
    end_scope: Scope,
    alphabets: Option<(AlphabetType, AlphabetType)>,
}

impl Model {
    /// Create an empty, open model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: Graph::new(),
            start: None,
            ends: Vec::new(),
            lifecycle: Lifecycle::Open,
            start_scope: Scope::Corner,
            end_scope: Scope::Corner,
            alphabets: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn ends(&self) -> &[StateId] {
        &self.ends
    }

    pub fn is_end(&self, id: StateId) -> bool {
        self.ends.contains(&id)
    }

    pub fn start_scope(&self) -> Scope {
        self.start_scope
    }

    pub fn end_scope(&self) -> Scope {
        self.end_scope
    }

    /// (query, target) alphabets this model was built for, if recorded.
    pub fn alphabets(&self) -> Option<(AlphabetType, AlphabetType)> {
        self.alphabets
    }

    // -- lifecycle ----------------------------------------------------------

    fn ensure_open(&self, op: &str) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(C4Error::InvalidStateTransition(format!(
                "cannot {op} closed model '{}'",
                self.name
            )))
        }
    }

    /// Reopen a closed model for editing.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(C4Error::InvalidStateTransition(format!(
                "model '{}' is already open",
                self.name
            )));
        }
        self.lifecycle = Lifecycle::Open;
        Ok(())
    }

    /// Validate and freeze the model.
    ///
    /// # Errors
    ///
    /// [`C4Error::InvalidStateTransition`] if already closed, otherwise the
    /// first [`C4Error::ModelStructure`] violation found by [`Model::validate`].
    pub fn close(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(C4Error::InvalidStateTransition(format!(
                "model '{}' is already closed",
                self.name
            )));
        }
        self.validate()?;
        self.lifecycle = Lifecycle::Closed;
        Ok(())
    }

    /// Check well-formedness without changing the lifecycle: one START, at
    /// least one END, no dangling transitions, every state reachable from
    /// START and able to reach an END.
    pub fn validate(&self) -> Result<()> {
        let start = self.start.ok_or_else(|| {
            C4Error::ModelStructure(format!("model '{}' has no START state", self.name))
        })?;
        self.graph.require_state(start)?;
        if self.ends.is_empty() {
            return Err(C4Error::ModelStructure(format!(
                "model '{}' has no END state",
                self.name
            )));
        }
        for &end in &self.ends {
            self.graph.require_state(end)?;
        }
        for (id, t) in self.graph.transitions() {
            if self.graph.state(t.source()).is_none() || self.graph.state(t.destination()).is_none() {
                return Err(C4Error::ModelStructure(format!(
                    "model '{}': transition {id} has a dangling endpoint",
                    self.name
                )));
            }
        }
        let forward = self.graph.reachable_from(start);
        let backward = self.graph.reaching(&self.ends);
        for (id, state) in self.graph.states() {
            if !forward[id.index()] {
                return Err(C4Error::ModelStructure(format!(
                    "model '{}': state '{}' ({id}) is unreachable from START",
                    self.name,
                    state.name()
                )));
            }
            if !backward[id.index()] {
                return Err(C4Error::ModelStructure(format!(
                    "model '{}': state '{}' ({id}) cannot reach an END state",
                    self.name,
                    state.name()
                )));
            }
        }
        Ok(())
    }

    /// Release every state and transition. Valid in either lifecycle state.
    pub fn destroy(self) {}

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        self.ensure_open("rename")?;
        self.name = name.into();
        Ok(())
    }

    pub fn set_scopes(&mut self, start: Scope, end: Scope) -> Result<()> {
        self.ensure_open("set scopes on")?;
        self.start_scope = start;
        self.end_scope = end;
        Ok(())
    }

    pub fn set_alphabets(&mut self, query: AlphabetType, target: AlphabetType) -> Result<()> {
        self.ensure_open("set alphabets on")?;
        self.alphabets = Some((query, target));
        Ok(())
    }

    // -- graph edits --------------------------------------------------------

    pub fn add_state(&mut self, name: impl Into<String>, role: StateRole) -> Result<StateId> {
        self.ensure_open("add a state to")?;
        self.graph.add_state(name, role)
    }

    pub fn add_transition(
        &mut self,
        source: StateId,
        destination: StateId,
        label: Label,
        advance: Advance,
        data: Option<LabelData>,
    ) -> Result<TransitionId> {
        self.ensure_open("add a transition to")?;
        self.graph.add_transition(source, destination, label, advance, data)
    }

    /// Add a zero-advance passthrough with no data.
    pub fn add_silent(&mut self, source: StateId, destination: StateId) -> Result<TransitionId> {
        self.add_transition(source, destination, Label::Passthrough, Advance::ZERO, None)
    }

    pub fn remove_transition(&mut self, id: TransitionId) -> Result<Transition> {
        self.ensure_open("remove a transition from")?;
        self.graph.remove_transition(id)
    }

    /// Remove a state, its transitions, and any START/END designation.
    pub fn remove_state(&mut self, id: StateId) -> Result<State> {
        self.ensure_open("remove a state from")?;
        let state = self.graph.remove_state(id)?;
        if self.start == Some(id) {
            self.start = None;
        }
        self.ends.retain(|&e| e != id);
        Ok(state)
    }

    pub fn redirect_transition(
        &mut self,
        id: TransitionId,
        source: StateId,
        destination: StateId,
    ) -> Result<()> {
        self.ensure_open("redirect a transition in")?;
        self.graph.redirect_transition(id, source, destination)
    }

    pub fn set_start(&mut self, id: StateId) -> Result<()> {
        self.ensure_open("set START on")?;
        self.graph.require_state(id)?;
        self.start = Some(id);
        Ok(())
    }

    pub fn add_end(&mut self, id: StateId) -> Result<()> {
        self.ensure_open("add END to")?;
        self.graph.require_state(id)?;
        if !self.ends.contains(&id) {
            self.ends.push(id);
        }
        Ok(())
    }

    /// Splice `sub` into transition `at`. See [`insert::insert`].
    pub fn insert(&mut self, sub: &Model, at: TransitionId) -> Result<Insertion> {
        insert::insert(self, sub, at)
    }

    // -- queries ------------------------------------------------------------

    pub fn select_transitions(&self, label: Label) -> Vec<TransitionId> {
        self.graph.select_transitions(label)
    }

    pub fn select_single_transition(&self, label: Label) -> Result<TransitionId> {
        self.graph
            .select_single_transition(label)
            .map_err(|e| match e {
                C4Error::ModelStructure(msg) => {
                    C4Error::ModelStructure(format!("model '{}': {msg}", self.name))
                }
                other => other,
            })
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.graph.state(id)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.graph.transition(id)
    }

    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.graph.find_state(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// START -> M -> END with a scored loop on M.
    fn small() -> Model {
        let mut m = Model::new("small");
        let s = m.add_state("START", StateRole::Start).unwrap();
        let x = m.add_state("M", StateRole::Match).unwrap();
        let e = m.add_state("END", StateRole::End).unwrap();
        m.set_start(s).unwrap();
        m.add_end(e).unwrap();
        m.add_silent(s, x).unwrap();
        m.add_transition(x, x, Label::GapExtend, Advance::new(1, 0), Some(LabelData::Penalty(-1)))
            .unwrap();
        m.add_silent(x, e).unwrap();
        m
    }

    #[test]
    fn close_then_open() {
        let mut m = small();
        assert!(m.is_open());
        m.close().unwrap();
        assert_eq!(m.lifecycle(), Lifecycle::Closed);
        assert!(matches!(m.close(), Err(C4Error::InvalidStateTransition(_))));
        m.open().unwrap();
        assert!(matches!(m.open(), Err(C4Error::InvalidStateTransition(_))));
    }

    #[test]
    fn closed_model_rejects_edits() {
        let mut m = small();
        m.close().unwrap();
        let before = m.graph().state_count();
        assert!(matches!(
            m.add_state("X", StateRole::Match),
            Err(C4Error::InvalidStateTransition(_))
        ));
        assert!(matches!(m.rename("other"), Err(C4Error::InvalidStateTransition(_))));
        assert_eq!(m.graph().state_count(), before);
        assert_eq!(m.name(), "small");
    }

    #[test]
    fn unreachable_state_blocks_close() {
        let mut m = small();
        let orphan = m.add_state("orphan", StateRole::Match).unwrap();
        let end = m.ends()[0];
        m.add_silent(orphan, end).unwrap();
        let err = m.close().unwrap_err();
        assert!(matches!(err, C4Error::ModelStructure(ref msg) if msg.contains("unreachable")));
        assert!(m.is_open());
        m.remove_state(orphan).unwrap();
        m.close().unwrap();
    }

    #[test]
    fn dead_end_blocks_close() {
        let mut m = small();
        let start = m.start().unwrap();
        let sink = m.add_state("sink", StateRole::Match).unwrap();
        m.add_silent(start, sink).unwrap();
        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("cannot reach an END"));
    }

    #[test]
    fn missing_start_or_end() {
        let mut m = Model::new("empty");
        assert!(m.validate().unwrap_err().to_string().contains("no START"));
        let s = m.add_state("START", StateRole::Start).unwrap();
        m.set_start(s).unwrap();
        assert!(m.validate().unwrap_err().to_string().contains("no END"));
    }

    #[test]
    fn removing_start_clears_designation() {
        let mut m = small();
        let s = m.start().unwrap();
        m.remove_state(s).unwrap();
        assert!(m.start().is_none());
        assert!(m.close().is_err());
    }

    #[test]
    fn rename_and_destroy() {
        let mut m = small();
        m.rename("renamed").unwrap();
        assert_eq!(m.name(), "renamed");
        m.close().unwrap();
        m.destroy();
    }

    #[test]
    fn select_single_names_model() {
        let m = small();
        let err = m.select_single_transition(Label::Match).unwrap_err();
        assert!(err.to_string().contains("model 'small'"));
    }
}
