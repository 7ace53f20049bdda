//! State/transition arena for comparison models.
//!
//! States and transitions live in tombstoned vectors addressed by small
//! integer handles. Removed slots stay empty and handles are never reused,
//! so handle order is insertion order for the lifetime of a graph.

use core::fmt;

use c4_core::{C4Error, Result};

use crate::label::{Advance, Label, LabelData};

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Handle to a state within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub(crate) u32);

/// Handle to a transition within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionId(pub(crate) u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TransitionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

fn next_handle(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| C4Error::ModelStructure(format!("too many {what} in one model")))
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Logical role of a state. Purely descriptive: START/END designation is
/// held by the model, not by the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateRole {
    Start,
    End,
    Match,
    /// Query symbols consumed against nothing.
    Insert,
    /// Target symbols consumed against nothing.
    Delete,
    Intron,
    /// Inside a codon interrupted by an intron.
    Phase,
    /// Former START/END of an inserted sub-model.
    Junction,
}

impl StateRole {
    pub fn name(self) -> &'static str {
        match self {
            StateRole::Start => "start",
            StateRole::End => "end",
            StateRole::Match => "match",
            StateRole::Insert => "insert",
            StateRole::Delete => "delete",
            StateRole::Intron => "intron",
            StateRole::Phase => "phase",
            StateRole::Junction => "junction",
        }
    }
}

/// A node of the comparison model.
#[derive(Debug, Clone)]
pub struct State {
    name: String,
    role: StateRole,
    outgoing: Vec<TransitionId>,
    incoming: Vec<TransitionId>,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> StateRole {
        self.role
    }

    /// Outgoing transitions in insertion order.
    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }

    /// Incoming transitions in insertion order.
    pub fn incoming(&self) -> &[TransitionId] {
        &self.incoming
    }
}

/// A labelled edge consuming `advance` symbols.
#[derive(Debug, Clone)]
pub struct Transition {
    pub(crate) source: StateId,
    pub(crate) destination: StateId,
    pub(crate) label: Label,
    pub(crate) advance: Advance,
    pub(crate) data: Option<LabelData>,
}

impl Transition {
    pub fn source(&self) -> StateId {
        self.source
    }

    pub fn destination(&self) -> StateId {
        self.destination
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn advance(&self) -> Advance {
        self.advance
    }

    pub fn data(&self) -> Option<&LabelData> {
        self.data.as_ref()
    }

    /// Structural glue: a passthrough that consumes nothing and scores nothing.
    pub fn is_silent(&self) -> bool {
        self.label == Label::Passthrough && self.advance.is_zero() && self.data.is_none()
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Directed multigraph of states and transitions.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    states: Vec<Option<State>>,
    transitions: Vec<Option<Transition>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state and return its handle.
    pub fn add_state(&mut self, name: impl Into<String>, role: StateRole) -> Result<StateId> {
        let id = StateId(next_handle(self.states.len(), "states")?);
        self.states.push(Some(State {
            name: name.into(),
            role,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        Ok(id)
    }

    /// Add a transition between two existing states.
    ///
    /// # Errors
    ///
    /// Returns [`C4Error::ModelStructure`] if either endpoint is missing.
    pub fn add_transition(
        &mut self,
        source: StateId,
        destination: StateId,
        label: Label,
        advance: Advance,
        data: Option<LabelData>,
    ) -> Result<TransitionId> {
        self.require_state(source)?;
        self.require_state(destination)?;
        let id = TransitionId(next_handle(self.transitions.len(), "transitions")?);
        self.transitions.push(Some(Transition {
            source,
            destination,
            label,
            advance,
            data,
        }));
        if let Some(state) = self.state_mut(source) {
            state.outgoing.push(id);
        }
        if let Some(state) = self.state_mut(destination) {
            state.incoming.push(id);
        }
        Ok(id)
    }

    /// Remove a transition and return it.
    pub fn remove_transition(&mut self, id: TransitionId) -> Result<Transition> {
        let t = self
            .transitions
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| C4Error::ModelStructure(format!("no transition {id}")))?;
        if let Some(state) = self.state_mut(t.source) {
            state.outgoing.retain(|&o| o != id);
        }
        if let Some(state) = self.state_mut(t.destination) {
            state.incoming.retain(|&i| i != id);
        }
        Ok(t)
    }

    /// Remove a state together with every transition touching it.
    pub fn remove_state(&mut self, id: StateId) -> Result<State> {
        let attached: Vec<TransitionId> = {
            let state = self.require_state(id)?;
            let mut ids: Vec<TransitionId> =
                state.outgoing.iter().chain(&state.incoming).copied().collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        for t in attached {
            self.remove_transition(t)?;
        }
        self.states
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| C4Error::ModelStructure(format!("no state {id}")))
    }

    /// Point an existing transition at new endpoints.
    pub fn redirect_transition(
        &mut self,
        id: TransitionId,
        source: StateId,
        destination: StateId,
    ) -> Result<()> {
        self.require_state(source)?;
        self.require_state(destination)?;
        let (old_source, old_destination) = {
            let t = self.require_transition(id)?;
            (t.source, t.destination)
        };
        if let Some(state) = self.state_mut(old_source) {
            state.outgoing.retain(|&o| o != id);
        }
        if let Some(state) = self.state_mut(old_destination) {
            state.incoming.retain(|&i| i != id);
        }
        if let Some(t) = self.transitions.get_mut(id.index()).and_then(Option::as_mut) {
            t.source = source;
            t.destination = destination;
        }
        // keep the per-state lists in handle order
        if let Some(state) = self.state_mut(source) {
            let pos = state.outgoing.partition_point(|&o| o < id);
            state.outgoing.insert(pos, id);
        }
        if let Some(state) = self.state_mut(destination) {
            let pos = state.incoming.partition_point(|&i| i < id);
            state.incoming.insert(pos, id);
        }
        Ok(())
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index()).and_then(Option::as_ref)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.index()).and_then(Option::as_ref)
    }

    fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub(crate) fn require_state(&self, id: StateId) -> Result<&State> {
        self.state(id)
            .ok_or_else(|| C4Error::ModelStructure(format!("no state {id}")))
    }

    pub(crate) fn require_transition(&self, id: TransitionId) -> Result<&Transition> {
        self.transition(id)
            .ok_or_else(|| C4Error::ModelStructure(format!("no transition {id}")))
    }

    /// Live states in handle order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (StateId(i as u32), s)))
    }

    /// Live transitions in handle order.
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> {
        self.transitions
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (TransitionId(i as u32), t)))
    }

    pub fn state_count(&self) -> usize {
        self.states.iter().flatten().count()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.iter().flatten().count()
    }

    /// One past the largest state handle ever issued.
    pub fn state_capacity(&self) -> usize {
        self.states.len()
    }

    /// First live state with the given name.
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.states()
            .find(|(_, s)| s.name == name)
            .map(|(id, _)| id)
    }

    /// All transitions carrying `label`, in insertion order.
    pub fn select_transitions(&self, label: Label) -> Vec<TransitionId> {
        self.transitions()
            .filter(|(_, t)| t.label == label)
            .map(|(id, _)| id)
            .collect()
    }

    /// The only transition carrying `label`.
    ///
    /// # Errors
    ///
    /// Returns [`C4Error::ModelStructure`] unless exactly one transition
    /// carries the label.
    pub fn select_single_transition(&self, label: Label) -> Result<TransitionId> {
        match self.select_transitions(label).as_slice() {
            [id] => Ok(*id),
            ids => Err(C4Error::ModelStructure(format!(
                "expected exactly one {label} transition, found {}",
                ids.len()
            ))),
        }
    }

    /// States reachable from `from` by following transitions forwards,
    /// indexed by handle.
    pub fn reachable_from(&self, from: StateId) -> Vec<bool> {
        self.flood(&[from], |t| t.destination, State::outgoing)
    }

    /// States from which some state in `to` is reachable, indexed by handle.
    pub fn reaching(&self, to: &[StateId]) -> Vec<bool> {
        self.flood(to, |t| t.source, State::incoming)
    }

    fn flood(
        &self,
        seeds: &[StateId],
        next: impl Fn(&Transition) -> StateId,
        edges: impl Fn(&State) -> &[TransitionId],
    ) -> Vec<bool> {
        let mut seen = vec![false; self.states.len()];
        let mut stack: Vec<StateId> = Vec::new();
        for &s in seeds {
            if self.state(s).is_some() && !seen[s.index()] {
                seen[s.index()] = true;
                stack.push(s);
            }
        }
        while let Some(s) = stack.pop() {
            let Some(state) = self.state(s) else { continue };
            for &t in edges(state) {
                if let Some(t) = self.transition(t) {
                    let n = next(t);
                    if !seen[n.index()] {
                        seen[n.index()] = true;
                        stack.push(n);
                    }
                }
            }
        }
        seen
    }
}
