//! Sub-model insertion.
//!
//! [`insert`] replaces one transition of an open host model with a copy of a
//! whole sub-model:
//!
//! ```text
//! before:  a ------------- t ------------> b
//! after:   a --silent--> S.START ... S.END_k --silent--> b
//! ```
//!
//! The sub-model is only read. States are copied under fresh handles, and
//! transitions are copied in handle order with their label data cloned, so
//! the spliced region consumes exactly what the chosen path through the
//! sub-model consumes.

use c4_core::{C4Error, Result};

use crate::graph::{StateId, StateRole, Transition, TransitionId};
use crate::model::Model;

/// What an insertion added to the host.
#[derive(Debug, Clone)]
pub struct Insertion {
    /// Host handle of each sub-model state, indexed by the sub-model handle.
    pub states: Vec<Option<StateId>>,
    /// Silent edge from the replaced transition's source to the copied START.
    pub entry: TransitionId,
    /// Silent edges from each copied END to the replaced transition's destination.
    pub exits: Vec<TransitionId>,
    /// The transition that was replaced.
    pub replaced: Transition,
}

impl Insertion {
    /// Host handle of a sub-model state.
    pub fn host_state(&self, sub_state: StateId) -> Option<StateId> {
        self.states.get(sub_state.index()).copied().flatten()
    }
}

/// Splice `sub` into `host` in place of transition `at`.
///
/// The sub-model's START and END states become [`StateRole::Junction`]
/// states in the host; copied state names are prefixed with
/// `"<sub name>@<at>."` so repeated insertions stay distinguishable.
///
/// # Errors
///
/// * [`C4Error::InvalidStateTransition`] if `host` is closed.
/// * [`C4Error::ModelStructure`] if `sub` does not validate or `at` is not
///   a transition of `host`.
///
/// Both are checked before the host is touched.
pub fn insert(host: &mut Model, sub: &Model, at: TransitionId) -> Result<Insertion> {
    if !host.is_open() {
        return Err(C4Error::InvalidStateTransition(format!(
            "cannot insert into closed model '{}'",
            host.name()
        )));
    }
    sub.validate()?;
    let (source, destination) = {
        let t = host.graph().require_transition(at)?;
        (t.source(), t.destination())
    };
    let sub_start = sub.start().ok_or_else(|| {
        C4Error::ModelStructure(format!("sub-model '{}' has no START state", sub.name()))
    })?;

    let mut states = vec![None; sub.graph().state_capacity()];
    for (id, state) in sub.graph().states() {
        let role = if id == sub_start || sub.is_end(id) {
            StateRole::Junction
        } else {
            state.role()
        };
        let name = format!("{}@{at}.{}", sub.name(), state.name());
        states[id.index()] = Some(host.add_state(name, role)?);
    }
    let mapped = |id: StateId| {
        states.get(id.index()).copied().flatten().ok_or_else(|| {
            C4Error::ModelStructure(format!(
                "sub-model '{}' transition refers to missing state {id}",
                sub.name()
            ))
        })
    };

    for (_, t) in sub.graph().transitions() {
        host.add_transition(
            mapped(t.source())?,
            mapped(t.destination())?,
            t.label(),
            t.advance(),
            t.data().cloned(),
        )?;
    }

    let entry = host.add_silent(source, mapped(sub_start)?)?;
    let mut exits = Vec::with_capacity(sub.ends().len());
    for &end in sub.ends() {
        exits.push(host.add_silent(mapped(end)?, destination)?);
    }
    let replaced = host.remove_transition(at)?;

    Ok(Insertion {
        states,
        entry,
        exits,
        replaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Advance, Label, LabelData};

    /// START -> X -> END, with one scored (1,1) transition X -> X.
    fn host() -> (Model, TransitionId) {
        let mut m = Model::new("host");
        let s = m.add_state("START", StateRole::Start).unwrap();
        let x = m.add_state("X", StateRole::Match).unwrap();
        let e = m.add_state("END", StateRole::End).unwrap();
        m.set_start(s).unwrap();
        m.add_end(e).unwrap();
        m.add_silent(s, x).unwrap();
        let t = m
            .add_transition(x, x, Label::GapExtend, Advance::new(1, 1), Some(LabelData::Penalty(-2)))
            .unwrap();
        m.add_silent(x, e).unwrap();
        (m, t)
    }

    /// START -(0,2)-> A -(1,0)-> END and START -(1,2)-> END.
    fn sub() -> Model {
        let mut m = Model::new("sub");
        let s = m.add_state("START", StateRole::Start).unwrap();
        let a = m.add_state("A", StateRole::Intron).unwrap();
        let e = m.add_state("END", StateRole::End).unwrap();
        m.set_start(s).unwrap();
        m.add_end(e).unwrap();
        m.add_transition(s, a, Label::Intron, Advance::new(0, 2), Some(LabelData::Penalty(-1)))
            .unwrap();
        m.add_transition(a, e, Label::GapOpen, Advance::new(1, 0), Some(LabelData::Penalty(-3)))
            .unwrap();
        m.add_transition(s, e, Label::GapExtend, Advance::new(1, 2), Some(LabelData::Penalty(0)))
            .unwrap();
        m
    }

    #[test]
    fn splices_in_place_of_transition() {
        let (mut h, at) = host();
        let x = h.find_state("X").unwrap();
        let sub = sub();
        let ins = h.insert(&sub, at).unwrap();

        assert!(h.transition(at).is_none());
        assert_eq!(ins.replaced.label(), Label::GapExtend);
        assert_eq!(h.graph().state_count(), 3 + 3);
        assert_eq!(h.transition(ins.entry).unwrap().source(), x);
        assert_eq!(ins.exits.len(), 1);
        assert_eq!(h.transition(ins.exits[0]).unwrap().destination(), x);

        let copied_start = ins.host_state(sub.start().unwrap()).unwrap();
        assert_eq!(h.state(copied_start).unwrap().role(), StateRole::Junction);
        let copied_a = ins.host_state(sub.find_state("A").unwrap()).unwrap();
        assert_eq!(h.state(copied_a).unwrap().role(), StateRole::Intron);
        assert_eq!(h.state(copied_a).unwrap().name(), format!("sub@{at}.A"));

        h.close().unwrap();
    }

    #[test]
    fn sub_model_is_untouched() {
        let (mut h, at) = host();
        let sub = sub();
        let before = (sub.graph().state_count(), sub.graph().transition_count());
        h.insert(&sub, at).unwrap();
        assert_eq!(before, (sub.graph().state_count(), sub.graph().transition_count()));
        assert!(sub.is_open());
    }

    #[test]
    fn advance_preserved_per_path() {
        let (mut h, at) = host();
        let sub = sub();
        let ins = h.insert(&sub, at).unwrap();
        let g = h.graph();
        let entry = g.transition(ins.entry).unwrap();
        let mut totals = Vec::new();
        for &first in g.state(entry.destination()).unwrap().outgoing() {
            let mut total = Advance::ZERO;
            let mut t = g.transition(first).unwrap();
            loop {
                total = total + t.advance();
                if t.destination() == ins.replaced.destination() {
                    break;
                }
                let next = g.state(t.destination()).unwrap().outgoing()[0];
                t = g.transition(next).unwrap();
            }
            totals.push(total);
        }
        totals.sort();
        assert_eq!(totals, vec![Advance::new(1, 2), Advance::new(1, 2)]);
    }

    #[test]
    fn closed_host_rejected() {
        let (mut h, at) = host();
        h.close().unwrap();
        let err = h.insert(&sub(), at).unwrap_err();
        assert!(matches!(err, C4Error::InvalidStateTransition(_)));
    }

    #[test]
    fn invalid_sub_rejected_before_editing() {
        let (mut h, at) = host();
        let mut broken = sub();
        broken.add_state("orphan", StateRole::Match).unwrap();
        let before = h.graph().state_count();
        assert!(matches!(h.insert(&broken, at), Err(C4Error::ModelStructure(_))));
        assert_eq!(h.graph().state_count(), before);
        assert!(h.transition(at).is_some());
    }

    #[test]
    fn missing_transition_rejected() {
        let (mut h, at) = host();
        h.remove_transition(at).unwrap();
        assert!(matches!(h.insert(&sub(), at), Err(C4Error::ModelStructure(_))));
    }
}
