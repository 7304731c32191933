use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::models::{SensorEvent, SensorState};
use crate::state_machine::action::SensorAction;

/// How a composite state remembers its last active sub state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HistoryType {
    /// Always re-enter the initial sub state
    #[default]
    None,
    /// Re-enter the last active direct sub state
    Shallow,
    /// Re-enter the last active leaf among all descendants
    Deep,
}

/// A composite state and its sub states
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub history_type: HistoryType,
    pub initial_sub_state: SensorState,
    pub sub_states: Vec<SensorState>,
}

/// A registered reaction to an event.
///
/// A transition without target is internal: its actions run but no state is exited or entered.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub target: Option<SensorState>,
    pub actions: Vec<SensorAction>,
}

/// The validated, immutable structure of a state machine.
///
/// Built once by `StateMachineDefinition::build`. Ancestor chains are computed at that point so the
/// runtime never has to walk the hierarchy to find them.
#[derive(Debug, Clone)]
pub struct StateGraph {
    pub(crate) hierarchies: HashMap<SensorState, Hierarchy>,
    pub(crate) ancestors: HashMap<SensorState, Vec<SensorState>>,
    pub(crate) transitions: HashMap<(SensorState, SensorEvent), Transition>,
    pub(crate) entry_actions: HashMap<SensorState, Vec<SensorAction>>,
    pub(crate) exit_actions: HashMap<SensorState, Vec<SensorAction>>,
    pub(crate) initial_state: SensorState,
}

impl StateGraph {
    /// The state entered when the machine starts
    pub fn initial_state(&self) -> SensorState {
        self.initial_state
    }

    /// The chain of super states of `state`, innermost first
    pub fn ancestors(&self, state: SensorState) -> &[SensorState] {
        self.ancestors.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `state` followed by its ancestors, innermost first
    pub fn path_to_root(&self, state: SensorState) -> Vec<SensorState> {
        let mut path = Vec::with_capacity(self.ancestors(state).len() + 1);
        path.push(state);
        path.extend_from_slice(self.ancestors(state));
        path
    }

    pub fn hierarchy(&self, state: SensorState) -> Option<&Hierarchy> {
        self.hierarchies.get(&state)
    }

    pub fn is_composite(&self, state: SensorState) -> bool {
        self.hierarchies.contains_key(&state)
    }

    /// Finds the transition handling `event` while `leaf` is active.
    ///
    /// The leaf is asked first, then its super states from the inside out. Returns the state that
    /// owns the transition together with the transition itself.
    pub fn find_transition(&self, leaf: SensorState, event: SensorEvent) -> Option<(SensorState, &Transition)> {
        self.path_to_root(leaf)
            .into_iter()
            .find_map(|state| self.transitions.get(&(state, event)).map(|t| (state, t)))
    }

    pub fn entry_actions(&self, state: SensorState) -> &[SensorAction] {
        self.entry_actions.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn exit_actions(&self, state: SensorState) -> &[SensorAction] {
        self.exit_actions.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The events `state` reacts to, including those handled by its super states
    pub fn handled_events(&self, state: SensorState) -> Vec<SensorEvent> {
        SensorEvent::ALL
            .into_iter()
            .filter(|event| self.find_transition(state, *event).is_some())
            .collect()
    }
}
