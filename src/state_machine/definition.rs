//! Fluent definition of a hierarchical state machine.
//!
//! ```
//! use vhpt_door_sensor::models::{SensorEvent, SensorState};
//! use vhpt_door_sensor::state_machine::{HistoryType, SensorAction, StateMachineDefinition};
//!
//! let mut definition = StateMachineDefinition::new();
//! definition.define_hierarchy_on(SensorState::NormalMode)
//!     .with_history_type(HistoryType::Deep)
//!     .with_initial_sub_state(SensorState::DoorClosedInNormalMode)
//!     .with_sub_state(SensorState::DoorOpenInNormalMode);
//! definition.in_state(SensorState::DoorClosedInNormalMode)
//!     .on(SensorEvent::DoorOpened).goto(SensorState::DoorOpenInNormalMode)
//!     .execute(SensorAction::LogDoorOpenedInNormalMode);
//! definition.initialize(SensorState::NormalMode);
//!
//! let graph = definition.build().unwrap();
//! assert_eq!(graph.ancestors(SensorState::DoorOpenInNormalMode), &[SensorState::NormalMode]);
//! ```

use std::collections::HashMap;
use crate::errors::{DoorSensorError, DoorSensorResult};
use crate::models::{SensorEvent, SensorState};
use crate::state_machine::action::SensorAction;
use crate::state_machine::graph::{Hierarchy, HistoryType, StateGraph, Transition};

#[derive(Debug)]
struct HierarchyDefinition {
    superstate: SensorState,
    history_type: HistoryType,
    initial_sub_states: Vec<SensorState>,
    sub_states: Vec<SensorState>,
}

#[derive(Debug)]
struct TransitionDefinition {
    source: SensorState,
    event: SensorEvent,
    target: Option<SensorState>,
    actions: Vec<SensorAction>,
}

/// Collects hierarchies, transitions and entry/exit actions until `build` validates them
#[derive(Debug, Default)]
pub struct StateMachineDefinition {
    hierarchies: Vec<HierarchyDefinition>,
    transitions: Vec<TransitionDefinition>,
    entry_actions: HashMap<SensorState, Vec<SensorAction>>,
    exit_actions: HashMap<SensorState, Vec<SensorAction>>,
    initial_state: Option<SensorState>,
}

impl StateMachineDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `superstate` as a composite state
    pub fn define_hierarchy_on(&mut self, superstate: SensorState) -> HierarchyBuilder<'_> {
        self.hierarchies.push(HierarchyDefinition {
            superstate,
            history_type: HistoryType::None,
            initial_sub_states: Vec::new(),
            sub_states: Vec::new(),
        });
        let index = self.hierarchies.len() - 1;
        HierarchyBuilder { definition: self, index }
    }

    /// Starts the definition of the transitions and entry/exit actions of `state`
    pub fn in_state(&mut self, state: SensorState) -> StateBuilder<'_> {
        StateBuilder { definition: self, state }
    }

    /// Sets the state entered on start. A composite resolves to its initial sub state.
    pub fn initialize(&mut self, initial_state: SensorState) {
        self.initial_state = Some(initial_state);
    }

    /// Validates the definition and computes the static structure of the machine
    ///
    /// # Returns
    ///
    /// * `Ok(StateGraph)` if the definition is complete and consistent
    /// * `Err(DoorSensorError::DefinitionError)` naming the first problem found otherwise
    pub fn build(self) -> DoorSensorResult<StateGraph> {
        let initial_state = self.initial_state
            .ok_or_else(|| DoorSensorError::DefinitionError("initial state is not set".to_string()))?;

        let mut hierarchies = HashMap::new();
        let mut parents: HashMap<SensorState, SensorState> = HashMap::new();
        for definition in self.hierarchies {
            let superstate = definition.superstate;
            let initial_sub_state = match definition.initial_sub_states.as_slice() {
                [initial] => *initial,
                [] => return Err(definition_error(format!("hierarchy on {:?} has no initial sub state", superstate))),
                _ => return Err(definition_error(format!("hierarchy on {:?} declares more than one initial sub state", superstate))),
            };
            for sub_state in &definition.sub_states {
                if *sub_state == superstate {
                    return Err(definition_error(format!("{:?} cannot be a sub state of itself", superstate)));
                }
                if let Some(existing) = parents.insert(*sub_state, superstate) {
                    return Err(definition_error(format!(
                        "{:?} is a sub state of both {:?} and {:?}", sub_state, existing, superstate
                    )));
                }
            }
            let hierarchy = Hierarchy {
                history_type: definition.history_type,
                initial_sub_state,
                sub_states: definition.sub_states,
            };
            if hierarchies.insert(superstate, hierarchy).is_some() {
                return Err(definition_error(format!("hierarchy on {:?} is defined twice", superstate)));
            }
        }

        let mut ancestors = HashMap::new();
        for state in SensorState::ALL {
            let mut chain = Vec::new();
            let mut current = state;
            while let Some(parent) = parents.get(&current) {
                if *parent == state || chain.contains(parent) {
                    return Err(definition_error(format!("hierarchy containing {:?} is cyclic", state)));
                }
                chain.push(*parent);
                current = *parent;
            }
            ancestors.insert(state, chain);
        }

        let mut transitions = HashMap::new();
        for definition in self.transitions {
            let key = (definition.source, definition.event);
            let transition = Transition { target: definition.target, actions: definition.actions };
            if transitions.insert(key, transition).is_some() {
                return Err(definition_error(format!(
                    "{:?} defines more than one transition on {:?}", definition.source, definition.event
                )));
            }
        }

        Ok(StateGraph {
            hierarchies,
            ancestors,
            transitions,
            entry_actions: self.entry_actions,
            exit_actions: self.exit_actions,
            initial_state,
        })
    }
}

fn definition_error(message: String) -> DoorSensorError {
    DoorSensorError::DefinitionError(message)
}

/// Builder returned by `StateMachineDefinition::define_hierarchy_on`
pub struct HierarchyBuilder<'a> {
    definition: &'a mut StateMachineDefinition,
    index: usize,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn with_history_type(self, history_type: HistoryType) -> Self {
        self.definition.hierarchies[self.index].history_type = history_type;
        self
    }

    pub fn with_initial_sub_state(self, sub_state: SensorState) -> Self {
        let hierarchy = &mut self.definition.hierarchies[self.index];
        hierarchy.initial_sub_states.push(sub_state);
        hierarchy.sub_states.push(sub_state);
        self
    }

    pub fn with_sub_state(self, sub_state: SensorState) -> Self {
        self.definition.hierarchies[self.index].sub_states.push(sub_state);
        self
    }
}

/// Builder returned by `StateMachineDefinition::in_state`
pub struct StateBuilder<'a> {
    definition: &'a mut StateMachineDefinition,
    state: SensorState,
}

impl<'a> StateBuilder<'a> {
    /// Appends an action run whenever the state is entered from outside
    pub fn execute_on_entry(self, action: SensorAction) -> Self {
        self.definition.entry_actions.entry(self.state).or_default().push(action);
        self
    }

    /// Appends an action run whenever the state is left
    pub fn execute_on_exit(self, action: SensorAction) -> Self {
        self.definition.exit_actions.entry(self.state).or_default().push(action);
        self
    }

    /// Registers a reaction to `event`. Without a `goto` the transition is internal.
    pub fn on(self, event: SensorEvent) -> TransitionBuilder<'a> {
        TransitionBuilder::new(self.definition, self.state, event)
    }
}

/// Builder for a single transition, returned by `on`
pub struct TransitionBuilder<'a> {
    definition: &'a mut StateMachineDefinition,
    state: SensorState,
    index: usize,
}

impl<'a> TransitionBuilder<'a> {
    fn new(definition: &'a mut StateMachineDefinition, state: SensorState, event: SensorEvent) -> Self {
        definition.transitions.push(TransitionDefinition {
            source: state,
            event,
            target: None,
            actions: Vec::new(),
        });
        let index = definition.transitions.len() - 1;
        Self { definition, state, index }
    }

    pub fn goto(self, target: SensorState) -> Self {
        self.definition.transitions[self.index].target = Some(target);
        self
    }

    /// Appends an action to the transition. Actions run in the order they were added.
    pub fn execute(self, action: SensorAction) -> Self {
        self.definition.transitions[self.index].actions.push(action);
        self
    }

    /// Registers another transition of the same source state
    pub fn on(self, event: SensorEvent) -> TransitionBuilder<'a> {
        TransitionBuilder::new(self.definition, self.state, event)
    }
}
