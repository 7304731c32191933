use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use crate::errors::{DoorSensorError, DoorSensorResult};
use crate::models::{HistoryEntry, SensorEvent, SensorState};
use crate::state_machine::action::{ActionExecutor, SensorAction};
use crate::state_machine::graph::{HistoryType, StateGraph};

/// The result of dispatching a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireOutcome {
    /// The machine moved from one leaf to another
    Transitioned { from: SensorState, to: SensorState },
    /// An internal transition of `handled_by` accepted the event without changing state
    Handled { state: SensorState, handled_by: SensorState },
    /// No transition is registered for the event in the active leaf or its super states
    Ignored { state: SensorState, event: SensorEvent },
    /// The machine is not running
    NotRunning,
}

/// Runtime of a hierarchical state machine.
///
/// Holds the active leaf and the history of each composite state. Dispatch is synchronous and runs to
/// completion; actions are delegated to an `ActionExecutor` supplied per call.
#[derive(Debug)]
pub struct StateMachine {
    graph: StateGraph,
    current: Option<SensorState>,
    history: HashMap<SensorState, SensorState>,
    running: bool,
}

impl StateMachine {
    pub fn new(graph: StateGraph) -> Self {
        Self {
            graph,
            current: None,
            history: HashMap::new(),
            running: false,
        }
    }

    /// Starts accepting events.
    ///
    /// The first start enters the initial state, running the entry actions from the outermost state
    /// down to the resolved leaf. Starting again after `stop` resumes the frozen leaf without entering
    /// anything. Starting a running machine does nothing.
    pub fn start(&mut self, executor: &mut dyn ActionExecutor) -> DoorSensorResult<()> {
        if self.running {
            return Ok(());
        }
        self.running = true;

        if self.current.is_some() {
            debug!("Resuming state machine in {:?}", self.current);
            return Ok(());
        }

        let leaf = self.resolve_leaf(self.graph.initial_state());
        self.current = Some(leaf);
        self.record_history(leaf);
        debug!("State machine started in {:?}", leaf);

        let mut first_error = None;
        for state in self.graph.path_to_root(leaf).into_iter().rev() {
            run_actions(executor, self.graph.entry_actions(state), &mut first_error);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stops accepting events. The active leaf and the history are kept.
    pub fn stop(&mut self) {
        if self.running {
            debug!("State machine stopped in {:?}", self.current);
        }
        self.running = false;
    }

    /// Dispatches `event` to the active leaf.
    ///
    /// Events without a registered transition are ignored. When an action fails, the state change is
    /// kept, the remaining actions still run and the first error is returned.
    pub fn fire(&mut self, event: SensorEvent, executor: &mut dyn ActionExecutor) -> DoorSensorResult<FireOutcome> {
        let source = match (self.running, self.current) {
            (true, Some(source)) => source,
            _ => {
                debug!("Event {:?} received while the state machine is not running", event);
                return Ok(FireOutcome::NotRunning);
            }
        };

        let (handled_by, transition) = match self.graph.find_transition(source, event) {
            Some((handled_by, transition)) => (handled_by, transition.clone()),
            None => {
                debug!("Event {:?} ignored in {:?}", event, source);
                return Ok(FireOutcome::Ignored { state: source, event });
            }
        };

        match transition.target {
            Some(target) => self.traverse(source, target, &transition.actions, executor),
            None => {
                let mut first_error = None;
                run_actions(executor, &transition.actions, &mut first_error);
                match first_error {
                    Some(e) => Err(e),
                    None => Ok(FireOutcome::Handled { state: source, handled_by }),
                }
            }
        }
    }

    /// Moves the machine to `target` without going through the transition table.
    ///
    /// Exit and entry actions and the history bookkeeping apply as for a regular transition, so a
    /// composite target resumes its remembered leaf.
    pub fn transition_to(&mut self, target: SensorState, executor: &mut dyn ActionExecutor) -> DoorSensorResult<FireOutcome> {
        match (self.running, self.current) {
            (true, Some(source)) => self.traverse(source, target, &[], executor),
            _ => Ok(FireOutcome::NotRunning),
        }
    }

    fn traverse(
        &mut self,
        source: SensorState,
        target: SensorState,
        actions: &[SensorAction],
        executor: &mut dyn ActionExecutor,
    ) -> DoorSensorResult<FireOutcome> {
        self.record_history(source);
        let target_leaf = self.resolve_leaf(target);
        let source_path = self.graph.path_to_root(source);
        let target_path = self.graph.path_to_root(target_leaf);

        let (exited, entered): (Vec<SensorState>, Vec<SensorState>) = if source == target_leaf {
            (vec![source], vec![source])
        } else {
            (
                source_path.iter().copied().filter(|s| !target_path.contains(s)).collect(),
                target_path.iter().rev().copied().filter(|s| !source_path.contains(s)).collect(),
            )
        };

        let mut first_error = None;
        for state in &exited {
            run_actions(executor, self.graph.exit_actions(*state), &mut first_error);
        }
        self.current = Some(target_leaf);
        self.record_history(target_leaf);
        debug!("{:?} -> {:?} (exited {:?}, entered {:?})", source, target_leaf, exited, entered);

        run_actions(executor, actions, &mut first_error);
        for state in &entered {
            run_actions(executor, self.graph.entry_actions(*state), &mut first_error);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(FireOutcome::Transitioned { from: source, to: target_leaf }),
        }
    }

    /// Resolves a possibly composite state to the leaf that becomes active when it is entered
    fn resolve_leaf(&self, state: SensorState) -> SensorState {
        let mut resolved = state;
        while let Some(hierarchy) = self.graph.hierarchy(resolved) {
            resolved = match hierarchy.history_type {
                HistoryType::None => hierarchy.initial_sub_state,
                HistoryType::Shallow | HistoryType::Deep => self.history
                    .get(&resolved)
                    .copied()
                    .unwrap_or(hierarchy.initial_sub_state),
            };
        }
        resolved
    }

    /// Remembers `leaf` in every composite containing it. Called whenever a leaf becomes active, so
    /// the history of an active composite always names its current leaf.
    fn record_history(&mut self, leaf: SensorState) {
        let path = self.graph.path_to_root(leaf);
        for window in path.windows(2) {
            let (child, composite) = (window[0], window[1]);
            match self.graph.hierarchy(composite).map(|h| h.history_type) {
                Some(HistoryType::Deep) => {
                    self.history.insert(composite, leaf);
                }
                Some(HistoryType::Shallow) => {
                    self.history.insert(composite, child);
                }
                Some(HistoryType::None) | None => {}
            }
        }
    }

    pub fn current_state(&self) -> Option<SensorState> {
        self.current
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The state `composite` resumes when re-entered, if it has been left before
    pub fn history_of(&self, composite: SensorState) -> Option<SensorState> {
        self.history.get(&composite).copied()
    }

    /// All recorded history values in state declaration order
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        SensorState::ALL
            .into_iter()
            .filter_map(|composite| {
                self.history_of(composite).map(|last_active| HistoryEntry { composite, last_active })
            })
            .collect()
    }
}

fn run_actions(executor: &mut dyn ActionExecutor, actions: &[SensorAction], first_error: &mut Option<DoorSensorError>) {
    for action in actions {
        if let Err(e) = executor.execute(*action) {
            error!("Action {:?} failed: {}", action, e);
            if first_error.is_none() {
                *first_error = Some(e);
            }
        }
    }
}
