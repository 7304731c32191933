mod common;

use common::{machine, machine_with, started_machine, Call, NORMAL_LEVEL, PANIC_LEVEL};
use vhpt_door_sensor::errors::DoorSensorError;
use vhpt_door_sensor::models::{DoorStatus, HistoryEntry, Mode, SensorEvent, SensorState};
use vhpt_door_sensor::state_machine::FireOutcome;
use vhpt_door_sensor::state_management::DoorStateMachine;

fn log(message: &str) -> Call {
    Call::Log(message.to_string())
}

#[test]
fn test_start_enters_door_closed_in_normal_mode() {
    let (mut machine, recorder) = machine();
    assert_eq!(machine.current_state(), None);
    assert!(!machine.is_running());

    machine.start().unwrap();

    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInNormalMode));
    assert_eq!(machine.mode(), Some(Mode::Normal));
    assert_eq!(machine.door_status(), Some(DoorStatus::Closed));
    assert!(!machine.in_panic_mode());
    assert!(machine.is_running());
    assert!(recorder.calls().is_empty(), "Starting must not call any collaborator");
}

#[test]
fn test_events_before_start_are_not_processed() {
    let (mut machine, recorder) = machine();

    let outcome = machine.fire(SensorEvent::DoorOpened).unwrap();

    assert_eq!(outcome, FireOutcome::NotRunning);
    assert_eq!(machine.current_state(), None);
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_door_opened_in_normal_mode() {
    let (mut machine, recorder) = started_machine();

    let outcome = machine.notify_door_opened().unwrap();

    assert_eq!(outcome, FireOutcome::Transitioned {
        from: SensorState::DoorClosedInNormalMode,
        to: SensorState::DoorOpenInNormalMode,
    });
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInNormalMode));
    assert_eq!(recorder.calls(), vec![log("door is open!")]);
    assert!(recorder.travels().is_empty(), "Opening the door must not dispatch travel");
}

#[test]
fn test_door_closed_in_normal_mode_dispatches_travel_before_logging() {
    let (mut machine, recorder) = started_machine();

    machine.notify_door_opened().unwrap();
    machine.notify_door_closed().unwrap();

    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInNormalMode));
    assert_eq!(recorder.calls(), vec![
        log("door is open!"),
        Call::Resolve(false),
        Call::TravelTo(NORMAL_LEVEL),
        log("door is closed!"),
    ]);
}

#[test]
fn test_black_hole_detected_enters_panic_mode_once() {
    let (mut machine, recorder) = started_machine();

    let outcome = machine.notify_black_hole_detected().unwrap();

    assert_eq!(outcome, FireOutcome::Transitioned {
        from: SensorState::DoorClosedInNormalMode,
        to: SensorState::DoorClosedInPanicMode,
    });
    assert!(machine.in_panic_mode());
    assert_eq!(machine.mode(), Some(Mode::Panic));
    assert_eq!(recorder.calls(), vec![log("black hole detected! PANIC!!!")]);

    // A second detection is accepted by PanicMode without any effect
    let outcome = machine.notify_black_hole_detected().unwrap();
    assert_eq!(outcome, FireOutcome::Handled {
        state: SensorState::DoorClosedInPanicMode,
        handled_by: SensorState::PanicMode,
    });
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));
    assert_eq!(recorder.len(), 1, "Repeated detection must not log again");
}

#[test]
fn test_black_hole_detected_is_idempotent_with_door_open() {
    let (mut machine, recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    let calls = recorder.len();

    for _ in 0..3 {
        let outcome = machine.notify_black_hole_detected().unwrap();
        assert!(matches!(outcome, FireOutcome::Handled { handled_by: SensorState::PanicMode, .. }));
    }

    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    assert_eq!(recorder.len(), calls);
}

#[test]
fn test_panic_flag_is_observed_when_door_opened_before_panic() {
    let (mut machine, recorder) = started_machine();

    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();
    machine.notify_door_closed().unwrap();

    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));
    assert_eq!(recorder.calls(), vec![
        log("door is open!"),
        log("black hole detected! PANIC!!!"),
        Call::Resolve(true),
        Call::TravelTo(PANIC_LEVEL),
        log("door is closed! PANIC!!!"),
    ]);
}

#[test]
fn test_door_cycle_in_panic_mode() {
    let (mut machine, recorder) = started_machine();
    machine.notify_black_hole_detected().unwrap();

    machine.notify_door_opened().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    machine.notify_door_closed().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));

    assert_eq!(recorder.calls(), vec![
        log("black hole detected! PANIC!!!"),
        log("door is open! PANIC!!!"),
        Call::Resolve(true),
        Call::TravelTo(PANIC_LEVEL),
        log("door is closed! PANIC!!!"),
    ]);
}

#[test]
fn test_unhandled_events_are_ignored_in_every_leaf() {
    let cases: [(&[SensorEvent], SensorState, SensorEvent); 4] = [
        (&[], SensorState::DoorClosedInNormalMode, SensorEvent::DoorClosed),
        (&[SensorEvent::DoorOpened], SensorState::DoorOpenInNormalMode, SensorEvent::DoorOpened),
        (&[SensorEvent::BlackHoleDetected], SensorState::DoorClosedInPanicMode, SensorEvent::DoorClosed),
        (&[SensorEvent::DoorOpened, SensorEvent::BlackHoleDetected], SensorState::DoorOpenInPanicMode, SensorEvent::DoorOpened),
    ];

    for (path, leaf, unhandled) in cases {
        let (mut machine, recorder) = started_machine();
        for event in path {
            machine.fire(*event).unwrap();
        }
        assert_eq!(machine.current_state(), Some(leaf));
        let in_panic_mode = machine.in_panic_mode();
        let calls = recorder.len();

        let outcome = machine.fire(unhandled).unwrap();

        assert_eq!(outcome, FireOutcome::Ignored { state: leaf, event: unhandled });
        assert_eq!(machine.current_state(), Some(leaf), "{:?} must not leave {:?}", unhandled, leaf);
        assert_eq!(machine.in_panic_mode(), in_panic_mode);
        assert_eq!(recorder.len(), calls, "{:?} in {:?} must not call any collaborator", unhandled, leaf);
    }
}

#[test]
fn test_history_resumes_last_leaf_of_normal_mode() {
    let (mut machine, _recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();
    machine.notify_door_closed().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));
    assert_eq!(machine.history_of(SensorState::NormalMode), Some(SensorState::DoorOpenInNormalMode));

    let outcome = machine.transition_to(SensorState::NormalMode).unwrap();

    assert_eq!(outcome, FireOutcome::Transitioned {
        from: SensorState::DoorClosedInPanicMode,
        to: SensorState::DoorOpenInNormalMode,
    });
    assert!(machine.in_panic_mode(), "The panic flag is never reset");
}

#[test]
fn test_unvisited_mode_is_entered_through_its_initial_sub_state() {
    let (mut machine, recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    assert_eq!(machine.history_of(SensorState::PanicMode), None);

    let outcome = machine.transition_to(SensorState::PanicMode).unwrap();

    assert_eq!(outcome, FireOutcome::Transitioned {
        from: SensorState::DoorOpenInNormalMode,
        to: SensorState::DoorClosedInPanicMode,
    });
    assert!(machine.in_panic_mode());
    assert_eq!(recorder.logs().last().map(String::as_str), Some("black hole detected! PANIC!!!"));
}

#[test]
fn test_history_of_panic_mode_survives_a_return_to_normal_mode() {
    let (mut machine, recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));

    machine.transition_to(SensorState::NormalMode).unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInNormalMode));
    machine.transition_to(SensorState::PanicMode).unwrap();

    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    let panic_logs = recorder.logs().iter().filter(|m| m.as_str() == "black hole detected! PANIC!!!").count();
    assert_eq!(panic_logs, 2, "Re-entering PanicMode from outside runs its entry actions again");
}

#[test]
fn test_reentering_the_active_mode_keeps_the_current_leaf() {
    let (mut machine, recorder) = started_machine();
    machine.notify_black_hole_detected().unwrap();
    machine.notify_door_opened().unwrap();
    machine.notify_door_closed().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));
    assert_eq!(machine.history_of(SensorState::PanicMode), Some(SensorState::DoorClosedInPanicMode));
    let calls = recorder.len();

    let outcome = machine.transition_to(SensorState::PanicMode).unwrap();

    assert_eq!(outcome, FireOutcome::Transitioned {
        from: SensorState::DoorClosedInPanicMode,
        to: SensorState::DoorClosedInPanicMode,
    });
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInPanicMode));
    assert_eq!(machine.door_status(), Some(DoorStatus::Closed));
    assert_eq!(recorder.len(), calls, "Re-entering the active leaf must not call any collaborator");
}

#[test]
fn test_history_of_the_active_mode_names_the_current_leaf() {
    let (mut machine, _recorder) = started_machine();
    assert_eq!(machine.history_of(SensorState::NormalMode), Some(SensorState::DoorClosedInNormalMode));

    for event in [SensorEvent::DoorOpened, SensorEvent::DoorClosed, SensorEvent::BlackHoleDetected, SensorEvent::DoorOpened] {
        machine.fire(event).unwrap();
        let current = machine.current_state().unwrap();
        let active_mode = SensorState::composite(current.mode());

        assert_eq!(machine.history_of(active_mode), Some(current));
        let snapshot = machine.snapshot();
        let entry = snapshot.history.iter().find(|entry| entry.composite == active_mode).unwrap();
        assert_eq!(entry.last_active, current, "after {:?}", event);
    }
    assert_eq!(machine.history_of(SensorState::NormalMode), Some(SensorState::DoorClosedInNormalMode));
}

#[test]
fn test_stop_freezes_state_and_start_resumes_it() {
    let (mut machine, recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();
    let calls = recorder.len();

    machine.stop();
    assert!(!machine.is_running());
    assert_eq!(machine.notify_door_closed().unwrap(), FireOutcome::NotRunning);
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    assert!(machine.in_panic_mode());
    assert_eq!(recorder.len(), calls);

    machine.start().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInPanicMode));
    assert_eq!(recorder.len(), calls, "Resuming must not run entry actions again");

    machine.notify_door_closed().unwrap();
    assert_eq!(recorder.travels(), vec![PANIC_LEVEL]);
}

#[test]
fn test_starting_twice_is_harmless() {
    let (mut machine, recorder) = started_machine();
    machine.notify_door_opened().unwrap();

    machine.start().unwrap();

    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInNormalMode));
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_resolver_failure_keeps_the_new_state() {
    let (mut machine, recorder) = machine_with(true, false);
    machine.start().unwrap();
    machine.notify_door_opened().unwrap();

    let result = machine.notify_door_closed();

    assert!(matches!(result, Err(DoorSensorError::ResolutionError(_))));
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInNormalMode));
    assert!(recorder.travels().is_empty(), "Nothing can be dispatched without a level");
    assert_eq!(recorder.logs(), vec!["door is open!".to_string(), "door is closed!".to_string()]);
}

#[test]
fn test_travel_failure_is_reported_and_not_retried() {
    let (mut machine, recorder) = machine_with(false, true);
    machine.start().unwrap();
    machine.notify_door_opened().unwrap();

    let result = machine.notify_door_closed();

    assert!(matches!(result, Err(DoorSensorError::TravelError(_))));
    assert_eq!(machine.current_state(), Some(SensorState::DoorClosedInNormalMode));
    assert_eq!(recorder.travels(), vec![NORMAL_LEVEL], "Travel is attempted exactly once");

    // The machine keeps working after the failure
    machine.notify_door_opened().unwrap();
    assert_eq!(machine.current_state(), Some(SensorState::DoorOpenInNormalMode));
}

#[test]
fn test_snapshot_reports_state_flag_and_history() {
    let (mut machine, _recorder) = started_machine();
    machine.notify_door_opened().unwrap();
    machine.notify_black_hole_detected().unwrap();

    let snapshot = machine.snapshot();

    assert_eq!(snapshot.current_state, Some(SensorState::DoorOpenInPanicMode));
    assert_eq!(snapshot.mode, Some(Mode::Panic));
    assert_eq!(snapshot.door_status, Some(DoorStatus::Open));
    assert!(snapshot.in_panic_mode);
    assert!(snapshot.running);
    assert_eq!(snapshot.history, vec![
        HistoryEntry { composite: SensorState::NormalMode, last_active: SensorState::DoorOpenInNormalMode },
        HistoryEntry { composite: SensorState::PanicMode, last_active: SensorState::DoorOpenInPanicMode },
    ]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["current_state"], "DoorOpenInPanicMode");
    assert_eq!(json["in_panic_mode"], true);
}

#[test]
fn test_definition_describes_the_door_hierarchy() {
    let graph = DoorStateMachine::definition().build().unwrap();

    assert_eq!(graph.initial_state(), SensorState::NormalMode);
    for leaf in SensorState::LEAVES {
        assert_eq!(graph.ancestors(leaf), &[SensorState::composite(leaf.mode())]);
        assert!(!graph.is_composite(leaf));
    }
    assert!(graph.is_composite(SensorState::NormalMode));
    assert!(graph.is_composite(SensorState::PanicMode));
    assert_eq!(
        graph.handled_events(SensorState::DoorClosedInPanicMode),
        vec![SensorEvent::BlackHoleDetected, SensorEvent::DoorOpened],
    );
    assert_eq!(
        graph.handled_events(SensorState::DoorClosedInNormalMode),
        vec![SensorEvent::BlackHoleDetected, SensorEvent::DoorOpened],
    );
}

#[test]
fn test_leaf_states_combine_mode_and_door_status() {
    for leaf in SensorState::LEAVES {
        let status = leaf.door_status().unwrap();
        assert_eq!(SensorState::leaf(leaf.mode(), status), leaf);
        assert!(!leaf.is_composite());
    }
    assert!(SensorState::PanicMode.is_composite());
    assert_eq!(SensorState::PanicMode.door_status(), None);
    assert_eq!("DoorOpenInPanicMode".parse::<SensorState>().unwrap(), SensorState::DoorOpenInPanicMode);
}
