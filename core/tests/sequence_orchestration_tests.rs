// tests/sequence_orchestration_tests.rs
mod common; // Reference the common module

use common::*;
use sequor::{
  Advance, BranchCondition, SequenceBuilder, SequenceError, SequenceState, SharedVariable, Signal, StepStatus,
};
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn begin_activates_entry_and_enters_running() {
  setup_tracing();
  let graph = tutorial_graph(false);

  assert_eq!(graph.sequence.state(), SequenceState::NotStarted);
  assert_eq!(graph.sequence.current_step(), None);

  let entry = graph.sequence.begin().unwrap();
  assert_eq!(entry, graph.intro);
  assert_eq!(graph.sequence.state(), SequenceState::Running);
  assert_eq!(graph.sequence.current_step(), Some(graph.intro));
  assert_eq!(graph.sequence.step(graph.intro).unwrap().status(), StepStatus::Started);
}

#[test]
fn unconditional_transition_advances_to_next_step() {
  setup_tracing();
  // Scenario 1: completing Intro moves the current step to ChooseLeft.
  let graph = tutorial_graph(false);
  graph.sequence.begin().unwrap();

  let advance = graph.sequence.complete_step(graph.intro);
  assert_eq!(advance, Advance::Moved(graph.choose_left));
  assert_eq!(graph.sequence.current_step(), Some(graph.choose_left));
  assert_eq!(graph.sequence.step(graph.intro).unwrap().status(), StepStatus::Completed);
  assert_eq!(
    graph.sequence.step(graph.choose_left).unwrap().status(),
    StepStatus::Started
  );
}

#[test]
fn false_condition_falls_through_to_default() {
  setup_tracing();
  // Scenario 2: usedLeftHand = false, so ChooseLeft falls through to the
  // unconditional default and advances to ChooseRight.
  let graph = tutorial_graph(false);
  graph.sequence.begin().unwrap();
  graph.sequence.complete_step(graph.intro);

  let advance = graph.sequence.complete_step(graph.choose_left);
  assert_eq!(advance, Advance::Moved(graph.choose_right));
}

#[test]
fn satisfied_condition_takes_the_branch() {
  setup_tracing();
  // Scenario 3: usedLeftHand = true skips ChooseRight entirely.
  let graph = tutorial_graph(true);
  graph.sequence.begin().unwrap();
  graph.sequence.complete_step(graph.intro);

  let advance = graph.sequence.complete_step(graph.choose_left);
  assert_eq!(advance, Advance::Moved(graph.end));
  assert_eq!(
    graph.sequence.step(graph.choose_right).unwrap().status(),
    StepStatus::Inactive
  );
}

#[test]
fn dead_end_step_ends_the_sequence() {
  setup_tracing();
  // Scenario 4: End has no transition group; completing it ends the run.
  let graph = tutorial_graph(true);
  graph.sequence.begin().unwrap();
  graph.sequence.complete_step(graph.intro);
  graph.sequence.complete_step(graph.choose_left);

  let advance = graph.sequence.complete_step(graph.end);
  assert_eq!(advance, Advance::Ended);
  assert_eq!(graph.sequence.state(), SequenceState::Ended);
  assert_eq!(graph.sequence.current_step(), None);
}

#[test]
fn begin_twice_is_rejected_and_state_unchanged() {
  setup_tracing();
  // Scenario 6.
  let graph = tutorial_graph(false);
  graph.sequence.begin().unwrap();
  graph.sequence.complete_step(graph.intro);

  let result = graph.sequence.begin();
  assert!(matches!(result, Err(SequenceError::AlreadyRunning { .. })));
  assert_eq!(graph.sequence.state(), SequenceState::Running);
  assert_eq!(graph.sequence.current_step(), Some(graph.choose_left));
}

#[test]
fn begin_without_entry_is_rejected() {
  setup_tracing();
  let sequence = SequenceBuilder::new().build();

  let result = sequence.begin();
  assert!(matches!(result, Err(SequenceError::MissingEntryStep)));
  assert_eq!(sequence.state(), SequenceState::NotStarted);
}

#[test]
fn stale_completion_signals_are_ignored() {
  setup_tracing();
  let graph = tutorial_graph(false);

  // Before begin: nothing is running.
  assert_eq!(graph.sequence.complete_step(graph.intro), Advance::Ignored);

  graph.sequence.begin().unwrap();
  // A signal for a step that is not current is stale.
  assert_eq!(graph.sequence.complete_step(graph.choose_left), Advance::Ignored);

  let events = record_events(graph.sequence.step(graph.intro).unwrap());
  graph.sequence.complete_step(graph.intro);
  // A duplicate signal for the already-completed step is stale too, and
  // produces no further advancement or events.
  assert_eq!(graph.sequence.complete_step(graph.intro), Advance::Ignored);
  assert_eq!(graph.sequence.current_step(), Some(graph.choose_left));
  assert_eq!(*events.read(), vec![StepStatus::Completed]);
}

#[test]
fn no_matching_transition_ends_the_sequence() {
  setup_tracing();
  let flag = SharedVariable::new("flag", false);
  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  let b = builder.step("B");
  builder.entry(a);
  builder
    .group(a)
    .transition(
      "only if flag",
      BranchCondition::when(Arc::new(flag.clone())).equals(true),
      Some(b),
    )
    .done();
  let sequence = builder.build();

  sequence.begin().unwrap();
  assert_eq!(sequence.complete_step(a), Advance::Ended);
  assert_eq!(sequence.state(), SequenceState::Ended);
}

#[test]
fn transition_without_target_ends_the_sequence() {
  setup_tracing();
  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  builder.entry(a);
  builder.group(a).otherwise("finish", None).done();
  let sequence = builder.build();

  sequence.begin().unwrap();
  assert_eq!(sequence.complete_step(a), Advance::Ended);
  assert_eq!(sequence.current_step(), None);
}

#[test]
fn cycles_reactivate_completed_steps() {
  setup_tracing();
  let (sequence, a, b) = cycle_graph();
  let a_events = record_events(sequence.step(a).unwrap());

  sequence.begin().unwrap();
  // Drive A -> B -> A -> B -> A: three activations of A.
  assert_eq!(sequence.complete_step(a), Advance::Moved(b));
  assert_eq!(sequence.complete_step(b), Advance::Moved(a));
  assert_eq!(sequence.complete_step(a), Advance::Moved(b));
  assert_eq!(sequence.complete_step(b), Advance::Moved(a));

  assert_eq!(sequence.state(), SequenceState::Running);
  assert_eq!(sequence.step(a).unwrap().status(), StepStatus::Started);
  let starts = a_events
    .read()
    .iter()
    .filter(|status| **status == StepStatus::Started)
    .count();
  assert_eq!(starts, 3);
}

#[test]
fn reset_returns_everything_to_initial_state() {
  setup_tracing();
  let graph = tutorial_graph(false);
  graph.sequence.begin().unwrap();
  graph.sequence.complete_step(graph.intro);

  graph.sequence.reset();
  assert_eq!(graph.sequence.state(), SequenceState::NotStarted);
  assert_eq!(graph.sequence.current_step(), None);
  for step in graph.sequence.steps() {
    assert_eq!(step.status(), StepStatus::Inactive);
  }

  // A reset sequence can run again from the entry step.
  graph.sequence.begin().unwrap();
  assert_eq!(graph.sequence.current_step(), Some(graph.intro));
}

#[test]
#[serial]
fn transition_signal_fires_between_match_and_activation() {
  setup_tracing();
  reset_counters();

  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  let b = builder.step("B");
  builder.entry(a);

  let signal = Arc::new(Signal::new());
  builder
    .group(a)
    .transition_with_signal("a to b", BranchCondition::unconditional(), Some(b), signal.clone())
    .done();
  let sequence = Arc::new(builder.build());

  // The listener observes the world mid-transition: the match is decided,
  // but the target has not activated and the old step is still current.
  let observed = Arc::new(parking_lot::RwLock::new(Vec::new()));
  {
    let sequence = sequence.clone();
    let observed = observed.clone();
    signal.subscribe(move |()| {
      SIGNAL_EMIT_COUNTER.fetch_add(1, Ordering::SeqCst);
      observed
        .write()
        .push((sequence.current_step(), sequence.step(b).unwrap().status()));
    });
  }

  sequence.begin().unwrap();
  assert_eq!(sequence.complete_step(a), Advance::Moved(b));

  assert_eq!(SIGNAL_EMIT_COUNTER.load(Ordering::SeqCst), 1);
  assert_eq!(*observed.read(), vec![(Some(a), StepStatus::Inactive)]);
}

#[test]
#[serial]
fn action_collaborators_attach_on_started_and_drive_completion() {
  setup_tracing();
  reset_counters();

  let (sequence, a, b) = cycle_graph();
  let sequence = Arc::new(sequence);

  // A minimal "action": counts every event on A, the way a monitoring
  // component would re-arm each time the step goes live.
  {
    let counter = STEP_EVENT_COUNTER.clone();
    sequence.step(a).unwrap().events().subscribe(move |_status| {
      counter.fetch_add(1, Ordering::SeqCst);
    });
  }

  sequence.begin().unwrap();
  sequence.complete_step(a);
  sequence.complete_step(b);

  // Started, Completed, Started again after the cycle returned.
  assert_eq!(STEP_EVENT_COUNTER.load(Ordering::SeqCst), 3);
}

#[test]
fn complete_current_drives_the_live_step() {
  setup_tracing();
  let graph = tutorial_graph(false);
  assert_eq!(graph.sequence.complete_current(), Advance::Ignored);

  graph.sequence.begin().unwrap();
  assert_eq!(graph.sequence.complete_current(), Advance::Moved(graph.choose_left));
  assert_eq!(graph.sequence.complete_current(), Advance::Moved(graph.choose_right));
  assert_eq!(graph.sequence.complete_current(), Advance::Moved(graph.end));
  assert_eq!(graph.sequence.complete_current(), Advance::Ended);
  assert_eq!(graph.sequence.complete_current(), Advance::Ignored);
}

#[test]
fn validate_reports_authoring_mistakes() {
  setup_tracing();
  let score = SharedVariable::new("score", 1i64);

  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  builder.step("A"); // duplicate name
  builder.entry(a);
  builder
    .group(a)
    .transition(
      "bad condition",
      BranchCondition::when(Arc::new(score)), // literal never set
      None,
    )
    .done();
  let sequence = builder.build();

  assert!(sequence.validate().is_err());

  // A well-formed graph validates cleanly.
  let graph = tutorial_graph(false);
  assert!(graph.sequence.validate().is_ok());
}

#[test]
fn validate_flags_dangling_targets() {
  setup_tracing();
  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  builder.entry(a);
  builder
    .group(a)
    .transition(
      "dangling",
      BranchCondition::unconditional(),
      Some(sequor::StepId::from_index(99)),
    )
    .done();
  let sequence = builder.build();

  assert!(matches!(sequence.validate(), Err(SequenceError::UnknownStep { .. })));

  // At runtime the broken target degrades to termination, not a crash.
  sequence.begin().unwrap();
  assert_eq!(sequence.complete_step(a), Advance::Ended);
}
