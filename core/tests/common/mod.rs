// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::RwLock;
use sequor::{
  BranchCondition, BranchingSequence, SequenceBuilder, SharedVariable, Signal, Step, StepId, StepStatus,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Event recording ---

/// Subscribes a recorder to a step's event stream; the returned handle
/// accumulates every emitted status in order.
pub fn record_events(step: &Step) -> Arc<RwLock<Vec<StepStatus>>> {
  let log = Arc::new(RwLock::new(Vec::new()));
  let sink = log.clone();
  step.events().subscribe(move |status| {
    sink.write().push(*status);
  });
  log
}

/// Counts emissions of a transition side-effect signal.
pub fn count_emissions(signal: &Signal<()>) -> Arc<AtomicUsize> {
  let counter = Arc::new(AtomicUsize::new(0));
  let sink = counter.clone();
  signal.subscribe(move |()| {
    sink.fetch_add(1, Ordering::SeqCst);
  });
  counter
}

// --- Atomic counters for checking emission counts across a run ---
pub static SIGNAL_EMIT_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static STEP_EVENT_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  SIGNAL_EMIT_COUNTER.store(0, Ordering::SeqCst);
  STEP_EVENT_COUNTER.store(0, Ordering::SeqCst);
}

// --- Common fixtures ---

/// Ids of the four-step tutorial graph used by the end-to-end tests.
pub struct TutorialGraph {
  pub sequence: BranchingSequence,
  pub intro: StepId,
  pub choose_left: StepId,
  pub choose_right: StepId,
  pub end: StepId,
  pub used_left_hand: SharedVariable,
}

/// Builds the tutorial graph from the end-to-end scenarios:
/// `Intro --(always)--> ChooseLeft`,
/// `ChooseLeft --(usedLeftHand == true)--> End, --(always)--> ChooseRight`,
/// `ChooseRight --(always)--> End`, `End` has no group.
pub fn tutorial_graph(used_left_hand_initial: bool) -> TutorialGraph {
  let used_left_hand = SharedVariable::new("usedLeftHand", used_left_hand_initial);

  let mut builder = SequenceBuilder::new();
  let intro = builder.step("Intro");
  let choose_left = builder.step("ChooseLeft");
  let choose_right = builder.step("ChooseRight");
  let end = builder.step("End");
  builder.entry(intro);
  builder
    .group(intro)
    .otherwise("intro done", Some(choose_left))
    .done();
  builder
    .group(choose_left)
    .transition(
      "left hand used",
      BranchCondition::when(Arc::new(used_left_hand.clone())).equals(true),
      Some(end),
    )
    .otherwise("fall through", Some(choose_right))
    .done();
  builder.group(choose_right).otherwise("right done", Some(end)).done();

  TutorialGraph {
    sequence: builder.build(),
    intro,
    choose_left,
    choose_right,
    end,
    used_left_hand,
  }
}

/// A two-step cycle `A --(always)--> B --(always)--> A`.
pub fn cycle_graph() -> (BranchingSequence, StepId, StepId) {
  let mut builder = SequenceBuilder::new();
  let a = builder.step("A");
  let b = builder.step("B");
  builder.entry(a);
  builder.group(a).otherwise("to b", Some(b)).done();
  builder.group(b).otherwise("back to a", Some(a)).done();
  (builder.build(), a, b)
}
