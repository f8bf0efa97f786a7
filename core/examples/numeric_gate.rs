// sequor_core/examples/numeric_gate.rs

use sequor::{Advance, BranchCondition, SequenceBuilder, SharedVariable, Signal};
use std::sync::Arc;
use tracing::info;

// A score gate: the Practice step loops on itself until the host-owned
// score reaches 10, then a signalled transition lets the player through.
// Demonstrates live external mutation: the engine reads the variable at
// each evaluation, so the same transition can resolve differently as the
// score changes.

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Numeric Gate Example ---");

  let score = SharedVariable::new("score", 0i64);

  let mut builder = SequenceBuilder::new();
  let practice = builder.step("Practice");
  let cleared = builder.step("Cleared");
  builder.entry(practice);

  let gate_open = Arc::new(Signal::new());
  builder
    .group(practice)
    .transition_with_signal(
      "score gate",
      BranchCondition::when(Arc::new(score.clone())).at_least(10i64),
      Some(cleared),
      gate_open.clone(),
    )
    .otherwise("try again", Some(practice))
    .done();
  builder.group(cleared).otherwise("done", None).done();

  let sequence = builder.build();

  // An unrelated listener (an audio cue, say) on the gate signal.
  gate_open.subscribe(|()| info!("*chime* gate opened"));

  sequence.begin().expect("sequence should start");

  // Each attempt earns 4 points; the first two attempts fall through the
  // gate condition and loop Practice back onto itself.
  for attempt in 1..=3i64 {
    score.set(attempt * 4).unwrap();
    info!(attempt, score = attempt * 4, "Attempt finished.");
    match sequence.complete_step(practice) {
      Advance::Moved(id) if id == practice => info!("Score too low; practicing again."),
      Advance::Moved(id) if id == cleared => info!("Gate cleared!"),
      other => info!(?other, "Unexpected advance"),
    }
  }

  assert_eq!(sequence.current_step(), Some(cleared));
  assert_eq!(sequence.complete_step(cleared), Advance::Ended);
  info!("Sequence ended.");
}
