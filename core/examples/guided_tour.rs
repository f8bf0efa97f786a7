// sequor_core/examples/guided_tour.rs

use sequor::{Advance, BranchCondition, SequenceBuilder, SequenceState, SharedVariable, StepStatus};
use std::sync::Arc;
use tracing::info;

// A four-beat VR tutorial: the path forks on which hand the player used.
//
//   Intro --(always)--> ChooseLeft
//   ChooseLeft --(usedLeftHand == true)--> End
//              --(always)-------------> ChooseRight
//   ChooseRight --(always)--> End
//   End: no outgoing group; completing it ends the sequence.

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Guided Tour Example ---");

  // The host owns the variables; the engine only reads them.
  let used_left_hand = SharedVariable::new("usedLeftHand", false);

  let mut builder = SequenceBuilder::new();
  let intro = builder.step("Intro");
  let choose_left = builder.step("ChooseLeft");
  let choose_right = builder.step("ChooseRight");
  let end = builder.step("End");
  builder.entry(intro);

  builder.group(intro).otherwise("intro done", Some(choose_left)).done();
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

  let sequence = builder.build();
  sequence.validate().expect("tour graph should be well-formed");

  // An "action" collaborator: watch the ChooseLeft step go live.
  sequence
    .step(choose_left)
    .unwrap()
    .events()
    .subscribe(|status: &StepStatus| {
      if *status == StepStatus::Started {
        info!("ChooseLeft is live; waiting for the player to grab something...");
      }
    });

  sequence.begin().expect("sequence should start");

  // The player works through the intro beat.
  assert_eq!(sequence.complete_step(intro), Advance::Moved(choose_left));

  // The player grabbed with the right hand: the conditional branch is
  // false and the default transition falls through to ChooseRight.
  assert_eq!(sequence.complete_step(choose_left), Advance::Moved(choose_right));
  info!("Player used the right hand; detouring through ChooseRight.");

  assert_eq!(sequence.complete_step(choose_right), Advance::Moved(end));
  assert_eq!(sequence.complete_step(end), Advance::Ended);
  assert_eq!(sequence.state(), SequenceState::Ended);
  info!("Tour finished.");

  // Second run: reset, and this time the left hand is used, so the
  // sequence skips ChooseRight entirely.
  sequence.reset();
  used_left_hand.set(true).unwrap();

  sequence.begin().expect("sequence should restart after reset");
  sequence.complete_step(intro);
  assert_eq!(sequence.complete_step(choose_left), Advance::Moved(end));
  info!("Second run took the left-hand shortcut straight to End.");
}
