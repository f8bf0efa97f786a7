// sequor_core/src/sequence/transition.rs

//! Conditioned edges between steps and the ordered, first-match-wins
//! resolution over them.

use std::sync::Arc;
use tracing::{event, Level};

use crate::condition::BranchCondition;
use crate::sequence::step::StepId;
use crate::signal::Signal;

/// A directed, conditioned edge out of a step.
///
/// The label is diagnostic only and never evaluated. A `target` of `None`
/// means the sequence ends when this transition is taken. The optional
/// signal is broadcast to unrelated listeners (analytics, audio cues) when
/// the transition is taken; it is not part of the evaluation logic.
pub struct StepTransition {
  label: String,
  condition: BranchCondition,
  target: Option<StepId>,
  signal: Option<Arc<Signal<()>>>,
}

impl StepTransition {
  pub fn new(label: impl Into<String>, condition: BranchCondition, target: Option<StepId>) -> Self {
    Self {
      label: label.into(),
      condition,
      target,
      signal: None,
    }
  }

  /// Attaches a side-effect signal emitted whenever this transition is
  /// taken.
  pub fn with_signal(mut self, signal: Arc<Signal<()>>) -> Self {
    self.signal = Some(signal);
    self
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn condition(&self) -> &BranchCondition {
    &self.condition
  }

  pub fn target(&self) -> Option<StepId> {
    self.target
  }

  pub(crate) fn emit_signal(&self) {
    if let Some(signal) = &self.signal {
      event!(Level::DEBUG, transition = %self.label, "Broadcasting transition signal.");
      signal.emit(&());
    }
  }
}

impl std::fmt::Debug for StepTransition {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepTransition")
      .field("label", &self.label)
      .field("condition", &self.condition)
      .field("target", &self.target)
      .field("has_signal", &self.signal.is_some())
      .finish()
  }
}

/// The ordered outgoing edges of one source step.
///
/// Order is semantically significant: resolution walks the authored list
/// and the first transition whose condition evaluates `true` wins. Authors
/// are expected to place a final unconditional transition last as the
/// default. An empty group means the step has no successor; completing it
/// ends the sequence.
#[derive(Debug)]
pub struct TransitionGroup {
  source: StepId,
  transitions: Vec<StepTransition>,
}

impl TransitionGroup {
  pub fn new(source: StepId) -> Self {
    Self {
      source,
      transitions: Vec::new(),
    }
  }

  pub fn source(&self) -> StepId {
    self.source
  }

  pub fn push(&mut self, transition: StepTransition) {
    self.transitions.push(transition);
  }

  pub fn transitions(&self) -> &[StepTransition] {
    &self.transitions
  }

  pub fn is_empty(&self) -> bool {
    self.transitions.is_empty()
  }

  /// Resolves the group against the current variable state.
  ///
  /// Deterministic, order-sensitive, first-match-wins: for a fixed set of
  /// variable values, resolving twice yields the same transition. Returns
  /// `None` when nothing matches (including an empty group), which the
  /// orchestrator treats as "sequence ends here".
  pub fn resolve(&self) -> Option<&StepTransition> {
    for (index, transition) in self.transitions.iter().enumerate() {
      if transition.condition().evaluate() {
        event!(
          Level::DEBUG,
          source = %self.source,
          transition = %transition.label(),
          index,
          "Transition matched."
        );
        return Some(transition);
      }
    }
    event!(Level::DEBUG, source = %self.source, "No transition matched.");
    None
  }
}
