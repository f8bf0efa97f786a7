// sequor_core/src/sequence/engine.rs

//! Contains `BranchingSequence`, the orchestrator that owns the step
//! arena, the transition groups, and the execution state machine.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{event, instrument, Level};

use crate::error::{SequenceError, SequenceResult};
use crate::sequence::step::{Step, StepId};
use crate::sequence::transition::TransitionGroup;

/// Execution state of a sequence: `NotStarted → Running → Ended`, with
/// `reset()` returning to `NotStarted` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
  NotStarted,
  Running,
  Ended,
}

impl std::fmt::Display for SequenceState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      SequenceState::NotStarted => "NotStarted",
      SequenceState::Running => "Running",
      SequenceState::Ended => "Ended",
    };
    f.write_str(name)
  }
}

/// Outcome of delivering a completion signal to the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
  /// A transition was taken; the contained step is now the current one.
  Moved(StepId),
  /// The sequence terminated: dead end, no matching transition, or a
  /// matched transition with no target.
  Ended,
  /// The signal was stale or otherwise not actionable (sequence not
  /// running, step not current, step not `Started`). Silent no-op.
  Ignored,
}

/// The orchestrator of a step graph.
///
/// Owns the full step set (arena, insertion order preserved), the entry
/// step, and the transition groups keyed by source step. Constructed once
/// at authoring time via [`SequenceBuilder`](crate::SequenceBuilder); the
/// graph is immutable during a run; only step status, the current-step
/// pointer, and the externally-owned variables change.
///
/// The engine never completes a step on its own: the host (or an action
/// collaborator observing the live step) delivers discrete completion
/// signals through [`complete_step`](Self::complete_step), one at a time.
/// Within one sequence only one step is ever `Started`.
pub struct BranchingSequence {
  steps: Vec<Step>,
  entry: Option<StepId>,
  groups: HashMap<StepId, TransitionGroup>,
  state: RwLock<SequenceState>,
  current: RwLock<Option<StepId>>,
}

impl BranchingSequence {
  pub(crate) fn new(steps: Vec<Step>, entry: Option<StepId>, groups: HashMap<StepId, TransitionGroup>) -> Self {
    Self {
      steps,
      entry,
      groups,
      state: RwLock::new(SequenceState::NotStarted),
      current: RwLock::new(None),
    }
  }

  // --- Control surface ---

  /// Starts the sequence: activates the entry step and enters `Running`.
  ///
  /// Valid only from `NotStarted` with an entry step set; otherwise a
  /// configuration error is returned and the sequence remains in its
  /// prior state.
  #[instrument(name = "BranchingSequence::begin", skip(self), fields(num_steps = self.steps.len()), err(Display))]
  pub fn begin(&self) -> SequenceResult<StepId> {
    {
      let state = self.state.read();
      if *state != SequenceState::NotStarted {
        return Err(SequenceError::AlreadyRunning {
          state: state.to_string(),
        });
      }
    }
    let entry = self.entry.ok_or(SequenceError::MissingEntryStep)?;
    let step = self.steps.get(entry.index()).ok_or_else(|| SequenceError::UnknownStep {
      step: entry.to_string(),
    })?;

    *self.state.write() = SequenceState::Running;
    *self.current.write() = Some(entry);
    // Activate after the pointers are in place so observers woken by the
    // Started event see a Running sequence with a current step.
    step.activate();
    event!(Level::INFO, entry = %step.name(), "Sequence started.");
    Ok(entry)
  }

  /// Delivers a "step completed" signal for `id`.
  ///
  /// This is the only way the graph advances. Stale or duplicate signals
  /// (sequence not running, `id` not the current step, step not `Started`)
  /// are silent no-ops and return [`Advance::Ignored`]. An accepted signal
  /// completes the step, resolves its transition group in authored order,
  /// and either activates the first matching target or ends the sequence.
  #[instrument(name = "BranchingSequence::complete_step", skip(self), fields(step = %id))]
  pub fn complete_step(&self, id: StepId) -> Advance {
    if *self.state.read() != SequenceState::Running {
      event!(Level::TRACE, "Completion signal ignored: sequence not running.");
      return Advance::Ignored;
    }
    if *self.current.read() != Some(id) {
      event!(Level::DEBUG, "Completion signal ignored: step is not current.");
      return Advance::Ignored;
    }
    let step = match self.steps.get(id.index()) {
      Some(step) => step,
      None => {
        event!(Level::WARN, "Completion signal ignored: unknown step id.");
        return Advance::Ignored;
      }
    };
    if !step.complete() {
      event!(Level::DEBUG, "Completion signal ignored: step was not started.");
      return Advance::Ignored;
    }
    self.advance_from(id)
  }

  /// Convenience for hosts driving the sequence directly: completes
  /// whichever step is current.
  pub fn complete_current(&self) -> Advance {
    // Copy the pointer out so the read guard is released before
    // complete_step takes the write side.
    let current = *self.current.read();
    match current {
      Some(id) => self.complete_step(id),
      None => Advance::Ignored,
    }
  }

  /// Returns every step to `Inactive`, clears the current-step pointer,
  /// and returns to `NotStarted`. Safe to call from any state.
  pub fn reset(&self) {
    *self.current.write() = None;
    *self.state.write() = SequenceState::NotStarted;
    for step in &self.steps {
      step.deactivate();
    }
    event!(Level::INFO, "Sequence reset.");
  }

  // --- Transition resolution ---

  fn advance_from(&self, completed: StepId) -> Advance {
    let matched = match self.groups.get(&completed) {
      None => {
        event!(Level::DEBUG, step = %completed, "Step has no transition group; sequence ends.");
        return self.finish();
      }
      Some(group) => group.resolve(),
    };

    let transition = match matched {
      None => return self.finish(),
      Some(transition) => transition,
    };

    // Side-effect signal goes out after the match is decided but before
    // the target activates: listeners may still read the about-to-be-
    // superseded step.
    transition.emit_signal();

    let target = match transition.target() {
      None => {
        event!(Level::DEBUG, transition = %transition.label(), "Transition ends the sequence.");
        return self.finish();
      }
      Some(target) => target,
    };

    let step = match self.steps.get(target.index()) {
      Some(step) => step,
      None => {
        // A group referencing a step the sequence does not own is a
        // configuration error; fall back to termination rather than
        // aborting the host.
        event!(Level::WARN, transition = %transition.label(), %target, "Transition targets an unknown step; sequence ends.");
        return self.finish();
      }
    };

    *self.current.write() = Some(target);
    step.activate();
    event!(Level::INFO, step = %step.name(), "Advanced to next step.");
    Advance::Moved(target)
  }

  fn finish(&self) -> Advance {
    *self.current.write() = None;
    *self.state.write() = SequenceState::Ended;
    event!(Level::INFO, "Sequence ended.");
    Advance::Ended
  }

  // --- Queries ---

  pub fn state(&self) -> SequenceState {
    *self.state.read()
  }

  /// The single active step, or `None` before `begin()` and after
  /// termination.
  pub fn current_step(&self) -> Option<StepId> {
    *self.current.read()
  }

  pub fn entry_step(&self) -> Option<StepId> {
    self.entry
  }

  pub fn step(&self, id: StepId) -> Option<&Step> {
    self.steps.get(id.index())
  }

  /// Looks a step up by name. Names are diagnostic; if authors reuse one,
  /// the first match in insertion order is returned (and `validate()`
  /// reports the duplicate).
  pub fn step_by_name(&self, name: &str) -> Option<&Step> {
    self.steps.iter().find(|step| step.name() == name)
  }

  /// All owned steps in insertion order.
  pub fn steps(&self) -> impl Iterator<Item = &Step> {
    self.steps.iter()
  }

  pub fn group(&self, source: StepId) -> Option<&TransitionGroup> {
    self.groups.get(&source)
  }

  // --- Authoring-time validation ---

  /// Checks the authored graph for configuration errors: a missing entry
  /// step, duplicate step names, transitions targeting steps the sequence
  /// does not own, and misconfigured conditions. Returns the first error
  /// found; every error is also reported as a WARN event so tooling can
  /// surface all of them in one pass.
  ///
  /// Runtime execution tolerates everything this reports (broken
  /// conditions evaluate `false`, broken targets terminate the sequence),
  /// so validation is advisory, not a precondition of `begin()`.
  pub fn validate(&self) -> SequenceResult<()> {
    let mut first: Option<SequenceError> = None;
    let mut record = |error: SequenceError| {
      event!(Level::WARN, %error, "Sequence validation finding.");
      if first.is_none() {
        first = Some(error);
      }
    };

    if self.entry.is_none() {
      record(SequenceError::MissingEntryStep);
    }

    for (index, step) in self.steps.iter().enumerate() {
      if self.steps[..index].iter().any(|earlier| earlier.name() == step.name()) {
        record(SequenceError::DuplicateStepName {
          name: step.name().to_string(),
        });
      }
    }

    for group in self.groups.values() {
      if self.steps.get(group.source().index()).is_none() {
        record(SequenceError::UnknownStep {
          step: group.source().to_string(),
        });
      }
      for transition in group.transitions() {
        if let Some(target) = transition.target() {
          if self.steps.get(target.index()).is_none() {
            record(SequenceError::UnknownStep {
              step: target.to_string(),
            });
          }
        }
        if let Err(error) = transition.condition().validate() {
          record(error);
        }
      }
    }

    match first {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }
}

impl std::fmt::Debug for BranchingSequence {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BranchingSequence")
      .field("steps", &self.steps.len())
      .field("entry", &self.entry)
      .field("groups", &self.groups.len())
      .field("state", &*self.state.read())
      .field("current", &*self.current.read())
      .finish()
  }
}
