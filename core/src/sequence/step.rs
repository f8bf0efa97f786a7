// sequor_core/src/sequence/step.rs

//! Defines the step state machine and its status event stream.

use parking_lot::RwLock;
use tracing::{event, Level};

use crate::signal::Signal;

/// Stable identity of a step within its owning sequence.
///
/// Ids are arena indices assigned at authoring time; transitions store
/// target ids rather than references, which keeps cyclic graphs free of
/// ownership cycles and makes the graph trivially serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId(pub(crate) usize);

impl StepId {
  /// Reconstructs an id from a raw arena index, e.g. when loading a graph
  /// that was persisted by index. Out-of-range ids are tolerated by every
  /// query (they resolve to no step).
  pub fn from_index(index: usize) -> Self {
    StepId(index)
  }

  pub fn index(self) -> usize {
    self.0
  }
}

impl std::fmt::Display for StepId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "step#{}", self.0)
  }
}

/// Lifecycle status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
  /// Not part of the live path right now.
  Inactive,
  /// The live step; action collaborators monitor it and eventually signal
  /// completion.
  Started,
  /// Finished for this activation. A cycle in the graph may return the
  /// step to `Started` later.
  Completed,
}

/// A state node in a branching sequence.
///
/// Steps are created at authoring time and owned exclusively by one
/// `BranchingSequence`. All lifecycle operations are infallible: calls
/// that are invalid for the current status are defined as no-ops, because
/// multiple independent observers may legitimately race to drive the same
/// step. Each method returns whether the status actually changed.
///
/// Status sits behind a lock so the step can be driven through `&self`;
/// events are emitted after the lock is released, so observers may
/// re-inspect the step from inside the callback.
pub struct Step {
  id: StepId,
  name: String,
  status: RwLock<StepStatus>,
  events: Signal<StepStatus>,
}

impl Step {
  pub(crate) fn new(id: StepId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      status: RwLock::new(StepStatus::Inactive),
      events: Signal::new(),
    }
  }

  pub fn id(&self) -> StepId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn status(&self) -> StepStatus {
    *self.status.read()
  }

  /// The step's status event stream. One event is emitted per actual
  /// status transition; no-op lifecycle calls emit nothing.
  ///
  /// Action collaborators are expected to attach when the status becomes
  /// `Started` and detach when it leaves `Started`: their monitoring logic
  /// (timers, proximity checks, input watches) is only meaningful while
  /// the step is live.
  pub fn events(&self) -> &Signal<StepStatus> {
    &self.events
  }

  /// Activates the step: `Inactive` or `Completed` becomes `Started`.
  ///
  /// Re-entering a `Completed` step (a cycle in the graph) resets it to
  /// `Started`. Activating a step that is already `Started` is a no-op.
  pub fn activate(&self) -> bool {
    {
      let mut status = self.status.write();
      match *status {
        StepStatus::Started => {
          return false;
        }
        StepStatus::Inactive | StepStatus::Completed => {
          *status = StepStatus::Started;
        }
      }
    }
    event!(Level::DEBUG, step = %self.name, id = %self.id, "Step started.");
    self.events.emit(&StepStatus::Started);
    true
  }

  /// Completes the step: `Started` becomes `Completed`.
  ///
  /// Calling this while `Inactive` or already `Completed` is an idempotent
  /// no-op, so independent action collaborators can all signal completion
  /// without coordinating.
  pub fn complete(&self) -> bool {
    {
      let mut status = self.status.write();
      match *status {
        StepStatus::Started => {
          *status = StepStatus::Completed;
        }
        StepStatus::Inactive | StepStatus::Completed => {
          return false;
        }
      }
    }
    event!(Level::DEBUG, step = %self.name, id = %self.id, "Step completed.");
    self.events.emit(&StepStatus::Completed);
    true
  }

  /// Returns the step to `Inactive` without a completion transition; used
  /// when the owning sequence is reset or rewound.
  pub fn deactivate(&self) -> bool {
    {
      let mut status = self.status.write();
      match *status {
        StepStatus::Inactive => {
          return false;
        }
        StepStatus::Started | StepStatus::Completed => {
          *status = StepStatus::Inactive;
        }
      }
    }
    event!(Level::DEBUG, step = %self.name, id = %self.id, "Step deactivated.");
    self.events.emit(&StepStatus::Inactive);
    true
  }
}

impl std::fmt::Debug for Step {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Step")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("status", &*self.status.read())
      .field("observers", &self.events.observer_count())
      .finish()
  }
}
