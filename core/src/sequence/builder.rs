// sequor_core/src/sequence/builder.rs

//! Implements the fluent authoring API (`SequenceBuilder`,
//! `TransitionGroupBuilder`) for constructing a `BranchingSequence`.
//!
//! This is the single construction surface: runtime, editors, and tests
//! all author sequences through it. There is no field-level mutation of a
//! built sequence; the graph is immutable once `build()` returns.

use std::collections::HashMap;
use std::sync::Arc;

use crate::condition::BranchCondition;
use crate::sequence::engine::BranchingSequence;
use crate::sequence::step::{Step, StepId};
use crate::sequence::transition::{StepTransition, TransitionGroup};
use crate::signal::Signal;

/// Builder for a [`BranchingSequence`].
///
/// Steps are allocated in insertion order and identified by the returned
/// [`StepId`]s; transition groups are attached per source step. `build()`
/// is infallible; authoring mistakes (duplicate names, dangling targets,
/// misconfigured conditions) are reported by
/// [`BranchingSequence::validate`] and tolerated at runtime.
pub struct SequenceBuilder {
  steps: Vec<Step>,
  entry: Option<StepId>,
  groups: HashMap<StepId, TransitionGroup>,
}

impl SequenceBuilder {
  pub fn new() -> Self {
    Self {
      steps: Vec::new(),
      entry: None,
      groups: HashMap::new(),
    }
  }

  /// Adds a step and returns its stable id. The first step added becomes
  /// the entry step unless [`entry`](Self::entry) overrides it.
  pub fn step(&mut self, name: impl Into<String>) -> StepId {
    let id = StepId(self.steps.len());
    self.steps.push(Step::new(id, name));
    if self.entry.is_none() {
      self.entry = Some(id);
    }
    id
  }

  /// Designates the entry step activated by `begin()`.
  pub fn entry(&mut self, id: StepId) -> &mut Self {
    self.entry = Some(id);
    self
  }

  /// Opens the transition group for `source`. At most one group exists
  /// per step; opening it again replaces the previous group.
  pub fn group(&mut self, source: StepId) -> TransitionGroupBuilder<'_> {
    TransitionGroupBuilder {
      builder: self,
      group: TransitionGroup::new(source),
    }
  }

  pub fn build(self) -> BranchingSequence {
    BranchingSequence::new(self.steps, self.entry, self.groups)
  }
}

impl Default for SequenceBuilder {
  fn default() -> Self {
    Self::new()
  }
}

/// Configurator for one step's ordered transition list. Transitions are
/// resolved in the order they are added here; `done()` commits the group
/// and hands the parent builder back.
pub struct TransitionGroupBuilder<'b> {
  builder: &'b mut SequenceBuilder,
  group: TransitionGroup,
}

impl<'b> TransitionGroupBuilder<'b> {
  /// Appends a conditioned transition. `target: None` means "sequence
  /// ends here" when the transition is taken.
  pub fn transition(mut self, label: impl Into<String>, condition: BranchCondition, target: Option<StepId>) -> Self {
    self.group.push(StepTransition::new(label, condition, target));
    self
  }

  /// Appends an unconditional transition; conventionally the last entry,
  /// acting as the default/fallback.
  pub fn otherwise(self, label: impl Into<String>, target: Option<StepId>) -> Self {
    self.transition(label, BranchCondition::unconditional(), target)
  }

  /// Appends a conditioned transition that broadcasts `signal` whenever
  /// it is taken.
  pub fn transition_with_signal(
    mut self,
    label: impl Into<String>,
    condition: BranchCondition,
    target: Option<StepId>,
    signal: Arc<Signal<()>>,
  ) -> Self {
    self
      .group
      .push(StepTransition::new(label, condition, target).with_signal(signal));
    self
  }

  /// Commits the group to the sequence and returns the parent builder.
  pub fn done(self) -> &'b mut SequenceBuilder {
    self.builder.groups.insert(self.group.source(), self.group);
    self.builder
  }
}
