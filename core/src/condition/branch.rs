// sequor_core/src/condition/branch.rs

//! Defines `BranchCondition`: the typed predicate attached to a transition,
//! comparing an externally-owned variable against a literal, or
//! unconditional when no variable is bound.
//!
//! Conditions are built through an explicit constructor API rather than by
//! poking fields from tooling; editors and tests consume the same `with_*`
//! methods the runtime does.

use std::sync::Arc;
use tracing::{event, Level};

use crate::condition::comparator::Comparator;
use crate::error::{SequenceError, SequenceResult};
use crate::variable::{VariableRef, VariableValue};

/// A typed predicate over one external variable.
///
/// With no variable bound the condition is "unconditional" and always
/// evaluates `true` regardless of operator and literal; authors use this
/// for default/fallback transitions. With a variable bound, evaluation
/// reads the variable's current value (uncached, at evaluation time) and
/// applies the comparator against the literal.
#[derive(Clone)]
pub struct BranchCondition {
  variable: Option<Arc<dyn VariableRef>>,
  comparator: Comparator,
  literal: Option<VariableValue>,
}

impl BranchCondition {
  /// A condition that always evaluates `true`.
  pub fn unconditional() -> Self {
    Self {
      variable: None,
      comparator: Comparator::Equals,
      literal: None,
    }
  }

  /// Starts a condition bound to `variable`. Defaults to `Equals` with no
  /// literal; chain [`with_comparator`](Self::with_comparator) and
  /// [`with_literal`](Self::with_literal) to complete it.
  pub fn when(variable: Arc<dyn VariableRef>) -> Self {
    Self {
      variable: Some(variable),
      comparator: Comparator::Equals,
      literal: None,
    }
  }

  pub fn with_variable(mut self, variable: Arc<dyn VariableRef>) -> Self {
    self.variable = Some(variable);
    self
  }

  pub fn with_comparator(mut self, comparator: Comparator) -> Self {
    self.comparator = comparator;
    self
  }

  pub fn with_literal(mut self, literal: impl Into<VariableValue>) -> Self {
    self.literal = Some(literal.into());
    self
  }

  /// Shorthand for `with_comparator(Equals).with_literal(literal)`.
  pub fn equals(self, literal: impl Into<VariableValue>) -> Self {
    self.with_comparator(Comparator::Equals).with_literal(literal)
  }

  /// Shorthand for `with_comparator(GreaterOrEqual).with_literal(literal)`.
  pub fn at_least(self, literal: impl Into<VariableValue>) -> Self {
    self.with_comparator(Comparator::GreaterOrEqual).with_literal(literal)
  }

  /// Whether this condition has no variable bound.
  pub fn is_unconditional(&self) -> bool {
    self.variable.is_none()
  }

  pub fn comparator(&self) -> Comparator {
    self.comparator
  }

  pub fn literal(&self) -> Option<&VariableValue> {
    self.literal.as_ref()
  }

  /// Authoring-time validation.
  ///
  /// Checks that a bound variable has a literal of the matching kind and
  /// that the comparator is legal for that kind. Unconditional conditions
  /// are always valid. Runtime evaluation tolerates every failure this
  /// reports (see [`evaluate`](Self::evaluate)).
  pub fn validate(&self) -> SequenceResult<()> {
    let variable = match &self.variable {
      None => return Ok(()),
      Some(v) => v,
    };
    let kind = variable.kind();
    if !self.comparator.supports(kind) {
      return Err(SequenceError::UnsupportedComparator {
        comparator: self.comparator,
        kind,
      });
    }
    match &self.literal {
      None => Err(SequenceError::ConfigurationError {
        step: variable.name().to_string(),
        message: format!("condition on '{}' has no {} literal set", variable.name(), kind),
      }),
      Some(lit) if lit.kind() != kind => Err(SequenceError::LiteralTypeMismatch {
        variable: variable.name().to_string(),
        expected: kind,
        found: lit.kind(),
      }),
      Some(_) => Ok(()),
    }
  }

  /// Evaluates the condition against the variable's current value.
  ///
  /// This is a pure read: the variable is never mutated and the value is
  /// not cached, so two evaluations may legitimately disagree if the host
  /// mutated the variable in between. Configuration errors (missing or
  /// mismatched literal, ordering comparator on Bool/Str, failed read) are
  /// reported as WARN events and evaluate to `false`; sequence execution
  /// stays non-fatal.
  pub fn evaluate(&self) -> bool {
    let variable = match &self.variable {
      None => return true,
      Some(v) => v,
    };

    let current = match variable.read_value() {
      Ok(value) => value,
      Err(error) => {
        event!(Level::WARN, variable = variable.name(), %error, "Variable read failed; condition evaluates to false.");
        return false;
      }
    };

    let literal = match &self.literal {
      Some(lit) => lit,
      None => {
        event!(Level::WARN, variable = variable.name(), "Condition has no literal set; evaluates to false.");
        return false;
      }
    };

    match self.comparator.apply(&current, literal) {
      Ok(result) => result,
      Err(error) => {
        event!(Level::WARN, variable = variable.name(), %error, "Condition misconfigured; evaluates to false.");
        false
      }
    }
  }
}

impl std::fmt::Debug for BranchCondition {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BranchCondition")
      .field("variable", &self.variable.as_ref().map(|v| v.name().to_string()))
      .field("comparator", &self.comparator)
      .field("literal", &self.literal)
      .finish()
  }
}
