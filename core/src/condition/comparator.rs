// sequor_core/src/condition/comparator.rs

//! The comparison operator applied between a variable's current value and
//! a condition literal. Pure functions, no state.

use crate::error::{SequenceError, SequenceResult};
use crate::variable::{VariableKind, VariableValue};

/// Comparison operator for branch conditions.
///
/// All six operators are valid for `Int` and `Float` variables. `Bool` and
/// `Str` variables only support `Equals`/`NotEquals`; applying an ordering
/// operator to them is a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
  Equals,
  NotEquals,
  GreaterThan,
  LessThan,
  GreaterOrEqual,
  LessOrEqual,
}

impl Comparator {
  /// Whether this operator imposes an ordering (invalid for Bool/Str).
  pub fn is_ordering(self) -> bool {
    !matches!(self, Comparator::Equals | Comparator::NotEquals)
  }

  /// Whether this operator may be applied to values of `kind`.
  pub fn supports(self, kind: VariableKind) -> bool {
    match kind {
      VariableKind::Int | VariableKind::Float => true,
      VariableKind::Bool | VariableKind::Str => !self.is_ordering(),
    }
  }

  /// Applies the operator to two values of matching kind.
  ///
  /// Returns `UnsupportedComparator` for an ordering operator on Bool/Str
  /// and `LiteralTypeMismatch` when the operand kinds differ. Float
  /// comparison is direct, with no epsilon tolerance; boundary values are
  /// the author's responsibility.
  pub fn apply(self, left: &VariableValue, right: &VariableValue) -> SequenceResult<bool> {
    if left.kind() != right.kind() {
      return Err(SequenceError::LiteralTypeMismatch {
        variable: String::from("<comparison>"),
        expected: left.kind(),
        found: right.kind(),
      });
    }
    match (left, right) {
      (VariableValue::Bool(l), VariableValue::Bool(r)) => self.apply_eq_only(VariableKind::Bool, l == r),
      (VariableValue::Str(l), VariableValue::Str(r)) => self.apply_eq_only(VariableKind::Str, l == r),
      (VariableValue::Int(l), VariableValue::Int(r)) => Ok(self.apply_ord(l.partial_cmp(r))),
      (VariableValue::Float(l), VariableValue::Float(r)) => Ok(self.apply_ord(l.partial_cmp(r))),
      _ => unreachable!("kinds checked above"),
    }
  }

  fn apply_eq_only(self, kind: VariableKind, eq: bool) -> SequenceResult<bool> {
    match self {
      Comparator::Equals => Ok(eq),
      Comparator::NotEquals => Ok(!eq),
      _ => Err(SequenceError::UnsupportedComparator { comparator: self, kind }),
    }
  }

  // A NaN operand leaves the pair unordered: only NotEquals holds then,
  // matching IEEE `!=`.
  fn apply_ord(self, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::*;
    match ordering {
      Some(ord) => match self {
        Comparator::Equals => ord == Equal,
        Comparator::NotEquals => ord != Equal,
        Comparator::GreaterThan => ord == Greater,
        Comparator::LessThan => ord == Less,
        Comparator::GreaterOrEqual => ord != Less,
        Comparator::LessOrEqual => ord != Greater,
      },
      None => matches!(self, Comparator::NotEquals),
    }
  }
}

impl std::fmt::Display for Comparator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Comparator::Equals => "Equals",
      Comparator::NotEquals => "NotEquals",
      Comparator::GreaterThan => "GreaterThan",
      Comparator::LessThan => "LessThan",
      Comparator::GreaterOrEqual => "GreaterOrEqual",
      Comparator::LessOrEqual => "LessOrEqual",
    };
    f.write_str(name)
  }
}
