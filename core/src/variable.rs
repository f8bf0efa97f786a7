// sequor_core/src/variable.rs

//! The typed variable read contract consumed by condition evaluation, plus
//! `SharedVariable`, a lock-backed reference implementation for hosts and
//! tests.
//!
//! Variables are owned by the host application; the engine only ever reads
//! them, at evaluation time, without caching. A `SharedVariable` may be
//! mutated by the host between two evaluations of the same condition and
//! the engine will observe the new value.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{SequenceError, SequenceResult};

/// The declared type of a variable or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
  Bool,
  Int,
  Float,
  Str,
}

impl std::fmt::Display for VariableKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      VariableKind::Bool => "Bool",
      VariableKind::Int => "Int",
      VariableKind::Float => "Float",
      VariableKind::Str => "Str",
    };
    f.write_str(name)
  }
}

/// A typed value: the current state of a variable, or a condition literal.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
}

impl VariableValue {
  pub fn kind(&self) -> VariableKind {
    match self {
      VariableValue::Bool(_) => VariableKind::Bool,
      VariableValue::Int(_) => VariableKind::Int,
      VariableValue::Float(_) => VariableKind::Float,
      VariableValue::Str(_) => VariableKind::Str,
    }
  }
}

impl From<bool> for VariableValue {
  fn from(v: bool) -> Self {
    VariableValue::Bool(v)
  }
}

impl From<i64> for VariableValue {
  fn from(v: i64) -> Self {
    VariableValue::Int(v)
  }
}

impl From<f64> for VariableValue {
  fn from(v: f64) -> Self {
    VariableValue::Float(v)
  }
}

impl From<&str> for VariableValue {
  fn from(v: &str) -> Self {
    VariableValue::Str(v.to_string())
  }
}

impl From<String> for VariableValue {
  fn from(v: String) -> Self {
    VariableValue::Str(v)
  }
}

/// Read access to a named, typed variable cell owned elsewhere.
///
/// The condition evaluator calls exactly the accessor matching [`kind`];
/// calling any other accessor is a type-mismatch configuration error.
/// Implementations must not block for long: reads happen synchronously
/// inside transition resolution.
///
/// [`kind`]: VariableRef::kind
pub trait VariableRef: Send + Sync {
  /// Diagnostic identity of the variable (shown in logs and errors).
  fn name(&self) -> &str;

  /// The declared type of this variable.
  fn kind(&self) -> VariableKind;

  fn read_bool(&self) -> SequenceResult<bool>;
  fn read_int(&self) -> SequenceResult<i64>;
  fn read_float(&self) -> SequenceResult<f64>;
  fn read_string(&self) -> SequenceResult<String>;

  /// Reads the current value as a [`VariableValue`] by dispatching on
  /// [`kind`](VariableRef::kind). Provided for evaluators and tooling.
  fn read_value(&self) -> SequenceResult<VariableValue> {
    match self.kind() {
      VariableKind::Bool => self.read_bool().map(VariableValue::Bool),
      VariableKind::Int => self.read_int().map(VariableValue::Int),
      VariableKind::Float => self.read_float().map(VariableValue::Float),
      VariableKind::Str => self.read_string().map(VariableValue::Str),
    }
  }
}

fn mismatch(var: &dyn VariableRef, requested: VariableKind) -> SequenceError {
  SequenceError::VariableTypeMismatch {
    variable: var.name().to_string(),
    declared: var.kind(),
    requested,
  }
}

/// A named variable cell with shared ownership and interior mutability.
///
/// `Clone` shares the underlying cell: the host keeps one handle to mutate
/// through, conditions hold another to read through. Lock guards are never
/// held beyond the accessor call.
pub struct SharedVariable {
  name: String,
  kind: VariableKind,
  value: Arc<RwLock<VariableValue>>,
}

impl SharedVariable {
  pub fn new(name: impl Into<String>, initial: impl Into<VariableValue>) -> Self {
    let value = initial.into();
    Self {
      name: name.into(),
      kind: value.kind(),
      value: Arc::new(RwLock::new(value)),
    }
  }

  /// Replaces the current value. The new value must keep the declared kind;
  /// a kind change is a configuration error.
  pub fn set(&self, value: impl Into<VariableValue>) -> SequenceResult<()> {
    let value = value.into();
    if value.kind() != self.kind {
      return Err(SequenceError::LiteralTypeMismatch {
        variable: self.name.clone(),
        expected: self.kind,
        found: value.kind(),
      });
    }
    *self.value.write() = value;
    Ok(())
  }

  /// Snapshot of the current value.
  pub fn get(&self) -> VariableValue {
    self.value.read().clone()
  }
}

impl Clone for SharedVariable {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      kind: self.kind,
      value: Arc::clone(&self.value),
    }
  }
}

impl std::fmt::Debug for SharedVariable {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SharedVariable")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("value", &*self.value.read())
      .finish()
  }
}

impl VariableRef for SharedVariable {
  fn name(&self) -> &str {
    &self.name
  }

  fn kind(&self) -> VariableKind {
    self.kind
  }

  fn read_bool(&self) -> SequenceResult<bool> {
    match &*self.value.read() {
      VariableValue::Bool(v) => Ok(*v),
      _ => Err(mismatch(self, VariableKind::Bool)),
    }
  }

  fn read_int(&self) -> SequenceResult<i64> {
    match &*self.value.read() {
      VariableValue::Int(v) => Ok(*v),
      _ => Err(mismatch(self, VariableKind::Int)),
    }
  }

  fn read_float(&self) -> SequenceResult<f64> {
    match &*self.value.read() {
      VariableValue::Float(v) => Ok(*v),
      _ => Err(mismatch(self, VariableKind::Float)),
    }
  }

  fn read_string(&self) -> SequenceResult<String> {
    match &*self.value.read() {
      VariableValue::Str(v) => Ok(v.clone()),
      _ => Err(mismatch(self, VariableKind::Str)),
    }
  }
}
