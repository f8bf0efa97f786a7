// sequor_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::condition::Comparator;
use crate::variable::VariableKind;

#[derive(Debug, Error)]
pub enum SequenceError {
  #[error("Sequence has no entry step set")]
  MissingEntryStep,

  #[error("Sequence cannot begin: already {state}")]
  AlreadyRunning { state: String },

  #[error("Unknown step: {step}")]
  UnknownStep { step: String },

  #[error("Duplicate step name: {name}")]
  DuplicateStepName { name: String },

  #[error("Comparator {comparator} is not supported for {kind} variables")]
  UnsupportedComparator {
    comparator: Comparator,
    kind: VariableKind,
  },

  #[error("Literal type mismatch for variable '{variable}': expected {expected}, found {found}")]
  LiteralTypeMismatch {
    variable: String,
    expected: VariableKind,
    found: VariableKind,
  },

  #[error("Variable '{variable}' is {declared}, but a {requested} read was requested")]
  VariableTypeMismatch {
    variable: String,
    declared: VariableKind,
    requested: VariableKind,
  },

  #[error("Reading variable '{variable}' failed. Source: {source}")]
  VariableReadFailure {
    variable: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for step '{step}': {message}")]
  ConfigurationError { step: String, message: String },

  #[error("Internal sequence error: {0}")]
  Internal(String),
}

// External failures (e.g. a host-backed VariableRef hitting I/O) arrive as
// anyhow::Error; keep the original as the source rather than re-nesting an
// already-wrapped SequenceError.
impl From<AnyhowError> for SequenceError {
  fn from(err: AnyhowError) -> Self {
    SequenceError::VariableReadFailure {
      variable: String::from("<unknown>"),
      source: err,
    }
  }
}

pub type SequenceResult<T, E = SequenceError> = std::result::Result<T, E>;
