// src/lib.rs

//! Sequor: a branching sequence engine for guided interactions.
//!
//! Sequor drives ordered sets of discrete steps (tutorial beats, puzzle
//! stages, narrative nodes) where advancement is decided at runtime by
//! evaluating typed conditions against externally-owned variables:
//!  - A step lifecycle (`Inactive → Started → Completed`) with a
//!    publish/subscribe status event stream per step.
//!  - Typed branch conditions (Bool/Int/Float/Str) comparing a live
//!    variable against a literal, or unconditional for defaults.
//!  - Ordered, deterministic, first-match-wins transition resolution.
//!  - A sequence orchestrator driven by discrete completion signals from
//!    the host, with cycle support and non-fatal configuration errors.
//!  - Fire-and-forget side-effect signals on taken transitions.

pub mod condition;
pub mod error;
pub mod sequence;
pub mod signal;
pub mod variable;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::condition::{BranchCondition, Comparator};
pub use crate::sequence::{Advance, BranchingSequence, SequenceState};
pub use crate::sequence::{Step, StepId, StepStatus};
pub use crate::sequence::{StepTransition, TransitionGroup};

// The authoring surface
pub use crate::sequence::SequenceBuilder;

// The per-step event channel, also used for transition side-effect signals
pub use crate::signal::{Signal, SubscriptionId};

// The variable read contract and the lock-backed reference implementation
pub use crate::variable::{SharedVariable, VariableKind, VariableRef, VariableValue};

pub use crate::error::{SequenceError, SequenceResult};

/*
    Core Workflow:
    1. Author the graph with a `SequenceBuilder`: add steps, pick the
       entry, attach an ordered `TransitionGroup` per step.
    2. Bind `BranchCondition`s to host-owned variables via the
       `VariableRef` trait (`SharedVariable` is the stock implementation).
    3. `build()` the `BranchingSequence`, optionally `validate()` it to
       surface authoring mistakes early.
    4. `begin()` activates the entry step. Action collaborators subscribe
       to the live step's event stream and, when their monitoring logic
       fires, deliver `complete_step(id)` back to the sequence.
    5. Each accepted completion resolves that step's transitions in
       authored order; the first satisfied condition wins, its optional
       signal is broadcast, and the target step activates; a dead end or
       an end-transition terminates the sequence instead.
    6. `reset()` returns every step to `Inactive` for another run.
*/
