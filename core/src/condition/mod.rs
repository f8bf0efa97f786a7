// sequor_core/src/condition/mod.rs

//! The typed condition model: the `Comparator` operator set and
//! `BranchCondition`, the predicate attached to every transition.

pub mod branch;
pub mod comparator;

pub use branch::BranchCondition;
pub use comparator::Comparator;
