//! Algorithms built on top of `core` (spec.md §4.5–4.7): model enumeration
//! and counting, satisfiability/equivalence comparisons, and algebraic
//! model counting.

mod amc;
mod compare;
mod models;

pub use amc::{eval, grad, num_sat, Dual, Semiring};
pub use compare::{contradicts, contradicts_itself, entails, equivalent, satisfiable, valid};
pub use models::{model_count, models};
