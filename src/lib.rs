//! An algebra and query engine for propositional sentences in Negation
//! Normal Form (NNF).
//!
//! An [`Nnf`] is an immutable, structurally-shared DAG: every `And`/`Or`
//! node owns a *set* of children (duplicates collapse, order is
//! irrelevant), negation only ever appears directly above a variable, and
//! cloning a sentence is a reference-count bump rather than a deep copy.
//!
//! ```
//! use nnf::Nnf;
//!
//! let a = Nnf::var("a");
//! let b = Nnf::var("b");
//! let sentence = (a.clone() & b.clone()) | (!a & !b);
//!
//! assert!(sentence.decomposable());
//! assert!(sentence.deterministic());
//! assert_eq!(2, nnf::models(&sentence).len());
//! ```
//!
//! - [`core`] — the term model, structural queries, property analyses and
//!   semantic operations that need no dependency beyond the DAG itself.
//! - [`algorithms`] — model enumeration/counting, satisfiability
//!   comparisons, and algebraic model counting, all built on `core`.
//! - [`io`] — DIMACS (`cnf`/`sat`) and DSHARP d-DNNF codecs.

mod algorithms;
pub use algorithms::{
    contradicts, contradicts_itself, entails, equivalent, eval, grad, model_count, models,
    num_sat, satisfiable, valid, Dual, Semiring,
};

mod core;
pub use core::{all_models, AllModels, Model, Name, Nnf, MAX_TO_MODS_VARS};

pub mod io;

mod error;
pub use error::{NnfError, Result};
