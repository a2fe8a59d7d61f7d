//! The term model (C1), structural queries (C2), property analyses (C3) and
//! semantic operations (C4) from spec.md §3–4. These four live together
//! because C3's determinism check and C4's simplification/negation are pure
//! structural transforms over the DAG with no dependency on the higher-level
//! model-enumeration or codec layers; `algorithms` and `io` build on top of
//! this module, never the other way around.

mod node;
mod properties;
mod queries;
mod semantics;

pub use node::{Name, Nnf};
pub use semantics::{all_models, AllModels, Model, MAX_TO_MODS_VARS};

pub(crate) use semantics::{contradicts, is_satisfiable_brute};
