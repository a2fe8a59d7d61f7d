use thiserror::Error;

/// The error kinds surfaced by this crate.
///
/// Every fallible public operation returns a [`Result<T, NnfError>`](Result).
/// The library never retries and never mutates global state; an error is
/// always returned to the caller rather than logged and swallowed.
#[derive(Debug, Error)]
pub enum NnfError {
    /// An attempt was made to build a node without going through one of the
    /// concrete constructors (`var`, `and_of`, `or_of`, `Nnf::TRUE`,
    /// `Nnf::FALSE`). The public API is sealed so this can only be reached
    /// from within the crate's own low-level parser builders.
    #[error("cannot instantiate an abstract NNF node directly")]
    AbstractInstantiation,

    /// [`Nnf::satisfied_by`](crate::Nnf::satisfied_by) was given a model
    /// missing a value for a variable the formula needs.
    #[error("model is missing a value for variable {missing}")]
    IncompleteModel {
        /// The name of the variable for which no value was supplied.
        missing: String,
    },

    /// [`io::dimacs::dumps_cnf`](crate::io::dimacs::dumps_cnf) was asked to
    /// serialize a sentence that is not in CNF, or another formatting
    /// precondition was not met.
    #[error("cannot format this sentence: {0}")]
    FormatError(String),

    /// DIMACS or DSHARP input was syntactically invalid.
    #[error("parse error at line {line}: {message}")]
    ParseError {
        /// 1-based line number at which the problem was detected.
        line: usize,
        /// Human-readable description of the problem.
        message: String,
    },

    /// An algorithm that requires a property the input does not have (and
    /// the caller has not opted into a slower fallback) was invoked anyway.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, NnfError>;
