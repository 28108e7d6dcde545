// Sirocco runtime errors

use thiserror::Error;

/// Ordinary runtime errors. These are catchable by a `try`/`catch` in the
/// running program; control-flow signals (return/break/continue) are not.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("undefined name '{0}'")]
    UnboundName(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("{0}")]
    HostError(String),

    // A return/break/continue that escaped the construct bounding it.
    // The parser rejects these statically; this surfaces only for
    // hand-built ASTs fed straight to the interpreter.
    #[error("'{0}' escaped its enclosing scope")]
    StrayControl(&'static str),
}
