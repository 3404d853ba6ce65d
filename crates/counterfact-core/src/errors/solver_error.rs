//! Solver errors.

use super::definition_error::DefinitionError;
use super::error_code::{self, CounterfactErrorCode};
use super::scm_error::ScmError;

/// Errors raised while searching for actual causes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("variable {name} cannot be enumerated: {reason}")]
    UnsupportedVariable { name: String, reason: String },

    #[error("outcome variable {name} is not in the model")]
    UnknownOutcome { name: String },

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Scm(#[from] ScmError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl CounterfactErrorCode for SolverError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedVariable { .. } => error_code::UNSUPPORTED_VARIABLE,
            Self::UnknownOutcome { .. } => error_code::UNKNOWN_VARIABLE,
            Self::Definition(inner) => inner.error_code(),
            Self::Scm(inner) => inner.error_code(),
        }
    }
}
