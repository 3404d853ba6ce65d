//! Actual-cause definition errors.

use super::error_code::{self, CounterfactErrorCode};
use super::scm_error::ScmError;
use super::subset_error::SubsetError;

/// Errors raised by an actual-cause definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("{definition} does not implement {operation}")]
    NotImplemented {
        definition: String,
        operation: String,
    },

    #[error("variable {name} cannot be enumerated: {reason}")]
    UnsupportedVariable { name: String, reason: String },

    #[error(transparent)]
    Scm(#[from] ScmError),

    #[error(transparent)]
    Subset(#[from] SubsetError),
}

pub type DefinitionResult<T> = Result<T, DefinitionError>;

impl CounterfactErrorCode for DefinitionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotImplemented { .. } => error_code::NOT_IMPLEMENTED,
            Self::UnsupportedVariable { .. } => error_code::UNSUPPORTED_VARIABLE,
            Self::Scm(inner) => inner.error_code(),
            Self::Subset(inner) => inner.error_code(),
        }
    }
}
