//! Structural causal model errors.

use super::error_code::{self, CounterfactErrorCode};

/// Errors raised while building, intervening on, or evaluating an SCM.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScmError {
    #[error("variable already defined: {name}")]
    DuplicateVariable { name: String },

    #[error("invalid support for {name} ({var_type}): {reason}")]
    InvalidSupport {
        name: String,
        var_type: String,
        reason: String,
    },

    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("invalid intervention {name} = {value}: {reason}")]
    InvalidIntervention {
        name: String,
        value: String,
        reason: String,
    },

    #[error("structural function for {variable} is missing parent {parent}")]
    MissingParent { variable: String, parent: String },

    #[error("cycle detected: adding {parent} -> {child} would close a cycle")]
    CycleDetected { parent: String, child: String },

    #[error("no noise value or distribution for {name}")]
    MissingNoise { name: String },

    #[error("invalid noise distribution for {name}: {reason}")]
    InvalidNoise { name: String, reason: String },

    #[error("type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

pub type ScmResult<T> = Result<T, ScmError>;

impl CounterfactErrorCode for ScmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateVariable { .. } => error_code::DUPLICATE_VARIABLE,
            Self::InvalidSupport { .. } => error_code::INVALID_SUPPORT,
            Self::UnknownVariable { .. } => error_code::UNKNOWN_VARIABLE,
            Self::InvalidIntervention { .. } => error_code::INVALID_INTERVENTION,
            Self::MissingParent { .. } => error_code::MISSING_PARENT,
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            Self::MissingNoise { .. } | Self::InvalidNoise { .. } => error_code::INVALID_NOISE,
            Self::TypeMismatch { .. } => error_code::TYPE_MISMATCH,
        }
    }
}
