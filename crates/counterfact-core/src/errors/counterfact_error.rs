use super::config_error::ConfigError;
use super::definition_error::DefinitionError;
use super::error_code::CounterfactErrorCode;
use super::scm_error::ScmError;
use super::solver_error::SolverError;
use super::subset_error::SubsetError;

/// Top-level error type aggregating all subsystem errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CounterfactError {
    #[error("scm error: {0}")]
    Scm(#[from] ScmError),

    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("subset error: {0}")]
    Subset(#[from] SubsetError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type CounterfactResult<T> = Result<T, CounterfactError>;

impl CounterfactErrorCode for CounterfactError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scm(e) => e.error_code(),
            Self::Definition(e) => e.error_code(),
            Self::Solver(e) => e.error_code(),
            Self::Subset(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
