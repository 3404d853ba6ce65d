//! Error handling for counterfact.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod counterfact_error;
pub mod definition_error;
pub mod error_code;
pub mod scm_error;
pub mod solver_error;
pub mod subset_error;

pub use config_error::ConfigError;
pub use counterfact_error::{CounterfactError, CounterfactResult};
pub use definition_error::{DefinitionError, DefinitionResult};
pub use error_code::CounterfactErrorCode;
pub use scm_error::{ScmError, ScmResult};
pub use solver_error::{SolverError, SolverResult};
pub use subset_error::SubsetError;
