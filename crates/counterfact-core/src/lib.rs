//! # counterfact-core
//!
//! Foundation crate for counterfact.
//! Defines values, variables, assignments, errors, config, constants,
//! and the subset combinatorics shared by the definitions and the solver.

pub mod config;
pub mod constants;
pub mod errors;
pub mod subsets;
pub mod tracing;
pub mod values;
pub mod variables;

// Re-export the most commonly used types at the crate root.
pub use config::{CounterfactConfig, NecessitySearch};
pub use errors::{
    ConfigError, CounterfactError, CounterfactErrorCode, CounterfactResult, DefinitionError,
    DefinitionResult, ScmError, ScmResult, SolverError, SolverResult, SubsetError,
};
pub use values::{assignment, Assignment, Value};
pub use variables::{Support, Variable, VariableType};
