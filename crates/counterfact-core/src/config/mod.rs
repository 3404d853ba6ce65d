//! Configuration for counterfact.
//! TOML-based, layered: compiled defaults < project file < environment.

pub mod counterfact_config;
pub mod logging_config;
pub mod necessity_config;
pub mod scm_config;
pub mod solver_config;

pub use counterfact_config::CounterfactConfig;
pub use logging_config::LoggingConfig;
pub use necessity_config::{NecessityConfig, NecessitySearch};
pub use scm_config::ScmConfig;
pub use solver_config::SolverConfig;
