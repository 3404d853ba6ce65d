//! Top-level counterfact configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{LoggingConfig, NecessityConfig, NecessitySearch, ScmConfig, SolverConfig};
use crate::constants::{CONFIG_FILE_NAME, ENV_MAX_ATTEMPTS, ENV_NECESSITY_SEARCH, ENV_SEED};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`COUNTERFACT_*`)
/// 2. Project config (`counterfact.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CounterfactConfig {
    pub scm: ScmConfig,
    pub necessity: NecessityConfig,
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

impl CounterfactConfig {
    /// Load configuration from `root/counterfact.toml` plus environment overrides.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            let file_config = Self::read_toml_file(&project_config_path)?;
            Self::merge(&mut config, &file_config);
        }

        Self::apply_env_overrides(&mut config)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &CounterfactConfig) -> Result<(), ConfigError> {
        if config.necessity.max_attempts == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "necessity.max_attempts".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(level) = &config.logging.level {
            if level.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "logging.level".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// `other` values override `base` only where `other` has `Some`.
    fn merge(base: &mut CounterfactConfig, other: &CounterfactConfig) {
        if other.scm.seed.is_some() {
            base.scm.seed = other.scm.seed;
        }
        if other.necessity.max_attempts.is_some() {
            base.necessity.max_attempts = other.necessity.max_attempts;
        }
        if other.necessity.search.is_some() {
            base.necessity.search = other.necessity.search;
        }
        if other.solver.shuffle_within_size.is_some() {
            base.solver.shuffle_within_size = other.solver.shuffle_within_size;
        }
        if other.logging.level.is_some() {
            base.logging.level = other.logging.level.clone();
        }
    }

    fn apply_env_overrides(config: &mut CounterfactConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(ENV_SEED) {
            let seed = val.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: ENV_SEED.to_string(),
                message: e.to_string(),
            })?;
            config.scm.seed = Some(seed);
        }
        if let Ok(val) = std::env::var(ENV_MAX_ATTEMPTS) {
            let attempts = val.parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                field: ENV_MAX_ATTEMPTS.to_string(),
                message: e.to_string(),
            })?;
            config.necessity.max_attempts = Some(attempts);
        }
        if let Ok(val) = std::env::var(ENV_NECESSITY_SEARCH) {
            config.necessity.search = Some(val.parse::<NecessitySearch>()?);
        }
        Ok(())
    }

    /// Serialize the current config to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
