//! Necessity search configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::errors::ConfigError;

/// How alternative event assignments are enumerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NecessitySearch {
    /// Exhaustive when the full product fits within `max_attempts`, random otherwise.
    #[default]
    Auto,
    Exhaustive,
    Random,
}

impl fmt::Display for NecessitySearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Exhaustive => "exhaustive",
            Self::Random => "random",
        })
    }
}

impl FromStr for NecessitySearch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "exhaustive" => Ok(Self::Exhaustive),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::InvalidValue {
                field: "necessity.search".to_string(),
                message: format!("unknown search mode '{other}'"),
            }),
        }
    }
}

/// Configuration for necessity (AC2a) searches.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NecessityConfig {
    /// Cap on alternatives tried by random search. Default: 1000.
    pub max_attempts: Option<usize>,
    /// Search mode. Default: auto.
    pub search: Option<NecessitySearch>,
}

impl NecessityConfig {
    pub fn effective_max_attempts(&self) -> usize {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn effective_search(&self) -> NecessitySearch {
        self.search.unwrap_or_default()
    }
}
