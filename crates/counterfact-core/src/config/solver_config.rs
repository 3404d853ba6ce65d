//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the actual-cause solver.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SolverConfig {
    /// Shuffle candidates within each size class. Default: true.
    pub shuffle_within_size: Option<bool>,
}

impl SolverConfig {
    pub fn effective_shuffle_within_size(&self) -> bool {
        self.shuffle_within_size.unwrap_or(true)
    }
}
