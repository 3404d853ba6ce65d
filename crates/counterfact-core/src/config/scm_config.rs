//! SCM configuration.

use serde::{Deserialize, Serialize};

/// Configuration for structural causal models.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ScmConfig {
    /// Seed for the model RNG. Unset means seeded from entropy.
    pub seed: Option<u64>,
}
