//! Subset enumeration errors.

use super::error_code::{self, CounterfactErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubsetError {
    #[error("subset length must be between 0 and {max}, {length} given")]
    InvalidLength { length: usize, max: usize },
}

impl CounterfactErrorCode for SubsetError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_SUBSET_LENGTH
    }
}
