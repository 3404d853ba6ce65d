//! CounterfactErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable code.
pub trait CounterfactErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_VARIABLE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const DUPLICATE_VARIABLE: &str = "DUPLICATE_VARIABLE";
pub const INVALID_SUPPORT: &str = "INVALID_SUPPORT";
pub const UNKNOWN_VARIABLE: &str = "UNKNOWN_VARIABLE";
pub const INVALID_INTERVENTION: &str = "INVALID_INTERVENTION";
pub const MISSING_PARENT: &str = "MISSING_PARENT";
pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";
pub const INVALID_NOISE: &str = "INVALID_NOISE";
pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
pub const UNSUPPORTED_VARIABLE: &str = "UNSUPPORTED_VARIABLE";
pub const INVALID_SUBSET_LENGTH: &str = "INVALID_SUBSET_LENGTH";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
