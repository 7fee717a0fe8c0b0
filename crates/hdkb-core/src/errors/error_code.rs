//! HdkbErrorCode trait: stable machine-readable codes for every error enum.

/// Every error enum implements this to expose a stable code string,
/// used as a prefix in log lines and report files.
pub trait HdkbErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn tagged(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const REFERENCE_ERROR: &str = "REFERENCE_ERROR";
pub const ARTICLE_IO: &str = "ARTICLE_IO";
pub const POLICY_ERROR: &str = "POLICY_ERROR";
pub const OUTPUT_ERROR: &str = "OUTPUT_ERROR";
pub const INPUT_MISSING: &str = "INPUT_MISSING";
pub const INPUT_INVALID: &str = "INPUT_INVALID";
