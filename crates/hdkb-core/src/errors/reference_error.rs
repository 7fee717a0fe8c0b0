//! Gate reference table errors. All of them are load-time validation failures.

use super::error_code::{self, HdkbErrorCode};

/// Errors raised while loading or validating the gate reference data.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Cannot read reference data {path}: {message}")]
    Read { path: String, message: String },

    #[error("Reference data is not valid TOML: {0}")]
    Parse(String),

    #[error("Gate {gate} is outside 1..=64")]
    GateOutOfRange { gate: u32 },

    #[error("Gate {gate} is listed more than once")]
    DuplicateGate { gate: u32 },

    #[error("Gate {gate} has no entry")]
    MissingGate { gate: u32 },

    #[error("Gate {gate} names unknown center '{center}'")]
    UnknownCenter { gate: u32, center: String },

    #[error("Gate {gate} has opposite {opposite}, but {opposite} has opposite {back}")]
    AsymmetricOpposite { gate: u32, opposite: u32, back: u32 },

    #[error("Gate {gate} is its own opposite")]
    SelfOpposite { gate: u32 },

    #[error("Center {center} has {actual} gates, expected {expected}")]
    CenterSizeMismatch {
        center: String,
        expected: usize,
        actual: usize,
    },

    #[error("Expected {expected} canonical channels, found {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("Channel {key} is listed more than once")]
    DuplicateChannel { key: String },

    #[error("Channel {a}-{b} is invalid: {message}")]
    InvalidChannel { a: u32, b: u32, message: String },
}

impl HdkbErrorCode for ReferenceError {
    fn error_code(&self) -> &'static str {
        error_code::REFERENCE_ERROR
    }
}
