//! Error types for lazytask
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad deadline, unknown setting, invalid config)
//! - 4: Operation failed (store, IO, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the lazytask CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for lazytask operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidSettingValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Invalid deadline '{0}': expected milliseconds, YYYY-MM-DD or RFC 3339")]
    InvalidDeadline(String),

    // Operation failures (exit code 4)
    #[error("Store error on key '{key}': {message}")]
    Store { key: String, message: String },

    #[error("Data directory unavailable: {0}")]
    DataDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Build a store failure for `key`
    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::UnknownSetting(_)
            | Error::InvalidSettingValue { .. }
            | Error::InvalidDeadline(_) => exit_codes::USER_ERROR,

            Error::Store { .. }
            | Error::DataDir(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Store { key, .. } => Some(serde_json::json!({ "key": key })),
            Error::InvalidSettingValue { key, expected, .. } => {
                Some(serde_json::json!({ "key": key, "expected": expected }))
            }
            Error::DataDir(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for lazytask operations
pub type Result<T> = std::result::Result<T, Error>;
