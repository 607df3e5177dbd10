//! Unified error types for WriFe with fail-open collaborators.
//!
//! The sentence engine itself never fails: invalid learner actions are
//! ignored and a wrong answer is a normal result. Errors only come from the
//! edges (lesson data, progress log, hint service, config). Collaborator
//! failures during a session are logged and replaced with a safe default via
//! [`FailOpen`] so the learner can keep going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for WriFe operations.
#[derive(Error, Debug)]
pub enum WrifeError {
    /// I/O errors from lesson, progress or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Lesson data that breaks the formula invariants.
    #[error("lesson error: {message}")]
    Lesson { message: String },

    /// Lesson not found in any source.
    #[error("lesson not found: {lesson_id}")]
    LessonNotFound { lesson_id: String },

    /// Progress sink failures.
    #[error("progress error: {message}")]
    Progress { message: String },

    /// Hint provider failures.
    #[error("hint error: {message}")]
    Hint { message: String },

    /// Malformed input from the CLI layer.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// A specialized Result type for WriFe operations.
pub type Result<T> = std::result::Result<T, WrifeError>;

impl WrifeError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a lesson error.
    pub fn lesson(message: impl Into<String>) -> Self {
        Self::Lesson {
            message: message.into(),
        }
    }

    /// Create a lesson not found error.
    pub fn lesson_not_found(lesson_id: impl Into<String>) -> Self {
        Self::LessonNotFound {
            lesson_id: lesson_id.into(),
        }
    }

    /// Create a progress error.
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress {
            message: message.into(),
        }
    }

    /// Create a hint error.
    pub fn hint(message: impl Into<String>) -> Self {
        Self::Hint {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this error comes from a collaborator that a running session
    /// should mask instead of surfacing.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Progress { .. } | Self::Hint { .. })
    }
}

impl From<io::Error> for WrifeError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for WrifeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for WrifeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Collaborator outages are expected and logged as warnings; anything else
/// masked this way is a bug in the caller and logged as an error.
fn log_masked(context: &str, err: &WrifeError, using: &str) {
    if err.is_collaborator_failure() {
        tracing::warn!("{}: {} (fail-open: using {})", context, err, using);
    } else {
        tracing::error!("{}: {} (fail-open: using {})", context, err, using);
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                log_masked(context, &err, "default");
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                log_masked(context, &err, "fallback");
                fallback
            }
        }
    }
}

/// Exit codes for the `wrife` CLI.
pub mod exit_codes {
    /// Command completed.
    pub const SUCCESS: i32 = 0;

    /// Command failed (missing lesson, unreadable file, ...).
    pub const ERROR: i32 = 1;

    /// Invalid usage or malformed input.
    pub const USAGE: i32 = 2;
}
