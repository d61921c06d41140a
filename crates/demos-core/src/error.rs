//! Error types for the demos core crate.
//!
//! Flow misuse (advancing without a decision, viewing results early) is not an
//! error: those actions are ignored transitions. Errors here cover loading the
//! configuration and constructing out-of-range input values.

use std::path::PathBuf;

/// A specialized `Result` type for demos core operations.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Errors that can occur while configuring or driving a demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your demos.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Confidence rating outside the 0-10 scale.
    #[error("Confidence must be between 0 and 10, got {value}")]
    InvalidConfidence {
        /// The rejected value.
        value: u32,
    },

    /// Unknown dashboard scenario name.
    #[error("Unknown scenario '{value}'\n\nSuggestion: Use one of 'baseline', 'transition'")]
    InvalidScenario {
        /// The rejected name.
        value: String,
    },

    /// Unknown study arm name.
    #[error("Unknown arm '{value}'\n\nSuggestion: Use one of 'control', 'ai', 'ai_adaptive'")]
    InvalidArm {
        /// The rejected name.
        value: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DemoError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if the error comes from user input rather than setup.
    ///
    /// Input errors are recoverable at the prompt; everything else aborts.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfidence { .. } | Self::InvalidScenario { .. } | Self::InvalidArm { .. }
        )
    }
}
