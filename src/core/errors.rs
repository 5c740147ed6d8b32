//! Error types for the qiming-rs library.
//!
//! This module provides structured error handling for every qiming operation,
//! with error types that preserve context and enable proper error propagation
//! throughout the naming pipeline.

use std::io;

use thiserror::Error;

/// Main result type for qiming operations.
pub type Result<T> = std::result::Result<T, QimingError>;

/// Error type for all qiming operations.
#[derive(Error, Debug)]
pub enum QimingError {
    /// I/O related errors (data tables, configuration files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Validation errors for request or configuration input
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being processed
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Naming pipeline errors
    #[error("Pipeline error at plugin '{plugin}': {message}")]
    Pipeline {
        /// Plugin where the error occurred
        plugin: String,
        /// Error description
        message: String,
    },

    /// The pipeline exceeded its time budget
    #[error("Pipeline exceeded its time budget of {budget_ms} ms")]
    Timeout {
        /// Configured budget in milliseconds
        budget_ms: u64,
    },

    /// Character data errors
    #[error("Character data error: {message}")]
    Data {
        /// Error description
        message: String,
        /// Character involved, if any
        character: Option<char>,
    },
}

impl QimingError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new pipeline assembly error
    pub fn pipeline(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create a new character data error
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
            character: None,
        }
    }
}

impl From<serde_json::Error> for QimingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for QimingError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}
