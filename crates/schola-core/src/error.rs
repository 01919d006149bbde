//! Error types for the Nova Schola application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Nova Schola application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ScholaError {
    /// Authentication failure: bad credentials, role mismatch, or an
    /// unreachable auth backend. Recovered by re-showing the login form;
    /// never retried automatically.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A required field is missing or malformed. Raised before any
    /// network call is made.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The backing store is unreachable. Read paths degrade to defaults;
    /// write paths surface this to the user and leave state unchanged.
    #[error("Adapter '{service}' unavailable: {message}")]
    AdapterUnavailable { service: String, message: String },

    /// An AI provider failed or returned malformed output. The consuming
    /// screen falls back to an empty result and allows a manual retry.
    #[error("AI generation failed: {0}")]
    AiGeneration(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScholaError {
    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an AdapterUnavailable error
    pub fn adapter_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AdapterUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates an AiGeneration error
    pub fn ai_generation(message: impl Into<String>) -> Self {
        Self::AiGeneration(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an Auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is an AdapterUnavailable error
    pub fn is_adapter_unavailable(&self) -> bool {
        matches!(self, Self::AdapterUnavailable { .. })
    }

    /// Check if this is an AiGeneration error
    pub fn is_ai_generation(&self) -> bool {
        matches!(self, Self::AiGeneration(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for ScholaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ScholaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScholaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ScholaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error at the binary boundary
impl From<anyhow::Error> for ScholaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ScholaError>`.
pub type Result<T> = std::result::Result<T, ScholaError>;
