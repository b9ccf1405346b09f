//! Error types for spinbind_binding

use spinbind_core::EngineError;
use thiserror::Error;

/// Errors that can occur while driving a binding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The engine could not be constructed; the binding stays unmounted
    #[error("Engine construction failed: {0}")]
    EngineConstruction(#[from] EngineError),

    /// `mount` was called on a binding that already owns a live engine
    #[error("Binding is already mounted")]
    AlreadyMounted,

    /// A widget description could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for BindingError {
    fn from(err: toml::de::Error) -> Self {
        BindingError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BindingError {
    fn from(err: serde_json::Error) -> Self {
        BindingError::Config(err.to_string())
    }
}

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, BindingError>;
