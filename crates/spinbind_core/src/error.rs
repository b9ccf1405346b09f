//! Engine error types

use thiserror::Error;

/// Errors reported by a spinner engine implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine refused to attach to the host element
    #[error("Engine construction failed: {0}")]
    Construction(String),

    /// The requested renderer is not available to this engine
    #[error("Renderer not available: {0}")]
    RendererUnavailable(String),

    /// The host element cannot carry a spinner (wrong element type, detached, ...)
    #[error("Invalid host element: {0}")]
    InvalidHost(String),

    /// Generic engine error
    #[error("Engine error: {0}")]
    Other(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
