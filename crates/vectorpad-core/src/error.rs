//! Error types surfaced by the editor.

use thiserror::Error;

/// Editor errors.
///
/// Faults that the interaction loop can recover from on its own (dangling
/// handles, emptied polygons, clicks too far from any edge) are logged and
/// never reach this type.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid surface target: {0}")]
    InvalidSurfaceTarget(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
