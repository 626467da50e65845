//! Error types for deck rendering.

use thiserror::Error;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering a deck
///
/// Only failures that prevent the pipeline from producing any output at all
/// are surfaced here; per-directive and per-asset problems degrade in place
/// with a logged warning instead.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Source document not found or inaccessible
    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    /// Template source could not be loaded
    #[error("Template error: {reason}")]
    TemplateError { reason: String },

    /// Structural markdown parse failure reported by the engine
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error (engine options blob)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RenderError {
    /// Create a source not found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a template error
    pub fn template_error(reason: impl Into<String>) -> Self {
        Self::TemplateError {
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::ParseError {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "DECK001",
            Self::TemplateError { .. } => "DECK002",
            Self::ParseError { .. } => "DECK003",
            Self::IoError(_) => "DECK004",
            Self::JsonError(_) => "DECK005",
        }
    }
}
