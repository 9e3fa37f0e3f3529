//! Error types for the command-line tools.

use thiserror::Error;
use tycoon_core::error::GameError;

/// Failures of a `tycoon` subcommand.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Engine-level failure (catalog, config, snapshot).
    #[error(transparent)]
    Game(#[from] GameError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be rendered.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] ron::Error),
}

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;
