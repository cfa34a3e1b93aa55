//! Error types for exportgrid library.

use std::io;
use thiserror::Error;

/// Result type alias for exportgrid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or exporting a grid.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout document is not valid JSON or does not match the schema.
    #[error("Layout parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A component or page carries non-finite or negative geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A page was added after the grid was rendered.
    #[error("Grid is already prepared; no further pages can be added")]
    AlreadyPrepared,

    /// The grid must be prepared before it can be exported.
    #[error("Grid is not prepared")]
    NotPrepared,

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}
