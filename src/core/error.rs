//! Error types for meshterrain

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Sampling cancelled at row {row} of {total}")]
    Cancelled { row: usize, total: usize },

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
