//! Error type shared by world construction, configuration loading and export.
//!
//! Generation itself never fails: placement failures are reported as counts,
//! not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// Width or height of zero
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unreadable world configuration
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Pixel dimensions of an export do not fit in `u32`
    #[error("image of {width}x{height} tiles at scale {scale} is too large")]
    ImageTooLarge { width: usize, height: usize, scale: u32 },

    #[error("image export error: {0}")]
    Image(#[from] image::ImageError),
}
