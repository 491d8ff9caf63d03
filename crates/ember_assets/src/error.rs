use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OpenEXR codec error: {0}")]
    Exr(#[from] exr::error::Error),

    #[error("no codec for {} with this texel type", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("mip level {level} is {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        level: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("mip level {level} not found at {}", .path.display())]
    MissingLevel { level: usize, path: PathBuf },
}
