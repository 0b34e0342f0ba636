//! Error types for image rendering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("raster of {rows}x{cols} cannot be rendered as an image")]
    Dimensions { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;
