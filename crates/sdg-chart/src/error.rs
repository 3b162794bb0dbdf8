use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use sdg_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("chart area {width}x{height} is too small")]
    TooSmall { width: u32, height: u32 },

    #[error("font {}: {message}", path.display())]
    Font { path: PathBuf, message: String },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(e.to_string())
    }
}
