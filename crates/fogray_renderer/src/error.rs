//! Errors reported by the renderer.

use thiserror::Error;

/// Errors that can occur while configuring or running the renderer.
///
/// None of these abort a frame in progress: degenerate samples are replaced
/// with fog and failed jobs have their rows repainted.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Degenerate geometry while sampling pixel ({x}, {y})")]
    DegenerateGeometry { x: f32, y: f32 },

    #[error("Render job {index} failed")]
    JobFailed { index: usize },

    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
