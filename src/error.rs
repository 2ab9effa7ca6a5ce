use folio_layout::LayoutError;
use folio_render_core::RenderError;
use folio_traits::{CaptureError, MeasureError};
use thiserror::Error;

/// Everything that can abort an export. No partial artifact is produced when
/// any of these is returned.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Measurement failed: {0}")]
    Measurement(#[from] MeasureError),

    #[error("Render capture failed: {0}")]
    RenderCapture(#[from] CaptureError),

    #[error("Document encoding failed: {0}")]
    Encoding(#[from] RenderError),

    #[error("Layout failed: {0}")]
    Layout(LayoutError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<LayoutError> for ExportError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Measurement(e) => ExportError::Measurement(e),
            other => ExportError::Layout(other),
        }
    }
}
