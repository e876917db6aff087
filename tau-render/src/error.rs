//! Typed error types for tau-render.

use thiserror::Error;

/// Errors raised while applying redraw state to the grid.
///
/// Every variant except `Image`/`ScreenshotImageAssembly` is a protocol
/// violation: the editor referenced state it never delivered.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A draw referenced a highlight id that was never defined.
    #[error("highlight {0} was never defined")]
    UnknownHighlight(u64),

    /// A mode change referenced an index outside the mode descriptor list,
    /// or arrived before any descriptors (`len` is 0).
    #[error("mode index {index} is out of range ({len} modes)")]
    InvalidModeIndex { index: usize, len: usize },

    /// A cell run without a highlight id had no preceding run in the same line.
    #[error("cell run at row {row}, column {column} has no highlight to repeat")]
    MissingHighlight { row: u32, column: u32 },

    /// The screenshot image could not be written.
    #[error("screenshot export failed: {0}")]
    Image(#[from] image::ImageError),

    /// The pixel data could not be assembled into an image.
    #[error("screenshot image assembly failed")]
    ScreenshotImageAssembly,
}

impl RenderError {
    /// Whether this error reports corrupt protocol state rather than an I/O failure.
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(
            self,
            RenderError::Image(_) | RenderError::ScreenshotImageAssembly
        )
    }
}
