//! Typed error types for tau-redraw.

use thiserror::Error;

use crate::client::ClientError;
use tau_render::RenderError;

/// Errors that abort processing of an inbound notification.
///
/// All of them are fatal for the view: there is no recovery path once the
/// editor and the front-end disagree about protocol state.
#[derive(Debug, Error)]
pub enum RedrawError {
    /// A recognized event arrived with arguments of the wrong shape.
    #[error("malformed arguments for '{event}': {reason}")]
    MalformedArgs { event: String, reason: String },

    /// A grid event targeted a grid other than the primary one.
    #[error("grid {0} is not supported, only the primary grid is")]
    UnsupportedGrid(u64),

    /// Highlight, mode or cell-run state the editor never delivered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The outbound channel to the editor is gone.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// No usable font could be loaded for a font change.
    #[error("font change failed: {0:#}")]
    Font(anyhow::Error),
}

impl RedrawError {
    pub(crate) fn malformed(event: &str, reason: impl Into<String>) -> Self {
        RedrawError::MalformedArgs {
            event: event.to_string(),
            reason: reason.into(),
        }
    }
}
