//! Cell-grid compositor for the tau editor front-end.
//!
//! This crate owns everything between decoded redraw events and pixels:
//!
//! - [`highlight`]: the highlight table and reverse-aware color composition
//! - [`cursor`]: mode descriptors, the cursor style machine and the cursor overlay
//! - [`surface`]: RGBA pixel surfaces and the back/front pair presented on flush
//! - [`compositor`]: draws grid lines into the back surface
//! - [`screenshot`]: exports the presented frame with the cursor overlay

pub mod compositor;
pub mod cursor;
pub mod error;
pub mod highlight;
pub mod screenshot;
pub mod surface;

pub use compositor::{CellRun, GridCompositor};
pub use cursor::{CursorGeometry, CursorShape, CursorStyleMachine, CursorWidget, ModeInfo};
pub use error::RenderError;
pub use highlight::{CellStyle, DefaultColors, Highlight, HighlightTable};
pub use surface::{FrameBuffers, Surface};
pub use tau_config::Color;
pub use tau_fonts::CellMetrics;
