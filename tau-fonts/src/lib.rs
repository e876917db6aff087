//! Font management and glyph rasterization for the tau editor front-end.
//!
//! This crate provides:
//! - Font loading through the system font database, with styled variants
//! - The fixed cell metrics the grid is laid out on
//! - The [`GlyphSource`] seam the compositor draws glyphs through, with a
//!   swash-backed [`FontRasterizer`] and a glyph-less [`NullGlyphs`] fallback

mod fallbacks;
pub mod glyph;
mod loader;
pub mod metrics;
pub mod rasterizer;
mod types;

pub use fallbacks::FALLBACK_FAMILIES;
pub use glyph::{GlyphBitmap, GlyphSource, GlyphStyle, NullGlyphs};
pub use metrics::{CellMetrics, FontMetrics};
pub use rasterizer::FontRasterizer;
pub use types::FontData;
