//! The glyph seam between font handling and the compositor.

use std::sync::Arc;

/// Style selectors that pick a font face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphStyle {
    pub bold: bool,
    pub italic: bool,
}

/// An 8-bit coverage mask positioned relative to the pen origin on the baseline.
///
/// `left` is the horizontal offset of the first column from the pen position,
/// `top` is the distance from the baseline up to the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Coverage at `(x, y)` inside the mask.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }
}

/// Produces glyph masks for cell text.
pub trait GlyphSource {
    /// Rasterize the text of a single cell. `None` means nothing is drawn
    /// (blank text or no face has a glyph for it).
    fn rasterize(&mut self, text: &str, style: GlyphStyle) -> Option<Arc<GlyphBitmap>>;

    /// Family name of the primary face, if any.
    fn family(&self) -> Option<&str> {
        None
    }
}

/// Glyph source used when no font could be loaded: cells keep their
/// backgrounds but no glyphs are drawn.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGlyphs;

impl GlyphSource for NullGlyphs {
    fn rasterize(&mut self, _text: &str, _style: GlyphStyle) -> Option<Arc<GlyphBitmap>> {
        None
    }
}
