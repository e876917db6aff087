//! Cell and font metrics.

use tau_config::Config;

/// Fixed pixel metrics of one grid cell.
///
/// The grid is laid out on these regardless of the loaded font; glyphs are
/// drawn on the baseline `baseline` pixels above the bottom of the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width: u32,
    pub height: u32,
    pub baseline: u32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: tau_config::defaults::cell_width(),
            height: tau_config::defaults::cell_height(),
            baseline: tau_config::defaults::cell_baseline(),
        }
    }
}

impl CellMetrics {
    pub fn new(width: u32, height: u32, baseline: u32) -> Self {
        Self {
            width,
            height,
            baseline,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cell_width, config.cell_height, config.cell_baseline)
    }

    /// Pixel origin (top-left) of the cell at `row`, `column`.
    ///
    /// `None` when the origin does not fit in pixel coordinates.
    pub fn cell_origin(&self, row: u32, column: u32) -> Option<(u32, u32)> {
        Some((
            column.checked_mul(self.width)?,
            row.checked_mul(self.height)?,
        ))
    }

    /// How many whole cells fit into a pixel area, as `(columns, rows)`.
    pub fn grid_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        (width / self.width, height / self.height)
    }
}

/// Font metrics in pixels, calculated from font data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Font ascent (distance from baseline to top)
    pub ascent: f32,
    /// Font descent (distance from baseline to bottom)
    pub descent: f32,
    /// Advance width of 'm'
    pub char_advance: f32,
    /// Font size in pixels
    pub font_size_pixels: f32,
}

impl FontMetrics {
    /// Whether glyphs of this font overflow the given cell.
    pub fn overflows(&self, cell: &CellMetrics) -> bool {
        self.char_advance > cell.width as f32 || self.ascent + self.descent > cell.height as f32
    }
}
