//! Grid compositor.
//!
//! Turns grid line updates into pixels on the back surface. Cells are laid
//! out on a fixed pixel grid: cell `(row, column)` covers
//! `column * width .. (column + 1) * width` horizontally and
//! `row * height .. (row + 1) * height` vertically, with glyphs drawn on a
//! baseline `metrics.baseline` pixels above the bottom of the cell.

use crate::cursor::{CursorGeometry, CursorWidget};
use crate::error::RenderError;
use crate::highlight::{CellStyle, HighlightTable};
use crate::surface::{FrameBuffers, Surface};
use tau_config::{Color, Config};
use tau_fonts::{CellMetrics, GlyphSource, GlyphStyle};

/// A run of identical cells within one grid line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRun {
    /// Cell text; empty for the right half of a double-width character
    pub text: String,
    /// Highlight id, or `None` to reuse the previous run's id
    pub highlight: Option<u64>,
    /// Number of consecutive cells the run covers
    pub repeat: usize,
}

impl CellRun {
    pub fn new(text: impl Into<String>, highlight: Option<u64>, repeat: usize) -> Self {
        Self {
            text: text.into(),
            highlight,
            repeat,
        }
    }
}

/// Draws grid content into double-buffered surfaces.
pub struct GridCompositor {
    buffers: FrameBuffers,
    metrics: CellMetrics,
    glyphs: Box<dyn GlyphSource>,
    grid_size: (u32, u32),
    cursor: CursorWidget,
}

impl std::fmt::Debug for GridCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridCompositor")
            .field("size", &self.buffers.size())
            .field("metrics", &self.metrics)
            .field("grid_size", &self.grid_size)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl GridCompositor {
    pub fn new(
        metrics: CellMetrics,
        glyphs: Box<dyn GlyphSource>,
        width: u32,
        height: u32,
        cursor_color: Color,
        cursor_opacity: f32,
    ) -> Self {
        Self {
            buffers: FrameBuffers::new(width, height),
            metrics,
            glyphs,
            grid_size: (0, 0),
            cursor: CursorWidget::new(&metrics, cursor_color, cursor_opacity),
        }
    }

    /// Build a compositor sized to the configured viewport.
    pub fn from_config(config: &Config, glyphs: Box<dyn GlyphSource>) -> Self {
        Self::new(
            CellMetrics::from_config(config),
            glyphs,
            config.viewport_width,
            config.viewport_height,
            config.cursor_color,
            config.cursor_opacity,
        )
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Record the editor's grid size. Surfaces are sized by the viewport, not the grid.
    pub fn grid_resize(&mut self, columns: u32, rows: u32) {
        log::debug!("Grid resized to {}x{}", columns, rows);
        self.grid_size = (columns, rows);
    }

    pub fn grid_size(&self) -> (u32, u32) {
        self.grid_size
    }

    /// Resize back and front surfaces to the viewport's pixel size.
    pub fn resize_surfaces(&mut self, width: u32, height: u32) {
        log::debug!("Resizing surfaces to {}x{}", width, height);
        self.buffers.resize(width, height);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.buffers.size()
    }

    /// Fill the back surface with the default background.
    pub fn clear(&mut self, highlights: &HighlightTable) {
        let background = highlights.default_colors().background;
        self.buffers.back_mut().fill(background);
    }

    /// Draw a sequence of cell runs starting at `(row, column)`.
    ///
    /// A run without a highlight id reuses the id of the previous run in the
    /// same call. Cells are resolved against the highlight table one at a time.
    pub fn draw_line(
        &mut self,
        highlights: &HighlightTable,
        row: u32,
        column: u32,
        runs: &[CellRun],
    ) -> Result<(), RenderError> {
        let mut last_highlight: Option<u64> = None;
        let mut column = column;

        for run in runs {
            let id = match run.highlight {
                Some(id) => id,
                None => last_highlight.ok_or(RenderError::MissingHighlight { row, column })?,
            };
            last_highlight = Some(id);

            for _ in 0..run.repeat {
                let style = highlights.resolve(id)?;
                self.draw_cell(row, column, &run.text, &style);
                column = column.saturating_add(1);
            }
        }
        Ok(())
    }

    fn draw_cell(&mut self, row: u32, column: u32, text: &str, style: &CellStyle) {
        let metrics = self.metrics;
        let (surface_width, surface_height) = self.buffers.size();
        // Cells starting outside the surface have nothing to paint
        let Some((x, y)) = metrics
            .cell_origin(row, column)
            .filter(|&(x, y)| x < surface_width && y < surface_height)
        else {
            return;
        };
        let baseline_y = y + metrics.height - metrics.baseline;

        let glyph = self.glyphs.rasterize(
            text,
            GlyphStyle {
                bold: style.bold,
                italic: style.italic,
            },
        );

        let back = self.buffers.back_mut();
        back.fill_rect(x, y, metrics.width, metrics.height, style.background);

        if let Some(glyph) = glyph {
            back.blend_mask(
                x as i32 + glyph.left,
                baseline_y as i32 - glyph.top,
                &glyph,
                style.foreground,
            );
        }

        draw_decorations(back, x, y, baseline_y, &metrics, style);
    }

    /// Present the back surface. Returns whether the front surface changed.
    pub fn flush(&mut self) -> bool {
        self.buffers.present()
    }

    pub fn cursor_goto(&mut self, row: u32, column: u32) {
        self.cursor.row = row;
        self.cursor.column = column;
    }

    pub fn set_cursor_geometry(&mut self, geometry: CursorGeometry) {
        self.cursor.geometry = geometry;
    }

    pub fn cursor(&self) -> &CursorWidget {
        &self.cursor
    }

    /// Swap the glyph source and cell metrics, e.g. after a font change.
    pub fn set_glyph_source(&mut self, glyphs: Box<dyn GlyphSource>, metrics: CellMetrics) {
        log::info!(
            "Glyph source changed to {:?} ({}x{} cells)",
            glyphs.family(),
            metrics.width,
            metrics.height
        );
        self.glyphs = glyphs;
        self.metrics = metrics;
    }

    pub fn back(&self) -> &Surface {
        self.buffers.back()
    }

    pub fn front(&self) -> &Surface {
        self.buffers.front()
    }
}

/// Underline-style decorations in the special color, strikethrough in the foreground.
fn draw_decorations(
    surface: &mut Surface,
    x: u32,
    y: u32,
    baseline_y: u32,
    metrics: &CellMetrics,
    style: &CellStyle,
) {
    let width = metrics.width;
    let bottom = y + metrics.height - 1;
    let under_y = (baseline_y + 1).min(bottom);

    if style.underline {
        surface.fill_rect(x, under_y, width, 1, style.special);
    }
    if style.underdouble {
        surface.fill_rect(x, under_y, width, 1, style.special);
        surface.fill_rect(x, (under_y + 2).min(bottom), width, 1, style.special);
    }
    if style.undercurl {
        for dx in 0..width {
            let dy = if (dx / 2) % 2 == 0 { 0 } else { 1 };
            surface.fill_rect(x + dx, (under_y + dy).min(bottom), 1, 1, style.special);
        }
    }
    if style.underdotted {
        for dx in (0..width).step_by(2) {
            surface.fill_rect(x + dx, under_y, 1, 1, style.special);
        }
    }
    if style.underdashed {
        for dx in (0..width).filter(|dx| dx % 4 < 3) {
            surface.fill_rect(x + dx, under_y, 1, 1, style.special);
        }
    }
    if style.strikethrough {
        let strike_y = y + (baseline_y - y) * 2 / 3;
        surface.fill_rect(x, strike_y, width, 1, style.foreground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Highlight;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use tau_fonts::GlyphBitmap;

    const RED: Color = Color::new(0xFF, 0, 0);

    /// Records rasterized text and returns a single covered pixel just above the baseline.
    struct DotGlyphs(Rc<RefCell<Vec<String>>>);

    impl GlyphSource for DotGlyphs {
        fn rasterize(&mut self, text: &str, _style: GlyphStyle) -> Option<Arc<GlyphBitmap>> {
            if text.trim().is_empty() {
                return None;
            }
            self.0.borrow_mut().push(text.to_string());
            Some(Arc::new(GlyphBitmap {
                width: 1,
                height: 1,
                left: 1,
                top: 1,
                coverage: vec![255],
            }))
        }
    }

    fn compositor() -> (GridCompositor, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let compositor = GridCompositor::new(
            CellMetrics::new(9, 18, 5),
            Box::new(DotGlyphs(log.clone())),
            800,
            600,
            Color::WHITE,
            0.6,
        );
        (compositor, log)
    }

    fn red_table() -> HighlightTable {
        let mut table = HighlightTable::default();
        table.define(
            1,
            Highlight {
                foreground: Some(RED),
                ..Highlight::default()
            },
        );
        table
    }

    /// Pixel where `DotGlyphs` lands inside cell `(row, column)`.
    fn dot(row: u32, column: u32) -> (u32, u32) {
        (column * 9 + 1, row * 18 + 18 - 5 - 1)
    }

    #[test]
    fn test_runs_expand_and_reuse_highlight() {
        let (mut compositor, log) = compositor();
        let table = red_table();
        compositor
            .draw_line(
                &table,
                3,
                2,
                &[CellRun::new("A", Some(1), 1), CellRun::new("B", None, 3)],
            )
            .unwrap();

        assert_eq!(*log.borrow(), vec!["A", "B", "B", "B"]);
        for column in 2..=5 {
            let (x, y) = dot(3, column);
            assert_eq!(compositor.back().pixel(x, y), Some([0xFF, 0, 0, 0xFF]));
            // background of the cell comes from the default highlight
            assert_eq!(
                compositor.back().pixel(column * 9, 3 * 18),
                Some([0, 0, 0, 0xFF])
            );
        }
        let (x, y) = dot(3, 6);
        assert_eq!(compositor.back().pixel(x, y), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_first_run_without_highlight_fails() {
        let (mut compositor, _) = compositor();
        let err = compositor
            .draw_line(&red_table(), 0, 4, &[CellRun::new("x", None, 1)])
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingHighlight { row: 0, column: 4 }
        ));
    }

    #[test]
    fn test_highlight_accumulator_does_not_leak_between_lines() {
        let (mut compositor, _) = compositor();
        let table = red_table();
        compositor
            .draw_line(&table, 0, 0, &[CellRun::new("a", Some(1), 1)])
            .unwrap();
        assert!(
            compositor
                .draw_line(&table, 1, 0, &[CellRun::new("b", None, 1)])
                .is_err()
        );
    }

    #[test]
    fn test_unknown_highlight_fails() {
        let (mut compositor, _) = compositor();
        let err = compositor
            .draw_line(&red_table(), 0, 0, &[CellRun::new("a", Some(9), 1)])
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownHighlight(9)));
    }

    #[test]
    fn test_reverse_highlight_swaps_cell_colors() {
        let (mut compositor, _) = compositor();
        let mut table = red_table();
        table.define(
            2,
            Highlight {
                foreground: Some(RED),
                reverse: true,
                ..Highlight::default()
            },
        );
        compositor
            .draw_line(&table, 0, 0, &[CellRun::new("a", Some(2), 1)])
            .unwrap();
        assert_eq!(compositor.back().pixel(0, 0), Some([0xFF, 0, 0, 0xFF]));
        let (x, y) = dot(0, 0);
        assert_eq!(compositor.back().pixel(x, y), Some([0, 0, 0, 0xFF]));
    }

    #[test]
    fn test_clear_uses_default_background() {
        let (mut compositor, _) = compositor();
        let mut table = HighlightTable::default();
        table.set_default_colors(None, Some(Color::new(0x10, 0x20, 0x30)), None);
        compositor.clear(&table);
        assert_eq!(
            compositor.back().pixel(799, 599),
            Some([0x10, 0x20, 0x30, 0xFF])
        );
    }

    #[test]
    fn test_flush_publishes_back_surface_once() {
        let (mut compositor, _) = compositor();
        let table = red_table();
        compositor
            .draw_line(&table, 0, 0, &[CellRun::new("a", Some(1), 1)])
            .unwrap();
        assert_eq!(compositor.front().pixel(0, 0), Some([0, 0, 0, 0]));

        assert!(compositor.flush());
        assert_eq!(compositor.front(), compositor.back());
        assert!(!compositor.flush());
        assert_eq!(compositor.front(), compositor.back());
    }

    #[test]
    fn test_draw_outside_surface_is_clipped() {
        let (mut compositor, _) = compositor();
        compositor.resize_surfaces(90, 36);
        compositor
            .draw_line(&red_table(), 5, 20, &[CellRun::new("a", Some(1), 3)])
            .unwrap();
        assert_eq!(compositor.surface_size(), (90, 36));
    }

    #[test]
    fn test_far_away_cells_and_cursor_are_skipped() {
        let (mut compositor, log) = compositor();
        let table = red_table();
        compositor
            .draw_line(
                &table,
                300_000_000,
                0,
                &[CellRun::new("a", Some(1), 1)],
            )
            .unwrap();
        compositor
            .draw_line(
                &table,
                0,
                u32::MAX - 1,
                &[CellRun::new("b", Some(1), 3)],
            )
            .unwrap();
        assert!(log.borrow().is_empty());

        compositor.cursor_goto(300_000_000, 0);
        // nothing was painted, so there is nothing to present
        assert!(!compositor.flush());
        let image = compositor.screenshot().unwrap();
        assert_eq!(image.dimensions(), (800, 600));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_underline_uses_special_color() {
        let (mut compositor, _) = compositor();
        let mut table = HighlightTable::default();
        table.define(
            3,
            Highlight {
                special: Some(RED),
                underline: true,
                ..Highlight::default()
            },
        );
        compositor
            .draw_line(&table, 0, 0, &[CellRun::new(" ", Some(3), 1)])
            .unwrap();
        // baseline at y = 13, underline one pixel below it
        assert_eq!(compositor.back().pixel(4, 14), Some([0xFF, 0, 0, 0xFF]));
    }
}
