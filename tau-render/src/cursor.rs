//! Cursor style machine and cursor overlay.
//!
//! The editor announces a list of mode descriptors once (`mode_info_set`) and
//! then switches between them by index (`mode_change`). Each switch recomputes
//! the pixel geometry of the cursor overlay from the mode's shape.

use serde::Deserialize;

use crate::error::RenderError;
use tau_config::{Color, Config};
use tau_fonts::CellMetrics;

/// Cursor shape of a mode descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorShape {
    Block,
    Horizontal,
    Vertical,
}

/// One entry of the editor's mode descriptor list.
///
/// Only `cursor_shape` and `cell_percentage` affect geometry; the remaining
/// fields are kept for callers that want them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModeInfo {
    pub cursor_shape: Option<CursorShape>,
    /// Percentage of the cell occupied by thin cursors (defaults to 100)
    pub cell_percentage: Option<u32>,
    pub blinkwait: Option<u64>,
    pub blinkon: Option<u64>,
    pub blinkoff: Option<u64>,
    pub attr_id: Option<u64>,
    pub attr_id_lm: Option<u64>,
    pub short_name: Option<String>,
    pub name: Option<String>,
}

/// Pixel size of the cursor overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorGeometry {
    pub shape: CursorShape,
    pub width: u32,
    pub height: u32,
}

impl CursorGeometry {
    /// Full-cell block cursor.
    pub fn block(metrics: &CellMetrics) -> Self {
        Self {
            shape: CursorShape::Block,
            width: metrics.width,
            height: metrics.height,
        }
    }
}

/// Tracks mode descriptors and the current mode's cursor geometry.
#[derive(Debug, Clone)]
pub struct CursorStyleMachine {
    modes: Option<Vec<ModeInfo>>,
    cursor_style_enabled: bool,
    active: Option<usize>,
    metrics: CellMetrics,
    thin_size: u32,
    geometry: CursorGeometry,
}

impl CursorStyleMachine {
    pub fn new(metrics: CellMetrics, thin_size: u32) -> Self {
        Self {
            modes: None,
            cursor_style_enabled: false,
            active: None,
            metrics,
            thin_size: thin_size.max(1),
            geometry: CursorGeometry::block(&metrics),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(CellMetrics::from_config(config), config.cursor_thin_size)
    }

    /// Replace the mode descriptor list. Does not change the current geometry.
    pub fn set_mode_descriptors(&mut self, cursor_style_enabled: bool, modes: Vec<ModeInfo>) {
        log::debug!(
            "Received {} mode descriptors (cursor style enabled: {})",
            modes.len(),
            cursor_style_enabled
        );
        self.cursor_style_enabled = cursor_style_enabled;
        self.modes = Some(modes);
        self.active = None;
    }

    /// Switch to mode `index` and recompute the cursor geometry.
    ///
    /// A mode without a `cursor_shape` becomes active but leaves the geometry
    /// untouched. On error the geometry and active mode are unchanged.
    pub fn change_mode(&mut self, index: usize) -> Result<CursorGeometry, RenderError> {
        let modes = self
            .modes
            .as_ref()
            .ok_or(RenderError::InvalidModeIndex { index, len: 0 })?;
        let mode = modes.get(index).ok_or(RenderError::InvalidModeIndex {
            index,
            len: modes.len(),
        })?;

        if let Some(shape) = mode.cursor_shape {
            self.geometry = self.geometry_for(shape, mode.cell_percentage.unwrap_or(100));
        }
        self.active = Some(index);
        Ok(self.geometry)
    }

    fn geometry_for(&self, shape: CursorShape, percentage: u32) -> CursorGeometry {
        let fraction = percentage.min(100) as f32 / 100.0;
        let (width, height) = match shape {
            CursorShape::Block => (self.metrics.width, self.metrics.height),
            CursorShape::Horizontal => (
                (fraction * self.metrics.width as f32).round() as u32,
                self.thin_size,
            ),
            CursorShape::Vertical => (
                self.thin_size,
                (fraction * self.metrics.height as f32).round() as u32,
            ),
        };
        CursorGeometry {
            shape,
            width,
            height,
        }
    }

    /// Update cell metrics after a font change, recomputing the active mode's geometry.
    pub fn set_metrics(&mut self, metrics: CellMetrics) {
        self.metrics = metrics;
        self.geometry = CursorGeometry::block(&metrics);
        let active = self
            .active_mode()
            .and_then(|mode| Some((mode.cursor_shape?, mode.cell_percentage.unwrap_or(100))));
        if let Some((shape, percentage)) = active {
            self.geometry = self.geometry_for(shape, percentage);
        }
    }

    pub fn geometry(&self) -> CursorGeometry {
        self.geometry
    }

    pub fn active_mode(&self) -> Option<&ModeInfo> {
        let index = self.active?;
        self.modes.as_ref()?.get(index)
    }

    pub fn cursor_style_enabled(&self) -> bool {
        self.cursor_style_enabled
    }

    pub fn mode_count(&self) -> usize {
        self.modes.as_ref().map_or(0, Vec::len)
    }
}

/// The cursor overlay drawn above the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorWidget {
    pub row: u32,
    pub column: u32,
    pub geometry: CursorGeometry,
    pub color: Color,
    /// Overlay opacity in `0.0..=1.0`
    pub opacity: f32,
}

impl CursorWidget {
    pub fn new(metrics: &CellMetrics, color: Color, opacity: f32) -> Self {
        Self {
            row: 0,
            column: 0,
            geometry: CursorGeometry::block(metrics),
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Pixel rectangle `(x, y, width, height)` covered by the overlay.
    ///
    /// Horizontal cursors sit on the bottom edge of the cell; block and
    /// vertical cursors start at the cell's top-left corner. `None` when the
    /// cell lies beyond pixel coordinates.
    pub fn rect(&self, metrics: &CellMetrics) -> Option<(u32, u32, u32, u32)> {
        let (x, y) = metrics.cell_origin(self.row, self.column)?;
        let y = match self.geometry.shape {
            CursorShape::Horizontal => {
                y.checked_add(metrics.height.saturating_sub(self.geometry.height))?
            }
            CursorShape::Block | CursorShape::Vertical => y,
        };
        Some((x, y, self.geometry.width, self.geometry.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> CursorStyleMachine {
        CursorStyleMachine::new(CellMetrics::new(9, 18, 5), 1)
    }

    fn mode(shape: Option<CursorShape>, percentage: Option<u32>) -> ModeInfo {
        ModeInfo {
            cursor_shape: shape,
            cell_percentage: percentage,
            ..ModeInfo::default()
        }
    }

    #[test]
    fn test_initial_geometry_is_block() {
        let machine = machine();
        assert_eq!(machine.geometry().width, 9);
        assert_eq!(machine.geometry().height, 18);
        assert!(machine.active_mode().is_none());
    }

    #[test]
    fn test_shapes_compute_geometry() {
        let mut machine = machine();
        machine.set_mode_descriptors(
            true,
            vec![
                mode(Some(CursorShape::Block), None),
                mode(Some(CursorShape::Vertical), Some(25)),
                mode(Some(CursorShape::Horizontal), Some(20)),
                mode(Some(CursorShape::Horizontal), None),
            ],
        );

        let vertical = machine.change_mode(1).unwrap();
        assert_eq!((vertical.width, vertical.height), (1, 5)); // 0.25 * 18 = 4.5

        let horizontal = machine.change_mode(2).unwrap();
        assert_eq!((horizontal.width, horizontal.height), (2, 1)); // 0.2 * 9 = 1.8

        let full = machine.change_mode(3).unwrap();
        assert_eq!((full.width, full.height), (9, 1));

        let block = machine.change_mode(0).unwrap();
        assert_eq!((block.width, block.height), (9, 18));
    }

    #[test]
    fn test_mode_without_shape_keeps_geometry() {
        let mut machine = machine();
        machine.set_mode_descriptors(
            true,
            vec![mode(Some(CursorShape::Vertical), Some(50)), mode(None, None)],
        );
        let before = machine.change_mode(0).unwrap();
        let after = machine.change_mode(1).unwrap();
        assert_eq!(before, after);
        assert_eq!(machine.active_mode(), Some(&mode(None, None)));
    }

    #[test]
    fn test_invalid_index_leaves_state_unchanged() {
        let mut machine = machine();
        machine.set_mode_descriptors(true, vec![mode(Some(CursorShape::Vertical), Some(50))]);
        let before = machine.change_mode(0).unwrap();

        let err = machine.change_mode(4).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidModeIndex { index: 4, len: 1 }
        ));
        assert_eq!(machine.geometry(), before);
    }

    #[test]
    fn test_change_before_descriptors_fails() {
        let mut machine = machine();
        assert!(matches!(
            machine.change_mode(0),
            Err(RenderError::InvalidModeIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_set_metrics_recomputes_active_mode() {
        let mut machine = machine();
        machine.set_mode_descriptors(true, vec![mode(Some(CursorShape::Horizontal), None)]);
        machine.change_mode(0).unwrap();
        machine.set_metrics(CellMetrics::new(10, 20, 5));
        assert_eq!(machine.geometry().width, 10);
        assert_eq!(machine.geometry().height, 1);
    }

    #[test]
    fn test_horizontal_widget_sits_on_cell_bottom() {
        let metrics = CellMetrics::new(9, 18, 5);
        let mut widget = CursorWidget::new(&metrics, Color::WHITE, 0.6);
        widget.row = 2;
        widget.column = 3;
        widget.geometry = CursorGeometry {
            shape: CursorShape::Horizontal,
            width: 9,
            height: 1,
        };
        assert_eq!(widget.rect(&metrics), Some((27, 53, 9, 1)));
    }

    #[test]
    fn test_widget_beyond_pixel_range_has_no_rect() {
        let metrics = CellMetrics::new(9, 18, 5);
        let mut widget = CursorWidget::new(&metrics, Color::WHITE, 0.6);
        widget.row = 300_000_000;
        assert_eq!(widget.rect(&metrics), None);
    }

    #[test]
    fn test_deserialize_mode_descriptor() {
        let value = serde_json::json!({
            "cursor_shape": "vertical",
            "cell_percentage": 25,
            "blinkon": 400,
            "name": "insert",
            "short_name": "i",
            "mouse_shape": 0
        });
        let info: ModeInfo = serde_json::from_value(value).unwrap();
        assert_eq!(info.cursor_shape, Some(CursorShape::Vertical));
        assert_eq!(info.cell_percentage, Some(25));
        assert_eq!(info.short_name.as_deref(), Some("i"));
    }
}
