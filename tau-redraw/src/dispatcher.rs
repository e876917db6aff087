//! Redraw dispatcher.
//!
//! Applies decoded redraw events to the highlight table, cursor style machine
//! and compositor. Batches are applied in array order and occurrences within
//! a batch in array order; a notification is fully applied before the call
//! returns.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::RedrawError;
use crate::event::{Notification, RedrawEvent};
use tau_config::{Color, Config};
use tau_fonts::GlyphSource;
use tau_render::{CursorStyleMachine, DefaultColors, GridCompositor, HighlightTable};

/// The only grid this front-end draws.
pub const PRIMARY_GRID: u64 = 1;

/// What the host should do after a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// The editor asked the view to shut down.
    Quit,
}

/// Owns all redraw state and applies notifications to it.
#[derive(Debug)]
pub struct RedrawDispatcher {
    highlights: HighlightTable,
    cursor_style: CursorStyleMachine,
    compositor: GridCompositor,
    title: Option<String>,
    options: HashMap<String, Value>,
    mouse_enabled: bool,
    mode_name: Option<String>,
    viewport_background: Color,
}

impl RedrawDispatcher {
    pub fn new(config: &Config, glyphs: Box<dyn GlyphSource>) -> Self {
        let defaults = DefaultColors::from_config(config);
        Self {
            highlights: HighlightTable::new(defaults),
            cursor_style: CursorStyleMachine::from_config(config),
            compositor: GridCompositor::from_config(config, glyphs),
            title: None,
            options: HashMap::new(),
            mouse_enabled: false,
            mode_name: None,
            viewport_background: defaults.background,
        }
    }

    /// Apply one inbound notification.
    ///
    /// Occurrences are decoded and applied one at a time. Returns at the first
    /// error; occurrences before it, including earlier ones in the same batch,
    /// stay applied.
    pub fn handle_notification(
        &mut self,
        notification: &Notification,
    ) -> Result<Control, RedrawError> {
        match notification.method.as_str() {
            "redraw" => {
                for batch in &notification.params {
                    for event in RedrawEvent::parse_batch(batch)? {
                        self.apply(event?)?;
                    }
                }
                Ok(Control::Continue)
            }
            "quit" => {
                log::info!("Editor requested quit");
                Ok(Control::Quit)
            }
            other => {
                log::warn!("Ignoring unsupported notification '{}'", other);
                Ok(Control::Continue)
            }
        }
    }

    /// Apply a single redraw event.
    pub fn apply(&mut self, event: RedrawEvent) -> Result<(), RedrawError> {
        log::trace!("Applying {:?}", event);
        match event {
            RedrawEvent::SetTitle(title) => {
                log::debug!("Title set to {:?}", title);
                self.title = Some(title);
            }
            RedrawEvent::ModeInfoSet {
                cursor_style_enabled,
                modes,
            } => self
                .cursor_style
                .set_mode_descriptors(cursor_style_enabled, modes),
            RedrawEvent::OptionSet { name, value } => {
                log::debug!("Option {} = {}", name, value);
                self.options.insert(name, value);
            }
            RedrawEvent::ModeChange { name, index } => {
                let geometry = self.cursor_style.change_mode(index)?;
                log::debug!("Mode changed to '{}' ({})", name, index);
                self.compositor.set_cursor_geometry(geometry);
                self.mode_name = Some(name);
            }
            RedrawEvent::MouseOn => self.mouse_enabled = true,
            RedrawEvent::MouseOff => self.mouse_enabled = false,
            RedrawEvent::Flush => {
                self.compositor.flush();
            }
            RedrawEvent::GridResize {
                grid,
                width,
                height,
            } => {
                check_grid(grid)?;
                self.compositor.grid_resize(width, height);
            }
            RedrawEvent::DefaultColorsSet {
                foreground,
                background,
                special,
            } => {
                self.highlights
                    .set_default_colors(foreground, background, special);
                self.viewport_background = self.highlights.default_colors().background;
            }
            RedrawEvent::HlAttrDefine { id, attrs } => self.highlights.define(id, attrs),
            RedrawEvent::GridLine {
                grid,
                row,
                column,
                runs,
            } => {
                check_grid(grid)?;
                self.compositor
                    .draw_line(&self.highlights, row, column, &runs)?;
            }
            RedrawEvent::GridClear { grid } => {
                check_grid(grid)?;
                self.compositor.clear(&self.highlights);
            }
            RedrawEvent::GridCursorGoto { grid, row, column } => {
                check_grid(grid)?;
                self.compositor.cursor_goto(row, column);
            }
            RedrawEvent::HlGroupSet | RedrawEvent::GridDestroy { .. } | RedrawEvent::GridScroll => {
                log::debug!("Accepted no-op event {:?}", event);
            }
            RedrawEvent::SetIcon
            | RedrawEvent::BusyStart
            | RedrawEvent::BusyStop
            | RedrawEvent::Suspend
            | RedrawEvent::UpdateMenu
            | RedrawEvent::Bell
            | RedrawEvent::VisualBell => {
                log::warn!("Ignoring unsupported event {:?}", event);
            }
            RedrawEvent::Unknown(name) => {
                log::warn!("Ignoring unknown redraw event '{}'", name);
            }
        }
        Ok(())
    }

    pub fn highlights(&self) -> &HighlightTable {
        &self.highlights
    }

    pub fn cursor_style(&self) -> &CursorStyleMachine {
        &self.cursor_style
    }

    pub fn cursor_style_mut(&mut self) -> &mut CursorStyleMachine {
        &mut self.cursor_style
    }

    pub fn compositor(&self) -> &GridCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut GridCompositor {
        &mut self.compositor
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Last value the editor sent for option `name`.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Name of the active mode, as sent with the last mode change.
    pub fn mode_name(&self) -> Option<&str> {
        self.mode_name.as_deref()
    }

    /// Color shown behind the surfaces where no cell has been drawn.
    pub fn viewport_background(&self) -> Color {
        self.viewport_background
    }
}

fn check_grid(grid: u64) -> Result<(), RedrawError> {
    if grid == PRIMARY_GRID {
        Ok(())
    } else {
        Err(RedrawError::UnsupportedGrid(grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tau_fonts::NullGlyphs;
    use tau_render::{CursorShape, RenderError};

    fn dispatcher() -> RedrawDispatcher {
        RedrawDispatcher::new(&Config::default(), Box::new(NullGlyphs))
    }

    fn redraw(batches: Value) -> Notification {
        let Value::Array(params) = batches else {
            panic!("batches must be an array");
        };
        Notification::new("redraw", params)
    }

    #[test]
    fn test_hl_attr_define_last_write_wins() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["hl_attr_define",
                    [3, {"foreground": 0xFF0000, "bold": true}, {}, []],
                    [3, {"background": 0x00FF00}, {}, []]]
            ])))
            .unwrap();
        let hl = dispatcher.highlights().lookup(3).unwrap();
        assert_eq!(hl.foreground, None);
        assert_eq!(hl.background, Some(Color::new(0, 0xFF, 0)));
        assert!(!hl.bold);
    }

    #[test]
    fn test_default_colors_set_updates_default_and_viewport() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["default_colors_set", [0x112233, 0x445566, 0x778899, 0, 0]]
            ])))
            .unwrap();
        let default = dispatcher.highlights().lookup(0).unwrap();
        assert_eq!(default.foreground, Some(Color::new(0x11, 0x22, 0x33)));
        assert_eq!(default.background, Some(Color::new(0x44, 0x55, 0x66)));
        assert_eq!(default.special, Some(Color::new(0x77, 0x88, 0x99)));
        assert!(!default.reverse);
        assert_eq!(
            dispatcher.viewport_background(),
            Color::new(0x44, 0x55, 0x66)
        );
    }

    #[test]
    fn test_flush_after_lines_in_same_notification() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["hl_attr_define", [5, {"background": 0xFF0000}, {}, []]],
                ["grid_line", [1, 0, 0, [["a", 5, 2]]], [1, 1, 0, [["b", 5]]]],
                ["flush", []]
            ])))
            .unwrap();
        let front = dispatcher.compositor().front();
        assert_eq!(front.pixel(10, 0), Some([0xFF, 0, 0, 0xFF]));
        assert_eq!(front.pixel(0, 18), Some([0xFF, 0, 0, 0xFF]));
        assert_eq!(front.pixel(18, 18), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draws_stay_invisible_until_flush() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([["grid_clear", [1]]])))
            .unwrap();
        assert_eq!(dispatcher.compositor().front().pixel(0, 0), Some([0, 0, 0, 0]));
        dispatcher
            .handle_notification(&redraw(json!([["flush", []]])))
            .unwrap();
        assert_eq!(
            dispatcher.compositor().front().pixel(0, 0),
            Some([0, 0, 0, 0xFF])
        );
    }

    #[test]
    fn test_mode_change_updates_cursor_geometry() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["mode_info_set", [true, [
                    {"cursor_shape": "block", "name": "normal"},
                    {"cursor_shape": "vertical", "cell_percentage": 25, "name": "insert"}
                ]]],
                ["mode_change", ["insert", 1]]
            ])))
            .unwrap();
        let cursor = dispatcher.compositor().cursor();
        assert_eq!(cursor.geometry.shape, CursorShape::Vertical);
        assert_eq!(cursor.geometry.width, 1);
        assert_eq!(dispatcher.mode_name(), Some("insert"));
    }

    #[test]
    fn test_invalid_mode_index_is_fatal() {
        let mut dispatcher = dispatcher();
        let err = dispatcher
            .handle_notification(&redraw(json!([
                ["mode_info_set", [true, [{"cursor_shape": "block"}]]],
                ["mode_change", ["insert", 3]]
            ])))
            .unwrap_err();
        assert!(matches!(
            err,
            RedrawError::Render(RenderError::InvalidModeIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_mode_change_before_descriptors_is_fatal() {
        let mut dispatcher = dispatcher();
        let err = dispatcher
            .handle_notification(&redraw(json!([["mode_change", ["normal", 0]]])))
            .unwrap_err();
        assert!(matches!(
            err,
            RedrawError::Render(RenderError::InvalidModeIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_occurrences_before_malformed_one_stay_applied() {
        let mut dispatcher = dispatcher();
        let err = dispatcher
            .handle_notification(&redraw(json!([
                ["option_set", ["linespace", 2], ["guifont"]]
            ])))
            .unwrap_err();
        assert!(matches!(err, RedrawError::MalformedArgs { ref event, .. } if event == "option_set"));
        assert_eq!(dispatcher.option("linespace"), Some(&json!(2)));
    }

    #[test]
    fn test_cells_far_outside_the_surface_are_ignored() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["grid_line", [1, 300_000_000, 0, [["a", 0]]]],
                ["grid_cursor_goto", [1, 300_000_000, 0]],
                ["flush", []]
            ])))
            .unwrap();
        let image = dispatcher.compositor().screenshot().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_unknown_highlight_in_grid_line_is_fatal() {
        let mut dispatcher = dispatcher();
        let err = dispatcher
            .handle_notification(&redraw(json!([["grid_line", [1, 0, 0, [["x", 42]]]]])))
            .unwrap_err();
        assert!(matches!(
            err,
            RedrawError::Render(RenderError::UnknownHighlight(42))
        ));
    }

    #[test]
    fn test_secondary_grid_is_rejected() {
        let mut dispatcher = dispatcher();
        let err = dispatcher
            .handle_notification(&redraw(json!([["grid_resize", [2, 80, 24]]])))
            .unwrap_err();
        assert!(matches!(err, RedrawError::UnsupportedGrid(2)));
    }

    #[test]
    fn test_unsupported_events_are_skipped() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["set_icon", ["icon"]],
                ["visual_bell", []],
                ["win_viewport", [2, {}, 0, 10, 0, 0]],
                ["grid_scroll", [1, 0, 10, 0, 80, 1, 0]],
                ["set_title", ["main.rs - tau"]]
            ])))
            .unwrap();
        assert_eq!(dispatcher.title(), Some("main.rs - tau"));
    }

    #[test]
    fn test_quit_and_other_notifications() {
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher
                .handle_notification(&Notification::new("quit", vec![]))
                .unwrap(),
            Control::Quit
        );
        assert_eq!(
            dispatcher
                .handle_notification(&Notification::new("tau_custom", vec![json!(1)]))
                .unwrap(),
            Control::Continue
        );
    }

    #[test]
    fn test_options_and_mouse_are_tracked() {
        let mut dispatcher = dispatcher();
        dispatcher
            .handle_notification(&redraw(json!([
                ["option_set", ["guifont", "Hack:h12"], ["linespace", 0]],
                ["mouse_on", []]
            ])))
            .unwrap();
        assert_eq!(dispatcher.option("guifont"), Some(&json!("Hack:h12")));
        assert_eq!(dispatcher.option("linespace"), Some(&json!(0)));
        assert!(dispatcher.mouse_enabled());

        dispatcher
            .handle_notification(&redraw(json!([["mouse_off", []]])))
            .unwrap();
        assert!(!dispatcher.mouse_enabled());
    }
}
