//! End-to-end notification handling through a session.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Value, json};
use tau_config::{Color, Config};
use tau_fonts::{GlyphBitmap, GlyphSource, GlyphStyle};
use tau_input::Modifiers;
use tau_redraw::{
    AttachOptions, ClientError, Control, EditorClient, Notification, RedrawError, Session,
};

/// Records outbound calls as readable strings.
#[derive(Default)]
struct RecordingClient {
    calls: Vec<String>,
}

impl EditorClient for RecordingClient {
    fn attach_display(
        &mut self,
        columns: u32,
        rows: u32,
        options: AttachOptions,
    ) -> Result<(), ClientError> {
        self.calls
            .push(format!("attach {columns}x{rows} rgb={}", options.rgb));
        Ok(())
    }

    fn try_resize_display(&mut self, columns: u32, rows: u32) -> Result<(), ClientError> {
        self.calls.push(format!("resize {columns}x{rows}"));
        Ok(())
    }

    fn send_input(&mut self, keys: &str) -> Result<(), ClientError> {
        self.calls.push(format!("input {keys}"));
        Ok(())
    }

    fn run_command(&mut self, command: &str) -> Result<(), ClientError> {
        self.calls.push(format!("command {command}"));
        Ok(())
    }
}

/// Records each rasterized cell text and marks one pixel above the baseline.
struct TracingGlyphs(Rc<RefCell<Vec<String>>>);

impl GlyphSource for TracingGlyphs {
    fn rasterize(&mut self, text: &str, _style: GlyphStyle) -> Option<Arc<GlyphBitmap>> {
        if text.trim().is_empty() {
            return None;
        }
        self.0.borrow_mut().push(text.to_string());
        Some(Arc::new(GlyphBitmap {
            width: 1,
            height: 1,
            left: 4,
            top: 6,
            coverage: vec![255],
        }))
    }
}

fn session() -> (Session<RecordingClient>, Rc<RefCell<Vec<String>>>) {
    let drawn = Rc::new(RefCell::new(Vec::new()));
    let session = Session::new(
        &Config::default(),
        RecordingClient::default(),
        Box::new(TracingGlyphs(drawn.clone())),
    );
    (session, drawn)
}

fn redraw(batches: Value) -> Notification {
    serde_json::from_value(json!(["redraw", batches])).expect("valid notification")
}

#[test]
fn test_red_runs_land_on_expected_cells() {
    let (mut session, drawn) = session();
    session.start().unwrap();
    let control = session
        .on_notification(&redraw(json!([
            ["hl_attr_define", [5, {"foreground": 0xFF0000}, {}, []]],
            ["grid_line", [1, 3, 2, [["A", 5, 1], ["B", 5, 3]]]],
            ["flush", []]
        ])))
        .unwrap();
    assert_eq!(control, Control::Continue);
    assert_eq!(*drawn.borrow(), vec!["A", "B", "B", "B"]);

    let front = session.dispatcher().compositor().front();
    for column in 2..=5 {
        let x = column * 9;
        let y = 3 * 18;
        // glyph pixel: pen at baseline (y + 13), mask offset (4, 6)
        assert_eq!(front.pixel(x + 4, y + 7), Some([0xFF, 0, 0, 0xFF]));
        assert_eq!(front.pixel(x, y), Some([0, 0, 0, 0xFF]));
    }
    assert_eq!(front.pixel(6 * 9, 3 * 18), Some([0, 0, 0, 0]));
}

#[test]
fn test_default_colors_then_lookup() {
    let (mut session, _) = session();
    session
        .on_notification(&redraw(json!([
            ["hl_attr_define", [0, {"italic": true}, {}, []]],
            ["default_colors_set", [0x101010, 0x202020, 0x303030, 7, 0]]
        ])))
        .unwrap();

    let default = session.dispatcher().highlights().lookup(0).unwrap();
    assert_eq!(default.foreground, Some(Color::new(0x10, 0x10, 0x10)));
    assert_eq!(default.background, Some(Color::new(0x20, 0x20, 0x20)));
    assert_eq!(default.special, Some(Color::new(0x30, 0x30, 0x30)));
    assert!(default.italic);
}

#[test]
fn test_repeat_run_without_prior_highlight_is_fatal() {
    let (mut session, _) = session();
    let err = session
        .on_notification(&redraw(json!([["grid_line", [1, 0, 0, [["x"]]]]])))
        .unwrap_err();
    assert!(matches!(err, RedrawError::Render(ref e) if e.is_protocol_violation()));
}

#[test]
fn test_grid_resize_does_not_resize_surfaces() {
    let (mut session, _) = session();
    session
        .on_notification(&redraw(json!([["grid_resize", [1, 20, 5]]])))
        .unwrap();
    let compositor = session.dispatcher().compositor();
    assert_eq!(compositor.grid_size(), (20, 5));
    assert_eq!(compositor.surface_size(), (800, 600));
}

#[test]
fn test_host_calls_reach_the_client() {
    let (mut session, _) = session();
    session.start().unwrap();
    session.on_resize(450, 180).unwrap();
    session
        .on_key_down(" ", Modifiers::NONE)
        .unwrap();
    session
        .on_key_down("w", Modifiers::new(false, false, true))
        .unwrap();
    session.on_key_down("Dead", Modifiers::NONE).unwrap();

    assert_eq!(
        session.client().calls,
        vec![
            "attach 88x33 rgb=true",
            "resize 50x10",
            "input <Space>",
            "input <C-w>",
        ]
    );
}

#[test]
fn test_quit_notification_finishes_session() {
    let (mut session, _) = session();
    let control = session
        .on_notification(&Notification::new("quit", vec![]))
        .unwrap();
    assert_eq!(control, Control::Quit);
    assert!(session.is_finished());
}
