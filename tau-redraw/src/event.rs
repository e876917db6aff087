//! Typed redraw events.
//!
//! A `redraw` notification carries a list of batches shaped
//! `[name, occurrence, occurrence, ...]`, where every occurrence is the
//! argument tuple of one event. [`RedrawEvent::parse`] turns one occurrence
//! into a typed event; unknown names are preserved as [`RedrawEvent::Unknown`]
//! so they can be logged and skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::args::Args;
use crate::error::RedrawError;
use tau_render::{CellRun, Color, Highlight, ModeInfo};

/// An inbound notification: method name plus positional parameters.
///
/// Deserializes from either `{"method": .., "params": [..]}` or the
/// compact `["method", [..]]` form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// One occurrence of a redraw sub-event.
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawEvent {
    SetTitle(String),
    SetIcon,
    ModeInfoSet {
        cursor_style_enabled: bool,
        modes: Vec<ModeInfo>,
    },
    OptionSet {
        name: String,
        value: Value,
    },
    ModeChange {
        name: String,
        index: usize,
    },
    MouseOn,
    MouseOff,
    BusyStart,
    BusyStop,
    Suspend,
    UpdateMenu,
    Bell,
    VisualBell,
    Flush,
    GridResize {
        grid: u64,
        width: u32,
        height: u32,
    },
    /// `None` slots were sent as the editor's "unset" value (negative)
    DefaultColorsSet {
        foreground: Option<Color>,
        background: Option<Color>,
        special: Option<Color>,
    },
    HlAttrDefine {
        id: u64,
        attrs: Highlight,
    },
    HlGroupSet,
    GridLine {
        grid: u64,
        row: u32,
        column: u32,
        runs: Vec<CellRun>,
    },
    GridClear {
        grid: u64,
    },
    GridDestroy {
        grid: u64,
    },
    GridCursorGoto {
        grid: u64,
        row: u32,
        column: u32,
    },
    GridScroll,
    /// A sub-event this front-end does not know about.
    Unknown(String),
}

impl RedrawEvent {
    /// Decode one occurrence of sub-event `name`.
    pub fn parse(name: &str, values: &[Value]) -> Result<Self, RedrawError> {
        let args = Args::new(name, values);
        let event = match name {
            "set_title" => RedrawEvent::SetTitle(args.string(0)?),
            "set_icon" => RedrawEvent::SetIcon,
            "mode_info_set" => RedrawEvent::ModeInfoSet {
                cursor_style_enabled: args.bool(0)?,
                modes: args.decode(1)?,
            },
            "option_set" => RedrawEvent::OptionSet {
                name: args.string(0)?,
                value: args.value(1)?,
            },
            "mode_change" => RedrawEvent::ModeChange {
                name: args.string(0)?,
                index: args.u64(1)? as usize,
            },
            "mouse_on" => RedrawEvent::MouseOn,
            "mouse_off" => RedrawEvent::MouseOff,
            "busy_start" => RedrawEvent::BusyStart,
            "busy_stop" => RedrawEvent::BusyStop,
            "suspend" => RedrawEvent::Suspend,
            "update_menu" => RedrawEvent::UpdateMenu,
            "bell" => RedrawEvent::Bell,
            "visual_bell" => RedrawEvent::VisualBell,
            "flush" => RedrawEvent::Flush,
            "grid_resize" => RedrawEvent::GridResize {
                grid: args.u64(0)?,
                width: args.u32(1)?,
                height: args.u32(2)?,
            },
            "default_colors_set" => RedrawEvent::DefaultColorsSet {
                foreground: packed_color(args.i64(0)?),
                background: packed_color(args.i64(1)?),
                special: packed_color(args.i64(2)?),
            },
            "hl_attr_define" => RedrawEvent::HlAttrDefine {
                id: args.u64(0)?,
                attrs: args.decode(1)?,
            },
            "hl_group_set" => RedrawEvent::HlGroupSet,
            "grid_line" => RedrawEvent::GridLine {
                grid: args.u64(0)?,
                row: args.u32(1)?,
                column: args.u32(2)?,
                runs: parse_cell_runs(name, args.array(3)?)?,
            },
            "grid_clear" => RedrawEvent::GridClear { grid: args.u64(0)? },
            "grid_destroy" => RedrawEvent::GridDestroy { grid: args.u64(0)? },
            "grid_cursor_goto" => RedrawEvent::GridCursorGoto {
                grid: args.u64(0)?,
                row: args.u32(1)?,
                column: args.u32(2)?,
            },
            "grid_scroll" => RedrawEvent::GridScroll,
            other => RedrawEvent::Unknown(other.to_string()),
        };
        Ok(event)
    }

    /// Decode a batch `[name, occurrence...]` lazily, one event per occurrence, in order.
    ///
    /// The batch header is checked up front; each occurrence is decoded only
    /// when the iterator reaches it.
    pub fn parse_batch(
        batch: &Value,
    ) -> Result<impl Iterator<Item = Result<RedrawEvent, RedrawError>> + '_, RedrawError> {
        let items = batch
            .as_array()
            .ok_or_else(|| RedrawError::malformed("redraw", "batch is not an array"))?;
        let (name, occurrences) = items
            .split_first()
            .ok_or_else(|| RedrawError::malformed("redraw", "batch is empty"))?;
        let name = name
            .as_str()
            .ok_or_else(|| RedrawError::malformed("redraw", "batch name is not a string"))?;

        Ok(occurrences.iter().map(move |occurrence| {
            let values = occurrence.as_array().ok_or_else(|| {
                RedrawError::malformed(name, "occurrence is not an argument array")
            })?;
            RedrawEvent::parse(name, values)
        }))
    }
}

/// The editor sends negative numbers for colors it leaves unset.
fn packed_color(value: i64) -> Option<Color> {
    u32::try_from(value).ok().map(Color::from_u24)
}

/// Decode `grid_line` cells: `[text]`, `[text, hl_id]` or `[text, hl_id, repeat]`.
fn parse_cell_runs(event: &str, cells: &[Value]) -> Result<Vec<CellRun>, RedrawError> {
    cells
        .iter()
        .map(|cell| {
            let fields = cell
                .as_array()
                .ok_or_else(|| RedrawError::malformed(event, "cell run is not an array"))?;
            let args = Args::new(event, fields);
            let text = args.string(0)?;
            let highlight = match fields.len() {
                1 => None,
                _ => Some(args.u64(1)?),
            };
            let repeat = match fields.len() {
                0..=2 => 1,
                _ => args.u64(2)? as usize,
            };
            Ok(CellRun {
                text,
                highlight,
                repeat,
            })
        })
        .collect()
}
