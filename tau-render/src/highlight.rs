//! Highlight table.
//!
//! Maps the editor's small integer highlight ids to colors and style flags.
//! Id `0` is the default highlight: it always exists and always carries a
//! foreground, background and special color. Every other id is created or
//! replaced wholesale by the editor; entries are never merged or removed.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::error::RenderError;
use tau_config::{Color, Config};

/// Colors and style flags of one highlight id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Highlight {
    #[serde(deserialize_with = "packed_color")]
    pub foreground: Option<Color>,
    #[serde(deserialize_with = "packed_color")]
    pub background: Option<Color>,
    /// Color of underline and undercurl decorations
    #[serde(deserialize_with = "packed_color")]
    pub special: Option<Color>,
    pub reverse: bool,
    pub italic: bool,
    pub bold: bool,
    pub strikethrough: bool,
    pub underline: bool,
    #[serde(alias = "underlineline")]
    pub underdouble: bool,
    pub undercurl: bool,
    #[serde(alias = "underdot")]
    pub underdotted: bool,
    #[serde(alias = "underdash")]
    pub underdashed: bool,
    /// Blend level (0-100) for floating windows; stored, not rendered
    pub blend: Option<u8>,
}

fn packed_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Color>, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.map(Color::from_u24))
}

/// The foreground/background/special triple of highlight `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultColors {
    pub foreground: Color,
    pub background: Color,
    pub special: Color,
}

impl Default for DefaultColors {
    fn default() -> Self {
        Self {
            foreground: Color::WHITE,
            background: Color::BLACK,
            special: Color::WHITE,
        }
    }
}

impl DefaultColors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            foreground: config.default_foreground,
            background: config.default_background,
            special: config.default_special,
        }
    }
}

/// Effective colors and flags for drawing one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub foreground: Color,
    pub background: Color,
    pub special: Color,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub underdouble: bool,
    pub undercurl: bool,
    pub underdotted: bool,
    pub underdashed: bool,
}

/// Highlight definitions keyed by id, with the default highlight always present.
#[derive(Debug, Clone)]
pub struct HighlightTable {
    default: Highlight,
    entries: HashMap<u64, Highlight>,
}

impl Default for HighlightTable {
    fn default() -> Self {
        Self::new(DefaultColors::default())
    }
}

impl HighlightTable {
    pub fn new(defaults: DefaultColors) -> Self {
        Self {
            default: Highlight {
                foreground: Some(defaults.foreground),
                background: Some(defaults.background),
                special: Some(defaults.special),
                ..Highlight::default()
            },
            entries: HashMap::new(),
        }
    }

    /// Create or replace highlight `id` wholesale.
    ///
    /// Redefining `0` replaces its flags, but colors the new definition
    /// leaves unset keep their previous values so `0` stays fully populated.
    pub fn define(&mut self, id: u64, highlight: Highlight) {
        if id == 0 {
            let previous = self.default_colors();
            self.default = Highlight {
                foreground: highlight.foreground.or(Some(previous.foreground)),
                background: highlight.background.or(Some(previous.background)),
                special: highlight.special.or(Some(previous.special)),
                ..highlight
            };
        } else {
            self.entries.insert(id, highlight);
        }
    }

    /// Look up highlight `id`; `0` always resolves.
    pub fn lookup(&self, id: u64) -> Result<&Highlight, RenderError> {
        if id == 0 {
            return Ok(&self.default);
        }
        self.entries
            .get(&id)
            .ok_or(RenderError::UnknownHighlight(id))
    }

    /// Update the default highlight's colors in place, leaving its flags alone.
    /// `None` leaves the corresponding color unchanged.
    pub fn set_default_colors(
        &mut self,
        foreground: Option<Color>,
        background: Option<Color>,
        special: Option<Color>,
    ) {
        if foreground.is_some() {
            self.default.foreground = foreground;
        }
        if background.is_some() {
            self.default.background = background;
        }
        if special.is_some() {
            self.default.special = special;
        }
    }

    pub fn default_colors(&self) -> DefaultColors {
        let fallback = DefaultColors::default();
        DefaultColors {
            foreground: self.default.foreground.unwrap_or(fallback.foreground),
            background: self.default.background.unwrap_or(fallback.background),
            special: self.default.special.unwrap_or(fallback.special),
        }
    }

    /// Number of defined ids, including the default highlight.
    pub fn len(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Effective drawing style for `id` against the current default highlight.
    ///
    /// Reverse highlights take their foreground from the background slot and
    /// vice versa, each falling back to the default highlight's opposite slot.
    /// Computed on every call since the default highlight may change between draws.
    pub fn resolve(&self, id: u64) -> Result<CellStyle, RenderError> {
        let highlight = self.lookup(id)?;
        let defaults = self.default_colors();

        let (foreground, background) = if highlight.reverse {
            (
                highlight.background.unwrap_or(defaults.background),
                highlight.foreground.unwrap_or(defaults.foreground),
            )
        } else {
            (
                highlight.foreground.unwrap_or(defaults.foreground),
                highlight.background.unwrap_or(defaults.background),
            )
        };

        Ok(CellStyle {
            foreground,
            background,
            special: highlight.special.unwrap_or(defaults.special),
            bold: highlight.bold,
            italic: highlight.italic,
            strikethrough: highlight.strikethrough,
            underline: highlight.underline,
            underdouble: highlight.underdouble,
            undercurl: highlight.undercurl,
            underdotted: highlight.underdotted,
            underdashed: highlight.underdashed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(0xFF, 0, 0);
    const BLUE: Color = Color::new(0, 0, 0xFF);

    #[test]
    fn test_default_highlight_is_always_present() {
        let table = HighlightTable::default();
        let default = table.lookup(0).unwrap();
        assert_eq!(default.foreground, Some(Color::WHITE));
        assert_eq!(default.background, Some(Color::BLACK));
        assert_eq!(default.special, Some(Color::WHITE));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_highlight_fails() {
        let table = HighlightTable::default();
        assert!(matches!(
            table.lookup(7),
            Err(RenderError::UnknownHighlight(7))
        ));
        assert!(table.resolve(7).is_err());
    }

    #[test]
    fn test_define_replaces_without_merging() {
        let mut table = HighlightTable::default();
        table.define(
            3,
            Highlight {
                foreground: Some(RED),
                bold: true,
                ..Highlight::default()
            },
        );
        table.define(
            3,
            Highlight {
                background: Some(BLUE),
                ..Highlight::default()
            },
        );
        let hl = table.lookup(3).unwrap();
        assert_eq!(hl.foreground, None);
        assert_eq!(hl.background, Some(BLUE));
        assert!(!hl.bold);
    }

    #[test]
    fn test_set_default_colors_keeps_flags() {
        let mut table = HighlightTable::default();
        table.define(
            0,
            Highlight {
                italic: true,
                ..Highlight::default()
            },
        );
        table.set_default_colors(Some(RED), Some(BLUE), Some(Color::BLACK));
        let default = table.lookup(0).unwrap();
        assert_eq!(default.foreground, Some(RED));
        assert_eq!(default.background, Some(BLUE));
        assert_eq!(default.special, Some(Color::BLACK));
        assert!(default.italic);
    }

    #[test]
    fn test_set_default_colors_skips_unset_slots() {
        let mut table = HighlightTable::default();
        table.set_default_colors(None, Some(BLUE), None);
        let defaults = table.default_colors();
        assert_eq!(defaults.foreground, Color::WHITE);
        assert_eq!(defaults.background, BLUE);
    }

    #[test]
    fn test_reverse_swaps_colors() {
        let mut table = HighlightTable::default();
        let plain = Highlight {
            foreground: Some(RED),
            ..Highlight::default()
        };
        table.define(1, plain.clone());
        table.define(
            2,
            Highlight {
                reverse: true,
                ..plain
            },
        );

        let normal = table.resolve(1).unwrap();
        let reversed = table.resolve(2).unwrap();
        assert_eq!(normal.foreground, RED);
        assert_eq!(normal.background, Color::BLACK);
        assert_eq!(reversed.foreground, normal.background);
        assert_eq!(reversed.background, normal.foreground);
    }

    #[test]
    fn test_resolve_tracks_default_changes() {
        let mut table = HighlightTable::default();
        table.define(4, Highlight::default());
        assert_eq!(table.resolve(4).unwrap().background, Color::BLACK);
        table.set_default_colors(None, Some(BLUE), None);
        assert_eq!(table.resolve(4).unwrap().background, BLUE);
    }

    #[test]
    fn test_deserialize_rgb_attrs() {
        let value = serde_json::json!({
            "foreground": 0xFF0000,
            "bold": true,
            "underlineline": true,
            "altfont": true
        });
        let hl: Highlight = serde_json::from_value(value).unwrap();
        assert_eq!(hl.foreground, Some(RED));
        assert!(hl.bold);
        assert!(hl.underdouble);
        assert_eq!(hl.background, None);
    }
}
