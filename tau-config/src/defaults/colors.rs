//! Default colors for highlight `0` and the cursor overlay.

use crate::Color;

pub fn default_foreground() -> Color {
    Color::WHITE
}

pub fn default_background() -> Color {
    Color::BLACK
}

pub fn default_special() -> Color {
    Color::WHITE
}

pub fn cursor_color() -> Color {
    Color::WHITE
}

pub fn cursor_opacity() -> f32 {
    0.6
}

pub fn cursor_thin_size() -> u32 {
    1 // Height of horizontal and width of vertical cursors, in pixels
}
