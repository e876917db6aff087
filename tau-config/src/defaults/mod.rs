//! Default value functions for configuration.
//!
//! Each sub-module groups related free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod cell;
mod colors;
mod font;

pub use cell::{cell_baseline, cell_height, cell_width, viewport_height, viewport_width};
pub use colors::{
    cursor_color, cursor_opacity, cursor_thin_size, default_background, default_foreground,
    default_special,
};
pub use font::font_size;
