// Library exports for testing and potential library use
//
// The workspace splits the front-end by concern:
//
//   - `tau-config`  : YAML configuration, colors, defaults
//   - `tau-input`   : key press → editor key notation
//   - `tau-fonts`   : font discovery, cell metrics, glyph rasterization
//   - `tau-render`  : highlight table, cursor styling, surfaces, compositor
//   - `tau-redraw`  : redraw event decoding, dispatcher, editor session
//
// This crate adds the command line, the log bridge and the headless replay app.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod debug;

pub use tau_config as config;
pub use tau_fonts as fonts;
pub use tau_input as input;
pub use tau_redraw as redraw;
pub use tau_render as render;
