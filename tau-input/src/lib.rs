//! Keyboard input encoding for the tau editor front-end.
//!
//! Converts key presses into the editor's key notation (`a`, `<C-w>`, `<M-S-Up>`)
//! so they can be forwarded as-is through the editor's input call.
//!
//! - [`encoder`] is a pure function over a raw key name and modifier flags.
//! - [`winit_bridge`] maps winit's logical keys onto the raw key names.

pub mod encoder;
pub mod winit_bridge;

pub use encoder::{Modifiers, UnrecognizedKey, encode_key, special_key_token};
pub use winit_bridge::{encode_winit_key, raw_key_name};
