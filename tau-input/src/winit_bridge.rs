//! Bridge from winit logical keys to raw key names understood by the encoder.

use std::borrow::Cow;
use winit::keyboard::{Key, ModifiersState, NamedKey};

use crate::encoder::{Modifiers, UnrecognizedKey, encode_key};

/// Raw key name for a winit logical key.
///
/// Named keys use their W3C names (`"ArrowUp"`, `"Backspace"`), with Space
/// reported as the `" "` character it produces. Returns `None` for dead keys
/// and keys winit could not identify.
pub fn raw_key_name(key: &Key) -> Option<Cow<'_, str>> {
    match key {
        Key::Character(s) => Some(Cow::Borrowed(s.as_str())),
        Key::Named(named) => Some(match named {
            NamedKey::Space => Cow::Borrowed(" "),
            NamedKey::Backspace => Cow::Borrowed("Backspace"),
            NamedKey::Enter => Cow::Borrowed("Enter"),
            NamedKey::Escape => Cow::Borrowed("Escape"),
            NamedKey::Delete => Cow::Borrowed("Delete"),
            NamedKey::ArrowUp => Cow::Borrowed("ArrowUp"),
            NamedKey::ArrowDown => Cow::Borrowed("ArrowDown"),
            NamedKey::ArrowLeft => Cow::Borrowed("ArrowLeft"),
            NamedKey::ArrowRight => Cow::Borrowed("ArrowRight"),
            NamedKey::Tab => Cow::Borrowed("Tab"),
            // Debug names match the W3C key names for the rest (F13, Home, ...)
            other => Cow::Owned(format!("{other:?}")),
        }),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

/// Encode a winit logical key with the current modifier state.
pub fn encode_winit_key(key: &Key, state: ModifiersState) -> Result<String, UnrecognizedKey> {
    let Some(name) = raw_key_name(key) else {
        log::debug!("Dropping key without a name: {:?}", key);
        return Err(UnrecognizedKey {
            key: format!("{key:?}"),
        });
    };
    let modifiers = Modifiers::new(state.alt_key(), state.shift_key(), state.control_key());
    encode_key(&name, modifiers)
}
