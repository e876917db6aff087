//! Editor key notation encoder.
//!
//! A raw key name is either a named key (`"Backspace"`, `"ArrowUp"`) or the
//! single character the key produced. Names are looked up in a fixed table of
//! special tokens; any other single printable character is used verbatim.
//! Everything else cannot be represented and is rejected.

/// Fixed table from raw key names to editor key tokens.
const SPECIAL_KEYS: &[(&str, &str)] = &[
    (" ", "Space"),
    ("<", "lt"),
    ("\\", "Bslash"),
    ("|", "Bar"),
    ("Backspace", "BS"),
    ("Enter", "Enter"),
    ("Escape", "Esc"),
    ("Delete", "Del"),
    ("ArrowUp", "Up"),
    ("ArrowDown", "Down"),
    ("ArrowLeft", "Left"),
    ("ArrowRight", "Right"),
    ("Tab", "Tab"),
];

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        shift: false,
        ctrl: false,
    };

    pub fn new(alt: bool, shift: bool, ctrl: bool) -> Self {
        Self { alt, shift, ctrl }
    }

    pub fn is_empty(&self) -> bool {
        !(self.alt || self.shift || self.ctrl)
    }

    /// Modifier prefix in the fixed order Alt, Shift, Ctrl (e.g. `"M-S-"`).
    pub fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.alt {
            prefix.push_str("M-");
        }
        if self.shift {
            prefix.push_str("S-");
        }
        if self.ctrl {
            prefix.push_str("C-");
        }
        prefix
    }
}

/// A key that has no representation in editor key notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("key '{key}' was not recognised")]
pub struct UnrecognizedKey {
    pub key: String,
}

/// Look up the editor token for a special key name.
pub fn special_key_token(key: &str) -> Option<&'static str> {
    SPECIAL_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, token)| *token)
}

/// Encode a key press into editor key notation.
///
/// A single-character token without modifiers is emitted bare (`a`); named
/// tokens and any modified key are wrapped (`<Space>`, `<C-a>`).
pub fn encode_key(key: &str, modifiers: Modifiers) -> Result<String, UnrecognizedKey> {
    let token: &str = match special_key_token(key) {
        Some(token) => token,
        None if is_single_printable(key) => key,
        None => {
            return Err(UnrecognizedKey {
                key: key.to_string(),
            });
        }
    };

    if token.chars().count() > 1 || !modifiers.is_empty() {
        Ok(format!("<{}{}>", modifiers.prefix(), token))
    } else {
        Ok(token.to_string())
    }
}

fn is_single_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}
