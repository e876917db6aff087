//! Font data types.

use std::sync::Arc;
use swash::{CacheKey, FontRef};

/// Owned font bytes plus the swash offset/key needed to rebuild a `FontRef`.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF/TTC)
    pub data: Arc<Vec<u8>>,
    offset: u32,
    key: CacheKey,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    ///
    /// Returns `None` if the bytes are not a valid font.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData for a face inside a collection (.ttc).
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let (offset, key) = {
            let font = FontRef::from_index(&data, face_index)?;
            (font.offset, font.key)
        };
        Some(Self {
            data: Arc::new(data),
            offset,
            key,
        })
    }

    /// Borrow the face as a swash `FontRef`.
    pub fn as_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }

    /// Whether the face maps `ch` to a real glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.as_ref().charmap().map(ch) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes_are_rejected() {
        assert!(FontData::new(vec![0u8; 100]).is_none());
    }

    #[test]
    fn test_empty_bytes_are_rejected() {
        assert!(FontData::new(Vec::new()).is_none());
    }
}
