//! Swash-backed glyph rasterizer with an LRU glyph cache.

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use fontdb::{Database, Style, Weight};
use lru::LruCache;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;

use crate::fallbacks::FALLBACK_FAMILIES;
use crate::glyph::{GlyphBitmap, GlyphSource, GlyphStyle};
use crate::loader::load_font;
use crate::metrics::FontMetrics;
use crate::types::FontData;

const GLYPH_CACHE_SIZE: usize = 1024;

/// Rasterizes cell text with a primary face and optional styled variants.
pub struct FontRasterizer {
    family: String,
    regular: FontData,
    bold: Option<FontData>,
    italic: Option<FontData>,
    bold_italic: Option<FontData>,
    size_pixels: f32,
    context: ScaleContext,
    cache: LruCache<(char, GlyphStyle), Option<Arc<GlyphBitmap>>>,
}

impl FontRasterizer {
    /// Load `family` (or the first available fallback family) from the system
    /// font database at `size_pixels`.
    pub fn new(family: Option<&str>, size_pixels: f32) -> Result<Self> {
        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let candidates = family
            .into_iter()
            .chain(FALLBACK_FAMILIES.iter().copied())
            .map(Some)
            .chain(std::iter::once(None));

        for candidate in candidates {
            if let Some(regular) = load_font(&font_db, candidate, Weight::NORMAL, Style::Normal) {
                let name = candidate.unwrap_or("monospace").to_string();
                if family.is_some_and(|requested| requested != name) {
                    log::warn!(
                        "Font '{}' not found, using '{}'",
                        family.unwrap_or_default(),
                        name
                    );
                }
                log::info!("Using font '{}' at {}px", name, size_pixels);
                return Ok(Self::from_faces(
                    name,
                    regular,
                    load_font(&font_db, candidate, Weight::BOLD, Style::Normal),
                    load_font(&font_db, candidate, Weight::NORMAL, Style::Italic),
                    load_font(&font_db, candidate, Weight::BOLD, Style::Italic),
                    size_pixels,
                ));
            }
        }

        Err(anyhow!("no usable monospace font found on this system"))
    }

    /// Build a rasterizer from already-loaded faces.
    pub fn from_faces(
        family: String,
        regular: FontData,
        bold: Option<FontData>,
        italic: Option<FontData>,
        bold_italic: Option<FontData>,
        size_pixels: f32,
    ) -> Self {
        Self {
            family,
            regular,
            bold,
            italic,
            bold_italic,
            size_pixels: size_pixels.max(1.0),
            context: ScaleContext::new(),
            cache: LruCache::new(
                NonZeroUsize::new(GLYPH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    pub fn size_pixels(&self) -> f32 {
        self.size_pixels
    }

    /// Metrics of the regular face at the current size.
    pub fn font_metrics(&self) -> FontMetrics {
        let font = self.regular.as_ref();
        let metrics = font.metrics(&[]);
        let scale = self.size_pixels / metrics.units_per_em as f32;
        let glyph_id = font.charmap().map('m');
        FontMetrics {
            ascent: metrics.ascent * scale,
            descent: metrics.descent * scale,
            char_advance: font.glyph_metrics(&[]).advance_width(glyph_id) * scale,
            font_size_pixels: self.size_pixels,
        }
    }

    /// Face for a style, falling back to the regular face when the variant is
    /// missing or lacks the glyph.
    fn face_for(&self, ch: char, style: GlyphStyle) -> &FontData {
        let styled = match (style.bold, style.italic) {
            (true, true) => self.bold_italic.as_ref(),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        styled
            .filter(|face| face.has_glyph(ch))
            .unwrap_or(&self.regular)
    }

    fn render_char(&mut self, ch: char, style: GlyphStyle) -> Option<GlyphBitmap> {
        let face = self.face_for(ch, style).clone();
        let font = face.as_ref();
        let glyph_id = font.charmap().map(ch);
        if glyph_id == 0 {
            log::debug!("Character '{}' (U+{:04X}) has no glyph", ch, ch as u32);
            return None;
        }

        let mut scaler = self
            .context
            .builder(font)
            .size(self.size_pixels)
            .hint(true)
            .build();
        let image = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph_id)?;

        let coverage = match image.content {
            Content::Mask => image.data,
            // Color glyphs are reduced to their alpha channel
            Content::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            Content::SubpixelMask => image
                .data
                .chunks_exact(4)
                .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
                .collect(),
        };

        Some(GlyphBitmap {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            coverage,
        })
    }
}

impl GlyphSource for FontRasterizer {
    fn rasterize(&mut self, text: &str, style: GlyphStyle) -> Option<Arc<GlyphBitmap>> {
        // A cell holds one grapheme; its base character decides the glyph
        let ch = text.chars().next()?;
        if ch.is_whitespace() {
            return None;
        }
        if let Some(cached) = self.cache.get(&(ch, style)) {
            return cached.clone();
        }
        let glyph = self.render_char(ch, style).map(Arc::new);
        self.cache.put((ch, style), glyph.clone());
        glyph
    }

    fn family(&self) -> Option<&str> {
        Some(&self.family)
    }
}
