//! RGBA pixel surfaces and the back/front pair.
//!
//! All drawing goes to the back surface. The front surface only changes when
//! the back surface is presented, so a frame is never observed half drawn.

use tau_config::Color;
use tau_fonts::GlyphBitmap;

const BYTES_PER_PIXEL: usize = 4;

/// A CPU-side RGBA8 pixel buffer. Drawing outside the bounds is clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Resize, keeping the pixels of the overlapping region. New area is transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut pixels = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        let keep_width = self.width.min(width) as usize * BYTES_PER_PIXEL;
        for row in 0..self.height.min(height) as usize {
            let src = row * self.width as usize * BYTES_PER_PIXEL;
            let dst = row * width as usize * BYTES_PER_PIXEL;
            pixels[dst..dst + keep_width].copy_from_slice(&self.pixels[src..src + keep_width]);
        }
        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + BYTES_PER_PIXEL]);
        Some(out)
    }

    /// Fill the whole surface with an opaque color.
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangle with an opaque color, clipped to the surface.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }
        let rgba = color.to_rgba();
        for row in y..y_end {
            let start = self.offset(x, row);
            let end = self.offset(x_end, row);
            for px in self.pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Blend a rectangle of `color` at `opacity` over the existing pixels.
    pub fn blend_rect(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Color,
        opacity: f32,
    ) {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    /// Blend `color` through a glyph coverage mask whose top-left lands on `(x, y)`.
    pub fn blend_mask(&mut self, x: i32, y: i32, mask: &GlyphBitmap, color: Color) {
        for my in 0..mask.height {
            let py = y + my as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for mx in 0..mask.width {
                let px = x + mx as i32;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                let coverage = mask.coverage_at(mx, my);
                if coverage > 0 {
                    self.blend_pixel(px as u32, py as u32, color, coverage);
                }
            }
        }
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, alpha: u8) {
        let i = self.offset(x, y);
        let a = alpha as u32;
        let src = color.to_rgba();
        for c in 0..3 {
            let dst = self.pixels[i + c] as u32;
            self.pixels[i + c] = ((src[c] as u32 * a + dst * (255 - a) + 127) / 255) as u8;
        }
        let dst_alpha = self.pixels[i + 3] as u32;
        self.pixels[i + 3] = (a + dst_alpha * (255 - a) / 255).min(255) as u8;
    }

    /// Copy every pixel of `other`, adopting its size.
    pub fn copy_from(&mut self, other: &Surface) {
        self.width = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }
}

/// Back and front surfaces kept at the same size.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    back: Surface,
    front: Surface,
    dirty: bool,
}

impl FrameBuffers {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            back: Surface::new(width, height),
            front: Surface::new(width, height),
            dirty: false,
        }
    }

    /// Resize both surfaces in lockstep, keeping their overlapping content.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.back.resize(width, height);
        self.front.resize(width, height);
    }

    pub fn back(&self) -> &Surface {
        &self.back
    }

    /// Mutable back surface; marks the frame as needing presentation.
    pub fn back_mut(&mut self) -> &mut Surface {
        self.dirty = true;
        &mut self.back
    }

    pub fn front(&self) -> &Surface {
        &self.front
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Copy the back surface to the front. Returns whether anything was copied;
    /// presenting twice without drawing in between is a no-op.
    pub fn present(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.front.copy_from(&self.back);
        self.dirty = false;
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.back.width, self.back.height)
    }
}
