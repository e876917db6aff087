//! Screenshot export of the presented frame.

use std::path::Path;

use image::RgbaImage;

use crate::compositor::GridCompositor;
use crate::error::RenderError;

impl GridCompositor {
    /// The front surface with the cursor overlay blended on top.
    pub fn screenshot(&self) -> Result<RgbaImage, RenderError> {
        let mut frame = self.front().clone();
        let cursor = self.cursor();
        if let Some((x, y, width, height)) = cursor.rect(&self.metrics()) {
            frame.blend_rect(x, y, width, height, cursor.color, cursor.opacity);
        }

        RgbaImage::from_raw(frame.width(), frame.height(), frame.as_bytes().to_vec())
            .ok_or(RenderError::ScreenshotImageAssembly)
    }

    /// Write the screenshot to `path`; the format follows the file extension.
    pub fn save_screenshot(&self, path: &Path) -> Result<(), RenderError> {
        let image = self.screenshot()?;
        image.save(path)?;
        log::info!(
            "Saved {}x{} screenshot to {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(())
    }
}
