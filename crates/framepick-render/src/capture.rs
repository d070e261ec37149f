//! PNG capture of the canvas and the pick buffer.

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::engine::Engine;
use crate::error::{RenderError, RenderResult};
use crate::scene::Scene;

/// Saves tightly packed RGBA rows (top-left origin) as a PNG file.
pub fn save_rgba_png(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> RenderResult<()> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, data.to_vec())
            .ok_or(RenderError::InvalidImageData)?;
    img.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    Ok(())
}

impl Engine {
    /// Renders one frame and writes the canvas to a PNG file.
    pub fn capture_canvas(
        &mut self,
        scene: &mut Scene,
        path: impl AsRef<Path>,
    ) -> RenderResult<()> {
        let pixels = self.render_to_image(scene)?;
        save_rgba_png(path, &pixels, self.width, self.height)
    }

    /// Writes the current contents of the pick buffer to a PNG file.
    ///
    /// Useful when a pick resolves unexpectedly: every object shows up in
    /// its encoded color on black, exactly as the resolver sees it.
    pub fn capture_pick_buffer(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let (width, height) = self.pick_size;
        let pixels = self.read_texture_rgba(&self.pick_texture, width, height)?;
        save_rgba_png(path, &pixels, width, height)
    }
}
