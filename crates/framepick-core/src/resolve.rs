//! Shared readback-and-resolve tail of both draw strategies.

use glam::Vec2;

use crate::color::{color_to_id, BACKGROUND_ID};
use crate::error::Result;
use crate::registry::PickRegistry;
use crate::target::ColorTarget;
use crate::viewport::{cursor_to_texel, Viewport};

/// Reads the texel the cursor addresses, decodes it, and resolves the id
/// against `registry`.
///
/// Background texels decode to 0 and skip the lookup entirely; a non-zero
/// id without a live registry entry resolves to `None` as well (the object
/// may have been removed between build and readback). Only a failed
/// readback is an error.
pub fn resolve_texel<H: Clone, T: ColorTarget + ?Sized>(
    target: &mut T,
    registry: &PickRegistry<H>,
    cursor: Vec2,
    viewport: Viewport,
    canvas: (u32, u32),
) -> Result<Option<H>> {
    let size = (target.width(), target.height());
    let (x, y) = cursor_to_texel(cursor, viewport, canvas, size);
    let pixel = target.read_texel(x, y)?;
    let id = color_to_id(pixel[0], pixel[1], pixel[2]);
    if id == BACKGROUND_ID {
        return Ok(None);
    }
    Ok(registry.get(id).cloned())
}
