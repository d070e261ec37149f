//! Cursor-to-texel coordinate mapping.
//!
//! Cursor coordinates live on the canvas (top-left origin, pixels), the
//! camera draws into a fractional sub-rectangle of that canvas, and the
//! pick target is a separately sized texture with a bottom-left origin.
//! [`cursor_to_texel`] converts between the three spaces.

use glam::Vec2;

/// A camera's viewport rectangle, in fractions of the canvas.
///
/// `(x0, y0)` is the top-left corner and `(x1, y1)` the bottom-right, in
/// the same top-left-origin space cursor coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Viewport {
    /// The full-canvas viewport.
    pub const FULL: Self = Self {
        x0: 0.0,
        y0: 0.0,
        x1: 1.0,
        y1: 1.0,
    };

    /// Creates a viewport from fractional bounds.
    #[must_use]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Viewport size in pixels on a canvas of the given size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_on(&self, canvas: (u32, u32)) -> Vec2 {
        Vec2::new(
            (self.x1 - self.x0) * canvas.0 as f32,
            (self.y1 - self.y0) * canvas.1 as f32,
        )
    }

    /// Aspect ratio of the viewport on the given canvas.
    #[must_use]
    pub fn aspect_on(&self, canvas: (u32, u32)) -> f32 {
        let size = self.size_on(canvas);
        if size.y > 0.0 {
            size.x / size.y
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

/// Maps a cursor position to the texel it addresses in the pick target.
///
/// The cursor is normalized against the viewport sub-rectangle, scaled to
/// the target, and flipped vertically (screen origin top-left, target
/// origin bottom-left). Inputs outside the viewport are clamped into
/// `[0, width-1] x [0, height-1]` so the readback that follows never
/// touches out-of-bounds texels; a degenerate viewport or target maps to
/// `(0, 0)`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cursor_to_texel(
    cursor: Vec2,
    viewport: Viewport,
    canvas: (u32, u32),
    target: (u32, u32),
) -> (u32, u32) {
    let view = viewport.size_on(canvas);
    if view.x <= 0.0 || view.y <= 0.0 || target.0 == 0 || target.1 == 0 {
        return (0, 0);
    }

    let nx = (cursor.x - viewport.x0 * canvas.0 as f32) / view.x;
    let ny = (cursor.y - viewport.y0 * canvas.1 as f32) / view.y;

    let max_x = (target.0 - 1) as f32;
    let max_y = (target.1 - 1) as f32;
    let x = (nx * max_x).floor().clamp(0.0, max_x);
    let y = ((1.0 - ny) * max_y).floor().clamp(0.0, max_y);

    (x as u32, y as u32)
}
