//! Off-screen color target interface.

use crate::error::Result;

/// The off-screen surface encoded colors are drawn into.
///
/// Texel coordinates use a bottom-left origin — the coordinate mapper's
/// vertical flip depends on this convention, so a backend whose native
/// memory layout is top-down (wgpu) must convert rows in its
/// implementation. Dimensions are fixed for the lifetime of the target.
pub trait ColorTarget {
    /// Target width in texels.
    fn width(&self) -> u32;

    /// Target height in texels.
    fn height(&self) -> u32;

    /// Reads the RGBA texel at `(x, y)`.
    ///
    /// Callers pass coordinates already clamped into bounds; the alpha
    /// byte is ignored by the codec.
    fn read_texel(&mut self, x: u32, y: u32) -> Result<[u8; 4]>;
}
