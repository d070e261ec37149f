//! Identity codec: the reversible mapping between pick ids and colors.
//!
//! During a pick render every object is painted with a 24-bit RGB color
//! that encodes its id; decoding the texel under the cursor recovers the
//! id. Black is reserved for the background so an unpainted texel decodes
//! unambiguously to "nothing".

use glam::Vec3;

/// Upper bound (exclusive) for encodable ids.
///
/// The encoding is a bijection on `[0, ID_LIMIT)`; see [`id_to_color`] for
/// what happens beyond it.
pub const ID_LIMIT: u32 = 0xFF_FFFF;

/// Decoded value of a background texel. No registry lookup is performed
/// for it.
pub const BACKGROUND_ID: u32 = 0;

/// Encodes a pick id as a normalized RGB color.
///
/// The red channel carries the lowest byte of the id, green the next,
/// blue the highest. Ids at or above [`ID_LIMIT`] cannot be represented:
/// they log a warning and encode as black. Such objects become
/// indistinguishable from the background — and therefore unpickable —
/// rather than failing the frame.
#[must_use]
pub fn id_to_color(id: u32) -> Vec3 {
    if id >= ID_LIMIT {
        log::warn!("pick id {id} exceeds the 24-bit limit, encoding as background");
        return Vec3::ZERO;
    }
    Vec3::new(
        (id & 0xFF) as f32 / 255.0,
        ((id >> 8) & 0xFF) as f32 / 255.0,
        ((id >> 16) & 0xFF) as f32 / 255.0,
    )
}

/// Decodes an RGB texel back to a pick id.
#[must_use]
pub fn color_to_id(r: u8, g: u8, b: u8) -> u32 {
    u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16)
}

/// Quantizes a normalized pick color to the 8-bit channel values an
/// `Rgba8Unorm` target stores for it.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn color_to_bytes(color: Vec3) -> [u8; 3] {
    [
        (color.x * 255.0).round() as u8,
        (color.y * 255.0).round() as u8,
        (color.z * 255.0).round() as u8,
    ]
}
