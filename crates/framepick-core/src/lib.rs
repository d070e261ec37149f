//! Core abstractions for framepick.
//!
//! This crate contains everything about GPU color-id picking that does not
//! touch a GPU: the reversible id/color codec, the per-cycle pick registry,
//! cursor-to-texel coordinate mapping, and the two draw strategies —
//! deferred ([`ColorPickPass`]) and synchronous ([`FramebufferPicker`]) —
//! written against small host traits so they can be driven by any engine
//! (and unit-tested without one).
//!
//! The wgpu host lives in `framepick-render`.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod color;
pub mod error;
pub mod options;
pub mod pass;
pub mod picker;
pub mod registry;
pub mod resolve;
pub mod scene;
pub mod target;
pub mod viewport;

pub use color::{color_to_bytes, color_to_id, id_to_color, BACKGROUND_ID, ID_LIMIT};
pub use error::{PickError, Result};
pub use options::PickOptions;
pub use pass::{ColorPickPass, PickCallback};
pub use picker::{FramebufferPicker, PickCamera};
pub use registry::PickRegistry;
pub use resolve::resolve_texel;
pub use scene::PickScene;
pub use target::ColorTarget;
pub use viewport::{cursor_to_texel, Viewport};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
