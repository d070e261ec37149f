//! GPU color-id object picking.
//!
//! Given a cursor position over a rendered 3D scene, framepick answers
//! "which object is under that pixel?" without any CPU-side ray casting:
//! the scene is drawn once into an off-screen target with every pickable
//! object painted in a color that encodes its identity, the one texel
//! under the cursor is read back, and the decoded id resolves to the
//! object through a per-pick registry.
//!
//! Two interchangeable strategies cover the two ways hosts schedule that
//! extra render:
//!
//! - [`GpuPicker`] (synchronous): one blocking call that re-renders the
//!   scene through the camera with a replacement shader and returns the
//!   hit directly.
//! - [`ColorPickPass`] (deferred): a render pass that stays disabled until
//!   [`ColorPickPass::request_pick`] arms it; the next
//!   [`Engine::render_frame`] executes it and resolves the request through
//!   its callback.
//!
//! # Example
//!
//! ```no_run
//! use framepick::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = init_engine(512, 512, &PickOptions::default())?;
//!     let mut scene = Scene::new();
//!     let cube = scene.add_root("cube");
//!     scene.set_mesh(cube, MeshData::cube(0.5));
//!
//!     let mut picker = GpuPicker::new();
//!     match picker.pick(&mut engine, &mut scene, 256.0, 256.0)? {
//!         Some(node) => println!("hit {}", scene.node(node).name),
//!         None => println!("background"),
//!     }
//!     Ok(())
//! }
//! ```

pub use framepick_core::{
    color_to_bytes, color_to_id, cursor_to_texel, id_to_color, resolve_texel, ColorPickPass,
    ColorTarget, FramebufferPicker, PickCallback, PickCamera, PickError, PickOptions,
    PickRegistry, PickScene, Viewport, BACKGROUND_ID, ID_LIMIT,
};
pub use framepick_render::{
    save_rgba_png, Camera, Engine, GpuPicker, HostView, MeshData, Node, NodeId, OutputBinding,
    RenderError, RenderResult, Scene, ShaderBinding,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Initializes logging (once per process) and creates a headless engine
/// whose canvas is `width` x `height` pixels.
pub fn init_engine(width: u32, height: u32, options: &PickOptions) -> RenderResult<Engine> {
    let _ = env_logger::try_init();
    log::info!("framepick initializing (canvas {width}x{height})");
    pollster::block_on(Engine::new(width, height, options))
}
