//! wgpu host engine for framepick.
//!
//! This crate provides the GPU side of color-id picking: a headless
//! [`Engine`] with an off-screen canvas, an arena [`Scene`] of mesh nodes,
//! a [`Camera`] whose output can be swapped between the canvas and the
//! dedicated pick render target, and the WGSL forward/replacement
//! pipelines. [`GpuPicker`] wires it all to the strategies in
//! `framepick-core`.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod capture;
pub mod engine;
pub mod error;
pub mod mesh;
pub mod picker;
pub mod scene;

pub use camera::{Camera, OutputBinding, ShaderBinding};
pub use capture::save_rgba_png;
pub use engine::{CameraUniforms, Engine, PickTargetView};
pub use error::{RenderError, RenderResult};
pub use mesh::{MeshData, MeshRenderData, ObjectUniforms};
pub use picker::{GpuPicker, HostView};
pub use scene::{Node, NodeId, Scene};
