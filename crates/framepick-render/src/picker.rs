//! Synchronous picking against the wgpu host.
//!
//! [`HostView`] binds an [`Engine`] and a [`Scene`] together as the single
//! host object the core [`FramebufferPicker`] drives through its three
//! trait seams; [`GpuPicker`] is the ready-made pairing callers use.

use glam::Vec3;

use framepick_core::{
    ColorTarget, FramebufferPicker, PickCamera, PickError, PickScene, Viewport,
};

use crate::engine::Engine;
use crate::scene::{NodeId, Scene};

/// Engine and scene bound together as the host surface a pick drives.
pub struct HostView<'a> {
    /// The engine owning camera, pipelines, and the pick target.
    pub engine: &'a mut Engine,
    /// The scene to render and register.
    pub scene: &'a mut Scene,
}

impl PickScene for HostView<'_> {
    type Handle = NodeId;

    fn for_each_pickable(&mut self, assign: &mut dyn FnMut(NodeId) -> Vec3) {
        self.scene.for_each_pickable(assign);
    }
}

impl PickCamera for HostView<'_> {
    fn canvas_size(&self) -> (u32, u32) {
        self.engine.canvas_size()
    }

    fn viewport(&self) -> Viewport {
        self.engine.camera.viewport
    }

    fn install_pick_output(&mut self) {
        self.engine.camera.bind_pick_output();
    }

    fn render_scene(&mut self) -> framepick_core::Result<()> {
        self.engine
            .render_scene_once(self.scene)
            .map_err(|e| PickError::Render(e.to_string()))
    }

    fn restore_output(&mut self) {
        self.engine.camera.restore_output();
    }
}

impl ColorTarget for HostView<'_> {
    fn width(&self) -> u32 {
        self.engine.pick_target_size().0
    }

    fn height(&self) -> u32 {
        self.engine.pick_target_size().1
    }

    fn read_texel(&mut self, x: u32, y: u32) -> framepick_core::Result<[u8; 4]> {
        self.engine
            .read_pick_texel(x, y)
            .map_err(|e| PickError::Readback(e.to_string()))
    }
}

/// The synchronous GPU picker for the wgpu host.
///
/// One blocking call per pick: the scene re-renders through the camera
/// into the pick target with the replacement shader, and the texel under
/// the cursor resolves to a [`NodeId`] or `None`.
pub struct GpuPicker {
    picker: FramebufferPicker<NodeId>,
}

impl GpuPicker {
    /// Creates a picker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            picker: FramebufferPicker::new(),
        }
    }

    /// Picks the node under canvas coordinates `(x, y)`.
    pub fn pick(
        &mut self,
        engine: &mut Engine,
        scene: &mut Scene,
        x: f32,
        y: f32,
    ) -> framepick_core::Result<Option<NodeId>> {
        let mut host = HostView { engine, scene };
        self.picker.pick(&mut host, x, y)
    }

    /// Number of objects the most recent pick registered.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.picker.registered()
    }
}

impl Default for GpuPicker {
    fn default() -> Self {
        Self::new()
    }
}
