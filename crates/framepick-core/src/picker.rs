//! Synchronous picking through a camera re-render.
//!
//! [`FramebufferPicker`] is the blocking strategy: one call rebuilds the
//! registry, re-renders the scene through the camera with a global
//! replacement shader into the pick target, restores the camera, and
//! resolves the texel under the cursor. There is no persistent state
//! machine and no deferred completion.

use glam::Vec2;

use crate::error::Result;
use crate::registry::PickRegistry;
use crate::resolve::resolve_texel;
use crate::scene::PickScene;
use crate::target::ColorTarget;
use crate::viewport::Viewport;

/// Camera-side hooks for the synchronous re-render strategy.
///
/// `install_pick_output` redirects the camera's output to the pick target
/// and swaps in the replacement shader that paints each object's encoded
/// color attribute instead of its material; `restore_output` undoes both.
/// The picker guarantees `restore_output` runs whether or not the render
/// succeeds.
pub trait PickCamera {
    /// Canvas size in pixels — the space cursor coordinates and the
    /// viewport fractions refer to.
    fn canvas_size(&self) -> (u32, u32);

    /// The camera's current viewport rectangle.
    fn viewport(&self) -> Viewport;

    /// Redirects the camera's output to the pick target and installs the
    /// replacement shader.
    fn install_pick_output(&mut self);

    /// Issues one render of the scene through this camera.
    fn render_scene(&mut self) -> Result<()>;

    /// Restores the render target and shader saved by
    /// [`Self::install_pick_output`].
    fn restore_output(&mut self);
}

/// The synchronous GPU picker.
///
/// Calls are strictly sequential; no reentrancy guard exists, so the host
/// must not call [`Self::pick`] from inside its own render callback.
pub struct FramebufferPicker<H> {
    registry: PickRegistry<H>,
}

impl<H: Clone> FramebufferPicker<H> {
    /// Creates a picker with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: PickRegistry::new(),
        }
    }

    /// Picks the object under canvas coordinates `(x, y)`.
    ///
    /// Rebuilds the registry over the host's pickables, renders the scene
    /// once with the replacement shader into the pick target, restores the
    /// camera's original target and shader, then resolves the texel under
    /// the cursor. A scene with zero pickables still renders; the result
    /// is simply `Ok(None)`.
    pub fn pick<Host>(&mut self, host: &mut Host, x: f32, y: f32) -> Result<Option<H>>
    where
        Host: PickScene<Handle = H> + PickCamera + ColorTarget,
    {
        self.registry.rebuild(host);

        host.install_pick_output();
        let rendered = host.render_scene();
        host.restore_output();
        rendered?;

        let viewport = host.viewport();
        let canvas = host.canvas_size();
        resolve_texel(host, &self.registry, Vec2::new(x, y), viewport, canvas)
    }

    /// Number of objects the most recent pick cycle registered.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registry.len()
    }
}

impl<H: Clone> Default for FramebufferPicker<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color_to_bytes;
    use crate::error::PickError;
    use glam::Vec3;

    /// A CPU stand-in for the whole host: a list of "objects" with pixel
    /// rectangles, a framebuffer, and tracked camera bindings.
    struct MockHost {
        // scene: objects as (handle, target-space rect (x, y, w, h),
        // bottom-left origin), drawn in list order
        objects: Vec<(u32, (u32, u32, u32, u32))>,
        colors: Vec<Vec3>,
        // camera
        viewport: Viewport,
        canvas: (u32, u32),
        output: &'static str,
        shader: &'static str,
        saved: Option<(&'static str, &'static str)>,
        fail_render: bool,
        renders: u32,
        // pick target
        size: (u32, u32),
        pixels: Vec<[u8; 4]>,
    }

    impl MockHost {
        fn new(canvas: (u32, u32), size: (u32, u32)) -> Self {
            Self {
                objects: Vec::new(),
                colors: Vec::new(),
                viewport: Viewport::FULL,
                canvas,
                output: "screen",
                shader: "material",
                saved: None,
                fail_render: false,
                renders: 0,
                size,
                pixels: vec![[0, 0, 0, 255]; (size.0 * size.1) as usize],
            }
        }

        fn add_object(&mut self, handle: u32, rect: (u32, u32, u32, u32)) {
            self.objects.push((handle, rect));
            self.colors.push(Vec3::ZERO);
        }
    }

    impl PickScene for MockHost {
        type Handle = u32;

        fn for_each_pickable(&mut self, assign: &mut dyn FnMut(u32) -> Vec3) {
            for (i, &(handle, _)) in self.objects.iter().enumerate() {
                self.colors[i] = assign(handle);
            }
        }
    }

    impl PickCamera for MockHost {
        fn canvas_size(&self) -> (u32, u32) {
            self.canvas
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn install_pick_output(&mut self) {
            self.saved = Some((self.output, self.shader));
            self.output = "pick-target";
            self.shader = "pick-color";
        }

        fn render_scene(&mut self) -> Result<()> {
            self.renders += 1;
            if self.fail_render {
                return Err(PickError::Render("simulated device loss".into()));
            }
            // Rasterize: clear to black, then fill each object's rect
            // with its stashed color attribute, in draw order.
            self.pixels.fill([0, 0, 0, 255]);
            for (i, &(_, (x, y, w, h))) in self.objects.iter().enumerate() {
                let [r, g, b] = color_to_bytes(self.colors[i]);
                for py in y..(y + h).min(self.size.1) {
                    for px in x..(x + w).min(self.size.0) {
                        self.pixels[(py * self.size.0 + px) as usize] = [r, g, b, 255];
                    }
                }
            }
            Ok(())
        }

        fn restore_output(&mut self) {
            if let Some((output, shader)) = self.saved.take() {
                self.output = output;
                self.shader = shader;
            }
        }
    }

    impl ColorTarget for MockHost {
        fn width(&self) -> u32 {
            self.size.0
        }
        fn height(&self) -> u32 {
            self.size.1
        }
        fn read_texel(&mut self, x: u32, y: u32) -> Result<[u8; 4]> {
            Ok(self.pixels[(y * self.size.0 + x) as usize])
        }
    }

    #[test]
    fn test_pick_resolves_covering_object() {
        let mut host = MockHost::new((128, 128), (64, 64));
        // One object covering the center quarter of the target.
        host.add_object(77, (24, 24, 16, 16));

        let mut picker = FramebufferPicker::new();
        let hit = picker.pick(&mut host, 64.0, 64.0).unwrap();
        assert_eq!(hit, Some(77));
        assert_eq!(picker.registered(), 1);

        // Background corner resolves to nothing.
        let hit = picker.pick(&mut host, 2.0, 2.0).unwrap();
        assert_eq!(hit, None);
    }

    #[test]
    fn test_draw_order_decides_overlap() {
        let mut host = MockHost::new((128, 128), (64, 64));
        host.add_object(1, (0, 0, 64, 64));
        // Painted later, so it wins the overlapping texels.
        host.add_object(2, (24, 24, 16, 16));

        let mut picker = FramebufferPicker::new();
        assert_eq!(picker.pick(&mut host, 64.0, 64.0).unwrap(), Some(2));
        assert_eq!(picker.pick(&mut host, 8.0, 8.0).unwrap(), Some(1));
    }

    #[test]
    fn test_camera_restored_after_pick() {
        let mut host = MockHost::new((128, 128), (64, 64));
        host.add_object(5, (0, 0, 64, 64));

        let mut picker = FramebufferPicker::new();
        picker.pick(&mut host, 64.0, 64.0).unwrap();

        assert_eq!(host.output, "screen");
        assert_eq!(host.shader, "material");
        assert!(host.saved.is_none());
    }

    #[test]
    fn test_camera_restored_after_render_failure() {
        let mut host = MockHost::new((128, 128), (64, 64));
        host.add_object(5, (0, 0, 64, 64));
        host.fail_render = true;

        let mut picker = FramebufferPicker::new();
        let result = picker.pick(&mut host, 64.0, 64.0);
        assert!(result.is_err());

        assert_eq!(host.output, "screen");
        assert_eq!(host.shader, "material");
    }

    #[test]
    fn test_empty_scene_still_renders() {
        let mut host = MockHost::new((128, 128), (64, 64));

        let mut picker = FramebufferPicker::new();
        let hit = picker.pick(&mut host, 64.0, 64.0).unwrap();
        assert_eq!(hit, None);
        assert_eq!(host.renders, 1, "render must be issued for empty scenes");
        assert_eq!(picker.registered(), 0);
    }

    #[test]
    fn test_registry_rebuilt_every_pick() {
        let mut host = MockHost::new((128, 128), (64, 64));
        host.add_object(1, (0, 0, 64, 64));
        host.add_object(2, (0, 0, 8, 8));

        let mut picker = FramebufferPicker::new();
        picker.pick(&mut host, 64.0, 64.0).unwrap();
        assert_eq!(picker.registered(), 2);

        host.objects.truncate(1);
        host.colors.truncate(1);
        picker.pick(&mut host, 64.0, 64.0).unwrap();
        assert_eq!(picker.registered(), 1, "registry kept stale entries");
    }
}
