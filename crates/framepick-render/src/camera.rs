//! Camera, output binding, and replacement-shader state.

use glam::{Mat4, Vec3};

use framepick_core::Viewport;

/// Where the camera's render output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputBinding {
    /// The engine's off-screen canvas (the normal presentation surface).
    #[default]
    Canvas,
    /// The dedicated pick render target.
    PickTarget,
}

/// Which shader path the next render uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderBinding {
    /// Each object's material path (the forward mesh shader).
    #[default]
    Material,
    /// The global replacement shader painting encoded pick colors.
    PickColor,
}

/// A perspective camera with a fractional viewport and swappable output.
///
/// The output/shader bindings model the render-target and
/// replacement-shader swap a pick render performs: [`Camera::bind_pick_output`]
/// saves the current bindings and redirects them, [`Camera::restore_output`]
/// puts the saved pair back.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Viewport rectangle in canvas fractions (top-left origin).
    pub viewport: Viewport,
    output: OutputBinding,
    shader: ShaderBinding,
    saved: Option<(OutputBinding, ShaderBinding)>,
}

impl Camera {
    /// Creates a camera at a default vantage point on +Z.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 0.01,
            far: 1000.0,
            viewport: Viewport::FULL,
            output: OutputBinding::Canvas,
            shader: ShaderBinding::Material,
            saved: None,
        }
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix for a canvas of the given pixel
    /// size; the aspect ratio comes from the viewport sub-rectangle.
    #[must_use]
    pub fn projection_matrix(&self, canvas: (u32, u32)) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.viewport.aspect_on(canvas), self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self, canvas: (u32, u32)) -> Mat4 {
        self.projection_matrix(canvas) * self.view_matrix()
    }

    /// Frames the given bounding box from the +Z direction.
    pub fn look_at_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let size = (max - min).length().max(1e-3);
        self.target = center;
        self.position = center + Vec3::new(0.0, 0.0, size * 1.5);
        self.near = size * 0.001;
        self.far = size * 100.0;
    }

    /// Current output binding.
    #[must_use]
    pub fn output(&self) -> OutputBinding {
        self.output
    }

    /// Current shader binding.
    #[must_use]
    pub fn shader(&self) -> ShaderBinding {
        self.shader
    }

    /// Redirects output to the pick target with the replacement shader,
    /// saving the current bindings.
    pub fn bind_pick_output(&mut self) {
        self.saved = Some((self.output, self.shader));
        self.output = OutputBinding::PickTarget;
        self.shader = ShaderBinding::PickColor;
    }

    /// Restores the bindings saved by [`Self::bind_pick_output`]. A no-op
    /// when nothing is saved.
    pub fn restore_output(&mut self) {
        if let Some((output, shader)) = self.saved.take() {
            self.output = output;
            self.shader = shader;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let camera = Camera::new();
        assert_eq!(camera.output(), OutputBinding::Canvas);
        assert_eq!(camera.shader(), ShaderBinding::Material);
    }

    #[test]
    fn test_bind_and_restore() {
        let mut camera = Camera::new();
        camera.bind_pick_output();
        assert_eq!(camera.output(), OutputBinding::PickTarget);
        assert_eq!(camera.shader(), ShaderBinding::PickColor);

        camera.restore_output();
        assert_eq!(camera.output(), OutputBinding::Canvas);
        assert_eq!(camera.shader(), ShaderBinding::Material);

        // Restore without a matching bind is a no-op.
        camera.restore_output();
        assert_eq!(camera.output(), OutputBinding::Canvas);
    }

    #[test]
    fn test_projection_uses_viewport_aspect() {
        let mut camera = Camera::new();
        camera.viewport = Viewport::new(0.0, 0.0, 0.5, 1.0);
        // Left half of a 400x200 canvas is square.
        let proj = camera.projection_matrix((400, 200));
        let square = Mat4::perspective_rh(camera.fov, 1.0, camera.near, camera.far);
        assert!((proj.x_axis.x - square.x_axis.x).abs() < 1e-6);
    }

    #[test]
    fn test_look_at_box() {
        let mut camera = Camera::new();
        camera.look_at_box(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!(camera.position.z > 1.0);
        assert!(camera.far > camera.near);
    }
}
