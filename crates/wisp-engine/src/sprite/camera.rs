use glam::{Mat4, Quat, Vec2, Vec3};

use crate::coords::Viewport;

use super::CameraCmd;

/// Orthographic 2D camera in logical pixels.
///
/// The camera's `position` lands at the viewport center. `zoom > 1` magnifies;
/// `rotation` turns the world around that center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    pub zoom: f32,
    pub rotation: f32,
}

impl Default for Camera2d {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
        }
    }
}

impl Camera2d {
    #[inline]
    pub fn new(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    /// Pixel-space orthographic projection centered on the origin, +Y down.
    pub fn projection(&self, viewport: Viewport) -> Mat4 {
        let [w, h] = viewport.resolution();
        Mat4::orthographic_rh(-w * 0.5, w * 0.5, h * 0.5, -h * 0.5, -1.0, 1.0)
    }

    /// World-to-camera transform.
    pub fn view(&self) -> Mat4 {
        let zoom = self.zoom.clamp(0.05, 32.0);
        let camera_to_world = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0 / zoom, 1.0 / zoom, 1.0),
            Quat::from_rotation_z(self.rotation),
            self.position.extend(0.0),
        );
        camera_to_world.inverse()
    }

    #[inline]
    pub fn to_cmd(&self, viewport: Viewport) -> CameraCmd {
        CameraCmd::new(self.projection(viewport), self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ndc(cam: &Camera2d, viewport: Viewport, world: Vec2) -> Vec2 {
        let p = cam.to_cmd(viewport).view_projection().project_point3(world.extend(0.0));
        Vec2::new(p.x, p.y)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn position_maps_to_viewport_center() {
        let cam = Camera2d::new(Vec2::new(250.0, -40.0));
        assert_close(ndc(&cam, Viewport::new(800.0, 600.0), cam.position), Vec2::ZERO);
    }

    #[test]
    fn positive_y_points_down() {
        let cam = Camera2d::default();
        let p = ndc(&cam, Viewport::new(800.0, 600.0), Vec2::new(400.0, 300.0));
        assert_close(p, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn zoom_magnifies() {
        let cam = Camera2d { zoom: 2.0, ..Camera2d::default() };
        let p = ndc(&cam, Viewport::new(800.0, 600.0), Vec2::new(200.0, 0.0));
        assert_close(p, Vec2::new(1.0, 0.0));
    }
}
