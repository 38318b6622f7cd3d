use glam::{Mat4, Vec2};

use crate::paint::Color;

/// Coordinate space a sprite's position is interpreted in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Space {
    /// Transformed by the active camera's view-projection.
    #[default]
    World,
    /// Logical pixels, top-left origin, unaffected by the camera.
    Screen,
}

/// One sprite draw request.
///
/// The quad spans `size` logical units. `offset` is the pivot inside that quad
/// (from its top-left corner); rotation and scale are applied around the pivot,
/// which is then placed at `position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteCmd {
    pub position: Vec2,
    pub offset: Vec2,
    pub scale: Vec2,
    pub size: Vec2,
    /// Radians, clockwise on screen (+Y down).
    pub rotation: f32,
    pub color: Color,
    pub space: Space,
}

impl SpriteCmd {
    /// White, unrotated, unscaled world-space sprite pivoted on its top-left corner.
    #[inline]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
            size,
            rotation: 0.0,
            color: Color::WHITE,
            space: Space::World,
        }
    }

    #[inline]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Moves the pivot to the center of the quad.
    #[inline]
    pub fn centered(self) -> Self {
        let half = self.size * 0.5;
        self.with_offset(half)
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn in_space(mut self, space: Space) -> Self {
        self.space = space;
        self
    }

    /// Shorthand for `in_space(Space::Screen)`.
    #[inline]
    pub fn screen_space(self) -> Self {
        self.in_space(Space::Screen)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.offset.is_finite()
            && self.scale.is_finite()
            && self.size.is_finite()
            && self.rotation.is_finite()
            && self.color.is_finite()
    }
}

/// Camera request: replaces the renderer's projection and view as a pair.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraCmd {
    pub projection: Mat4,
    pub view: Mat4,
}

impl CameraCmd {
    #[inline]
    pub const fn new(projection: Mat4, view: Mat4) -> Self {
        Self { projection, view }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }

    /// `projection * view`, the transform applied to world-space sprites.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for CameraCmd {
    fn default() -> Self {
        Self::identity()
    }
}
