/// Viewport size in logical pixels.
///
/// Used as the resolution packed into the sprite uniforms and as the basis for
/// screen-space sprite placement.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether there is anything to draw into. `FrameCtx::render` skips
    /// frames for which this is false.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Resolution as uploaded to the GPU, never below one pixel per axis.
    ///
    /// A minimized window reports 0x0; the shader divides by this value.
    #[inline]
    pub fn resolution(self) -> [f32; 2] {
        [sanitize(self.width), sanitize(self.height)]
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}
