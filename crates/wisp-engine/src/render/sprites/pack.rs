use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::sprite::{CameraCmd, Space, SpriteCmd};

/// Maximum number of instances drawn by a single instanced call.
///
/// 1024 keeps a batch at 56 KiB of instance data, small enough for one staging
/// write while still collapsing typical scenes into a handful of draws.
pub const INSTANCE_COUNT: usize = 1024;

// ── instance record ───────────────────────────────────────────────────────

/// Per-instance vertex data, one per submitted sprite.
///
/// Field order and types match the vertex shader's instance inputs
/// (locations 1..=7). 56 bytes, no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub color: [f32; 4],
    pub position: [f32; 2],
    pub offset: [f32; 2],
    pub scale: [f32; 2],
    pub size: [f32; 2],
    pub rotation: f32,
    /// 1 = world space, 0 = screen space.
    pub world_space: i32,
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x4, // color
        2 => Float32x2, // position
        3 => Float32x2, // offset
        4 => Float32x2, // scale
        5 => Float32x2, // size
        6 => Float32,   // rotation
        7 => Sint32     // world_space
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    #[inline]
    pub fn from_cmd(cmd: &SpriteCmd) -> Self {
        Self {
            color: cmd.color.to_array(),
            position: cmd.position.to_array(),
            offset: cmd.offset.to_array(),
            scale: cmd.scale.to_array(),
            size: cmd.size.to_array(),
            rotation: cmd.rotation,
            world_space: match cmd.space {
                Space::World => 1,
                Space::Screen => 0,
            },
        }
    }

    /// Reconstructs the request this record was packed from.
    pub fn to_cmd(&self) -> SpriteCmd {
        SpriteCmd {
            position: Vec2::from_array(self.position),
            offset: Vec2::from_array(self.offset),
            scale: Vec2::from_array(self.scale),
            size: Vec2::from_array(self.size),
            rotation: self.rotation,
            color: Color::from_array(self.color),
            space: if self.world_space != 0 { Space::World } else { Space::Screen },
        }
    }
}

impl From<&SpriteCmd> for SpriteInstance {
    #[inline]
    fn from(cmd: &SpriteCmd) -> Self {
        Self::from_cmd(cmd)
    }
}

/// Packs one batch worth of requests into `out`, replacing its contents.
///
/// `out` is a reusable scratch buffer; its capacity is kept between batches.
pub fn pack_instances(cmds: &[SpriteCmd], out: &mut Vec<SpriteInstance>) {
    debug_assert!(
        cmds.len() <= INSTANCE_COUNT,
        "batch of {} exceeds INSTANCE_COUNT",
        cmds.len()
    );
    out.clear();
    out.extend(cmds.iter().map(SpriteInstance::from_cmd));
}

// ── uniform record ────────────────────────────────────────────────────────

/// Per-pass uniform block, constant across every batch of a pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

pub fn pack_uniforms(camera: &CameraCmd, viewport: Viewport) -> SpriteUniforms {
    SpriteUniforms {
        view_projection: camera.view_projection().to_cols_array_2d(),
        projection: camera.projection.to_cols_array_2d(),
        resolution: viewport.resolution(),
        _pad: [0.0; 2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    fn sample() -> SpriteCmd {
        SpriteCmd::new(Vec2::new(12.5, -3.0), Vec2::new(32.0, 16.0))
            .with_offset(Vec2::new(4.0, 2.0))
            .with_scale(Vec2::new(2.0, 0.5))
            .with_rotation(1.25)
            .with_color(Color::from_straight(1.0, 0.5, 0.25, 0.8))
            .screen_space()
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 56);
        assert_eq!(SpriteInstance::layout().array_stride, 56);
    }

    #[test]
    fn uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SpriteUniforms>() % 16, 0);
    }

    // ── instance packing ──────────────────────────────────────────────────

    #[test]
    fn packed_fields_read_back_unchanged() {
        let cmd = sample();
        let inst = SpriteInstance::from(&cmd);

        assert_eq!(inst.position, [12.5, -3.0]);
        assert_eq!(inst.offset, [4.0, 2.0]);
        assert_eq!(inst.scale, [2.0, 0.5]);
        assert_eq!(inst.size, [32.0, 16.0]);
        assert_eq!(inst.rotation, 1.25);
        assert_eq!(inst.color, cmd.color.to_array());
        assert_eq!(inst.world_space, 0);

        // Through the raw bytes the GPU sees.
        let bytes = bytemuck::bytes_of(&inst).to_vec();
        let back: SpriteInstance = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(back.to_cmd(), cmd);
    }

    #[test]
    fn world_space_flag_is_one() {
        let cmd = SpriteCmd::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(SpriteInstance::from_cmd(&cmd).world_space, 1);
    }

    #[test]
    fn pack_instances_replaces_scratch_contents() {
        let mut scratch = vec![SpriteInstance::zeroed(); 5];
        let cmds = [sample(), SpriteCmd::new(Vec2::ONE, Vec2::ONE)];
        pack_instances(&cmds, &mut scratch);
        assert_eq!(scratch.len(), 2);
        assert_eq!(scratch[1].position, [1.0, 1.0]);
    }

    // ── uniform packing ───────────────────────────────────────────────────

    #[test]
    fn uniforms_carry_camera_and_resolution() {
        let projection = Mat4::from_scale(Vec3::new(0.5, 0.25, 1.0));
        let view = Mat4::from_translation(Vec3::new(-10.0, 0.0, 0.0));
        let u = pack_uniforms(&CameraCmd::new(projection, view), Viewport::new(640.0, 480.0));

        assert_eq!(u.projection, projection.to_cols_array_2d());
        assert_eq!(u.view_projection, (projection * view).to_cols_array_2d());
        assert_eq!(u.resolution, [640.0, 480.0]);
    }
}
