use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::sprite::{CameraCmd, SpriteCmd};

use super::batch::{BatchSink, BatchStats, RenderError, SpriteBatcher};
use super::pack::{SpriteInstance, SpriteUniforms, INSTANCE_COUNT};
use super::quad::{premul_alpha_blend, QuadVertex, QUAD_INDICES, QUAD_VERTICES};

const INSTANCE_STRIDE: u64 = std::mem::size_of::<SpriteInstance>() as u64;

/// Bytes reserved per batch region in the instance buffer.
const BATCH_BYTES: u64 = INSTANCE_STRIDE * INSTANCE_COUNT as u64;

/// The instance buffer shrinks once demand stays at or below
/// `1 / SHRINK_RATIO` of its regions for `SHRINK_AFTER_FRAMES` frames.
const SHRINK_RATIO: usize = 4;
const SHRINK_AFTER_FRAMES: u32 = 240;

/// Sprite renderer settings.
#[derive(Debug, Clone)]
pub struct SpriteRendererConfig {
    /// Prefix for wgpu debug labels.
    pub label: String,
    /// Texture filter. `Nearest` keeps pixel art crisp.
    pub filter: wgpu::FilterMode,
}

impl Default for SpriteRendererConfig {
    fn default() -> Self {
        Self {
            label: "wisp sprite".to_string(),
            filter: wgpu::FilterMode::Linear,
        }
    }
}

/// Instanced sprite renderer.
///
/// Wraps a [`SpriteBatcher`] with the wgpu resources needed to draw it: one
/// pipeline, a unit quad, the per-pass uniform buffer, and an instance buffer
/// split into whole-batch regions. Batch `i` lives in region `i % regions`.
/// The first round of batches is written through the queue; a batch that
/// lands on a region already used this frame ends the current render pass
/// and is copied in by the encoder, so no draw ever reads another batch's
/// data. The region count is capped by the device's `max_buffer_size`.
///
/// One texture is bound per pass (`set_texture`); without one, a 1x1 white
/// texture is bound and sprites render as flat color.
///
/// Frame protocol: `submit*` during the frame, `render` inside the frame's
/// draw callback, `flip` after the frame was handed to the surface.
#[derive(Default)]
pub struct SpriteRenderer {
    config: SpriteRendererConfig,
    batcher: SpriteBatcher,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,

    sampler: Option<wgpu::Sampler>,
    white_view: Option<wgpu::TextureView>,
    texture_view: Option<wgpu::TextureView>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    regions: RegionBudget,

    warned_no_camera: bool,
    warned_region_reuse: bool,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpriteRendererConfig) -> Self {
        Self { config, ..Self::default() }
    }

    // ── submission ────────────────────────────────────────────────────────

    #[inline]
    pub fn submit(&mut self, sprite: SpriteCmd) {
        self.batcher.submit(sprite);
    }

    #[inline]
    pub fn extend<I>(&mut self, sprites: I)
    where
        I: IntoIterator<Item = SpriteCmd>,
    {
        self.batcher.extend(sprites);
    }

    #[inline]
    pub fn submit_camera(&mut self, camera: CameraCmd) {
        self.batcher.submit_camera(camera);
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.batcher.pending()
    }

    #[inline]
    pub fn active_slot(&self) -> usize {
        self.batcher.active_slot()
    }

    #[inline]
    pub fn batcher(&self) -> &SpriteBatcher {
        &self.batcher
    }

    /// Opens the next frame slot. Call once per presented frame.
    #[inline]
    pub fn flip(&mut self) {
        self.batcher.flip();
    }

    /// Binds `view` for every following pass, replacing the white default.
    pub fn set_texture(&mut self, view: wgpu::TextureView) {
        self.texture_view = Some(view);
        self.bind_group = None;
    }

    /// Uploads tightly packed, premultiplied RGBA8 `pixels` and binds them.
    pub fn set_texture_rgba8(
        &mut self,
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), RenderError> {
        check_rgba8(width, height, pixels.len())?;
        let label = format!("{} texture", self.config.label);
        let view = upload_rgba8(ctx, &label, width, height, pixels);
        self.set_texture(view);
        Ok(())
    }

    /// Reverts to the white default texture.
    pub fn clear_texture(&mut self) {
        if self.texture_view.take().is_some() {
            self.bind_group = None;
        }
    }

    /// Whether a caller texture is bound instead of the white default.
    #[inline]
    pub fn has_texture(&self) -> bool {
        self.texture_view.is_some()
    }

    // ── render ────────────────────────────────────────────────────────────

    /// Records the current frame slot into `target`, one instanced draw per batch.
    ///
    /// Passes load the existing color attachment, so sprites composite over
    /// whatever was drawn before. Without a camera nothing is recorded.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<BatchStats, RenderError> {
        if self.batcher.camera().is_none() {
            if !self.warned_no_camera {
                log::warn!("SpriteRenderer: no camera submitted; sprite pass skipped");
                self.warned_no_camera = true;
            }
            return Err(RenderError::NoCamera);
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_sampler(ctx);
        self.ensure_white_texture(ctx);
        self.ensure_uniform_buffer(ctx);
        self.ensure_bindings(ctx);

        let batches = self.batcher.pending_batches();
        self.ensure_instance_capacity(ctx, batches);

        let regions = self.regions.regions;
        if batches > regions && !self.warned_region_reuse {
            log::debug!(
                "SpriteRenderer: {batches} batches exceed {regions} buffer regions; \
                 later batches are copied between passes"
            );
            self.warned_region_reuse = true;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(BatchStats::default()) };
        let Some(bind_group) = self.bind_group.as_ref() else { return Ok(BatchStats::default()) };
        let Some(uniform_ubo) = self.uniform_ubo.as_ref() else { return Ok(BatchStats::default()) };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return Ok(BatchStats::default()) };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return Ok(BatchStats::default()) };
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return Ok(BatchStats::default()) };

        // Passes open lazily on the first draw; an empty frame records none.
        let mut sink = PassSink {
            device: ctx.device,
            queue: ctx.queue,
            encoder: &mut *target.encoder,
            color_view: target.color_view,
            label: &self.config.label,
            pipeline,
            bind_group,
            quad_vbo,
            quad_ibo,
            uniform_ubo,
            instance_vbo,
            regions,
            passes: 0,
            rpass: None,
        };
        let stats = self.batcher.render(ctx.viewport, &mut sink)?;
        let passes = sink.finish();

        log::trace!(
            "SpriteRenderer: slot {} drew {} sprites in {} batches over {passes} passes",
            self.batcher.active_slot(),
            stats.sprites,
            stats.batches
        );
        Ok(stats)
    }

    // ── lazy resources ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let label = &self.config.label;
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} shader")),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{label} bgl")),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(uniforms_min_binding_size()),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(&format!("{label} pipeline layout")),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("SpriteRenderer: pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        let label = &self.config.label;
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad vbo")),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} quad ibo")),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} sampler", self.config.label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.config.filter,
            min_filter: self.config.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_white_texture(&mut self, ctx: &RenderCtx<'_>) {
        if self.white_view.is_some() {
            return;
        }
        let label = format!("{} white texture", self.config.label);
        self.white_view = Some(upload_rgba8(ctx, &label, 1, 1, &[255u8; 4]));
        self.bind_group = None;
    }

    fn ensure_uniform_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_ubo.is_some() {
            return;
        }
        self.uniform_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} uniforms", self.config.label)),
            size: std::mem::size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(view) = self.texture_view.as_ref().or(self.white_view.as_ref()) else { return };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bind group", self.config.label)),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.bind_group = Some(bind_group);
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, batches: usize) {
        let cap = region_cap(ctx.device.limits().max_buffer_size);
        let Some(regions) = self.regions.plan(batches, cap) else { return };

        log::debug!(
            "SpriteRenderer: instance buffer resized to {regions} regions ({} sprites)",
            regions * INSTANCE_COUNT
        );

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} instance vbo", self.config.label)),
            size: regions as u64 * BATCH_BYTES,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }
}

/// Whole batch regions that fit in one buffer of at most `max_buffer_size` bytes.
fn region_cap(max_buffer_size: u64) -> usize {
    usize::try_from(max_buffer_size / BATCH_BYTES).unwrap_or(usize::MAX).max(1)
}

/// Region backing `batch` when the buffer holds `regions` of them.
#[inline]
fn region_of(batch: usize, regions: usize) -> usize {
    batch % regions.max(1)
}

/// Byte offset of `region` inside the instance buffer.
#[inline]
fn region_offset(region: usize) -> u64 {
    region as u64 * BATCH_BYTES
}

/// Sizing policy of the instance buffer, in batch regions.
///
/// Grows to the next power of two (up to the device cap) as soon as a frame
/// needs more; shrinks only after a sustained run of small frames.
#[derive(Debug, Default)]
struct RegionBudget {
    regions: usize,
    low_frames: u32,
}

impl RegionBudget {
    /// Returns the new region count when the buffer must be reallocated.
    fn plan(&mut self, batches: usize, cap: usize) -> Option<usize> {
        let wanted = batches.max(1).next_power_of_two().min(cap);

        if wanted > self.regions || self.regions > cap {
            return Some(self.resize(wanted));
        }

        if wanted.saturating_mul(SHRINK_RATIO) <= self.regions {
            self.low_frames += 1;
            if self.low_frames >= SHRINK_AFTER_FRAMES {
                return Some(self.resize(wanted));
            }
        } else {
            self.low_frames = 0;
        }
        None
    }

    fn resize(&mut self, regions: usize) -> usize {
        self.regions = regions;
        self.low_frames = 0;
        regions
    }
}

/// Rejects pixel buffers that are not exactly `width * height` RGBA8 texels.
fn check_rgba8(width: u32, height: u32, len: usize) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || len != expected {
        return Err(RenderError::TextureSize { width, height, len });
    }
    Ok(())
}

fn upload_rgba8(
    ctx: &RenderCtx<'_>,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// `SpriteUniforms` is a fixed, non-empty struct.
fn uniforms_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<SpriteUniforms>() as u64)
        .expect("SpriteUniforms has non-zero size by construction")
}

/// Records one frame's sprite batches into the target encoder.
///
/// Render passes open on demand and close before any encoder copy.
struct PassSink<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    encoder: &'a mut wgpu::CommandEncoder,
    color_view: &'a wgpu::TextureView,
    label: &'a str,
    pipeline: &'a wgpu::RenderPipeline,
    bind_group: &'a wgpu::BindGroup,
    quad_vbo: &'a wgpu::Buffer,
    quad_ibo: &'a wgpu::Buffer,
    uniform_ubo: &'a wgpu::Buffer,
    instance_vbo: &'a wgpu::Buffer,
    regions: usize,
    passes: usize,
    rpass: Option<wgpu::RenderPass<'static>>,
}

impl PassSink<'_> {
    fn pass(&mut self) -> &mut wgpu::RenderPass<'static> {
        let pass = match self.rpass.take() {
            Some(pass) => pass,
            None => self.begin_pass(),
        };
        self.rpass.insert(pass)
    }

    fn begin_pass(&mut self) -> wgpu::RenderPass<'static> {
        let label = format!("{} pass {}", self.label, self.passes);
        let mut pass = self
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        pass.set_pipeline(self.pipeline);
        pass.set_bind_group(0, self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        pass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        self.passes += 1;
        pass
    }

    /// Ends the open pass, if any, and returns how many were recorded.
    fn finish(mut self) -> usize {
        self.rpass = None;
        self.passes
    }
}

impl BatchSink for PassSink<'_> {
    fn upload_uniforms(&mut self, uniforms: &SpriteUniforms) {
        self.queue.write_buffer(self.uniform_ubo, 0, bytemuck::bytes_of(uniforms));
    }

    fn upload_instances(&mut self, batch: usize, instances: &[SpriteInstance]) {
        let bytes: &[u8] = bytemuck::cast_slice(instances);
        let offset = region_offset(region_of(batch, self.regions));

        if batch < self.regions {
            self.queue.write_buffer(self.instance_vbo, offset, bytes);
            return;
        }

        // The region was drawn from earlier in this frame; queue writes land
        // before the whole submission, so refill it in command order instead.
        self.rpass = None;
        let staging = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} staging {batch}", self.label)),
            contents: bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        self.encoder
            .copy_buffer_to_buffer(&staging, 0, self.instance_vbo, offset, bytes.len() as u64);
    }

    fn draw_instanced(&mut self, batch: usize, instance_count: u32) {
        let start = region_offset(region_of(batch, self.regions));
        let end = start + instance_count as u64 * INSTANCE_STRIDE;
        let instance_vbo = self.instance_vbo;

        let pass = self.pass();
        pass.set_vertex_buffer(1, instance_vbo.slice(start..end));
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sprites::batch_count;

    // ── instance regions ──────────────────────────────────────────────────

    #[test]
    fn regions_do_not_overlap_in_the_instance_buffer() {
        assert_eq!(region_offset(0), 0);
        assert_eq!(region_offset(1), INSTANCE_COUNT as u64 * 56);
        assert_eq!(region_offset(3) - region_offset(2), BATCH_BYTES);
    }

    #[test]
    fn region_cap_fits_the_device_buffer_limit() {
        let limit = wgpu::Limits::default().max_buffer_size;
        let cap = region_cap(limit);
        assert!(cap as u64 * BATCH_BYTES <= limit);
        assert!((cap as u64 + 1) * BATCH_BYTES > limit);

        // A limit smaller than one batch still yields a usable buffer.
        assert_eq!(region_cap(0), 1);
    }

    #[test]
    fn huge_frame_is_capped_instead_of_exceeding_the_limit() {
        let limit = wgpu::Limits::default().max_buffer_size;
        let cap = region_cap(limit);
        let batches = batch_count(4096 * INSTANCE_COUNT + 1);

        let mut budget = RegionBudget::default();
        let regions = budget.plan(batches, cap).expect("first frame allocates");
        assert_eq!(regions, cap);
        assert!(regions as u64 * BATCH_BYTES <= limit);

        // Batches past the cap reuse regions from the start.
        assert_eq!(region_of(cap, regions), 0);
        assert_eq!(region_of(batches - 1, regions), (batches - 1) % cap);
    }

    #[test]
    fn budget_grows_in_powers_of_two() {
        let mut budget = RegionBudget::default();
        assert_eq!(budget.plan(0, 64), Some(1));
        assert_eq!(budget.plan(1, 64), None);
        assert_eq!(budget.plan(3, 64), Some(4));
        assert_eq!(budget.plan(4, 64), None);
        assert_eq!(budget.plan(5, 64), Some(8));
        assert_eq!(budget.plan(500, 64), Some(64));
        assert_eq!(budget.plan(500, 64), None);
    }

    #[test]
    fn budget_shrinks_only_after_sustained_small_frames() {
        let mut budget = RegionBudget::default();
        assert_eq!(budget.plan(16, 64), Some(16));

        for _ in 0..SHRINK_AFTER_FRAMES - 1 {
            assert_eq!(budget.plan(2, 64), None);
        }
        // A busy frame resets the countdown.
        assert_eq!(budget.plan(9, 64), None);
        for _ in 0..SHRINK_AFTER_FRAMES - 1 {
            assert_eq!(budget.plan(2, 64), None);
        }
        assert_eq!(budget.plan(2, 64), Some(2));
        assert_eq!(budget.regions, 2);
    }

    #[test]
    fn budget_follows_a_smaller_device_cap() {
        let mut budget = RegionBudget::default();
        assert_eq!(budget.plan(32, 64), Some(32));
        assert_eq!(budget.plan(32, 8), Some(8));
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn rgba8_upload_requires_exact_texel_count() {
        assert_eq!(check_rgba8(2, 2, 16), Ok(()));
        assert_eq!(
            check_rgba8(2, 2, 12),
            Err(RenderError::TextureSize { width: 2, height: 2, len: 12 })
        );
        assert!(check_rgba8(0, 4, 0).is_err());
    }

    #[test]
    fn clearing_without_a_texture_keeps_the_default() {
        let mut r = SpriteRenderer::new();
        assert!(!r.has_texture());
        r.clear_texture();
        assert!(!r.has_texture());
    }

    // ── config / forwarding ───────────────────────────────────────────────

    #[test]
    fn default_config_uses_linear_filtering() {
        let cfg = SpriteRendererConfig::default();
        assert_eq!(cfg.filter, wgpu::FilterMode::Linear);
        assert_eq!(cfg.label, "wisp sprite");
    }

    #[test]
    fn renderer_forwards_submissions_to_its_batcher() {
        let mut r = SpriteRenderer::new();
        r.submit(SpriteCmd::new(glam::Vec2::ZERO, glam::Vec2::ONE));
        r.submit_camera(CameraCmd::identity());
        assert_eq!(r.pending(), 1);
        assert!(r.batcher().camera().is_some());

        r.flip();
        assert_eq!(r.pending(), 0);
        assert_eq!(r.active_slot(), 1);
    }
}
