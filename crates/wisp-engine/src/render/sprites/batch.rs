use crate::coords::Viewport;
use crate::sprite::{CameraCmd, FrameSlots, SpriteCmd};

use super::pack::{pack_instances, pack_uniforms, SpriteInstance, SpriteUniforms, INSTANCE_COUNT};

/// Destination of one sprite pass.
///
/// Call order per pass: `upload_uniforms` once, then for every batch
/// `upload_instances` followed by `draw_instanced`, with batch indices
/// increasing from zero.
pub trait BatchSink {
    fn upload_uniforms(&mut self, uniforms: &SpriteUniforms);

    /// `instances.len() <= INSTANCE_COUNT`.
    fn upload_instances(&mut self, batch: usize, instances: &[SpriteInstance]);

    /// Draws `instance_count` instances of the batch uploaded last under `batch`.
    fn draw_instanced(&mut self, batch: usize, instance_count: u32);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("sprite pass has no camera; submit a CameraCmd before the first render")]
    NoCamera,
    #[error("RGBA8 texture {width}x{height} does not match {len} pixel bytes")]
    TextureSize { width: u32, height: u32, len: usize },
}

/// Result of one sprite pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BatchStats {
    pub sprites: usize,
    pub batches: usize,
}

/// Number of instanced draws needed for `sprites` requests.
#[inline]
pub const fn batch_count(sprites: usize) -> usize {
    sprites.div_ceil(INSTANCE_COUNT)
}

/// GPU-agnostic sprite batching engine.
///
/// Owns the frame slots and the camera state. Submission appends to the
/// writable slot; `render` splits that slot into positional runs of at most
/// [`INSTANCE_COUNT`] and feeds them to a [`BatchSink`] in submission order;
/// `flip` hands the slot over to the GPU and opens the next one.
#[derive(Debug, Default)]
pub struct SpriteBatcher {
    slots: FrameSlots,
    camera: Option<CameraCmd>,
    scratch: Vec<SpriteInstance>,
    warned_non_finite: bool,
}

impl SpriteBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a sprite for the current frame.
    ///
    /// Never fails; runs longer than one batch are split at render time.
    pub fn submit(&mut self, cmd: SpriteCmd) {
        if !self.warned_non_finite && !cmd.is_finite() {
            log::debug!("SpriteBatcher: non-finite sprite submitted; drawing it as-is");
            self.warned_non_finite = true;
        }
        self.slots.push(cmd);
    }

    /// Queues several sprites in iteration order.
    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = SpriteCmd>,
    {
        for cmd in cmds {
            self.submit(cmd);
        }
    }

    /// Replaces the camera. The last call before `render` wins.
    #[inline]
    pub fn submit_camera(&mut self, camera: CameraCmd) {
        self.camera = Some(camera);
    }

    #[inline]
    pub fn camera(&self) -> Option<&CameraCmd> {
        self.camera.as_ref()
    }

    /// Requests waiting in the writable slot.
    #[inline]
    pub fn pending(&self) -> usize {
        self.slots.pending()
    }

    #[inline]
    pub fn pending_batches(&self) -> usize {
        batch_count(self.slots.pending())
    }

    #[inline]
    pub fn active_slot(&self) -> usize {
        self.slots.active_slot()
    }

    /// Emits the writable slot into `sink`.
    ///
    /// Uniforms are uploaded once even when the slot is empty. Fails without
    /// touching `sink` if no camera was ever submitted.
    pub fn render<S>(&mut self, viewport: Viewport, sink: &mut S) -> Result<BatchStats, RenderError>
    where
        S: BatchSink + ?Sized,
    {
        let camera = self.camera.as_ref().ok_or(RenderError::NoCamera)?;
        sink.upload_uniforms(&pack_uniforms(camera, viewport));

        let sprites = self.slots.active();
        let mut batches = 0;
        for (batch, run) in sprites.chunks(INSTANCE_COUNT).enumerate() {
            pack_instances(run, &mut self.scratch);
            sink.upload_instances(batch, &self.scratch);
            sink.draw_instanced(batch, run.len() as u32);
            batches += 1;
        }

        Ok(BatchStats { sprites: sprites.len(), batches })
    }

    /// Advances to the next frame slot and clears it.
    #[inline]
    pub fn flip(&mut self) {
        self.slots.flip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::FRAME_COUNT;
    use glam::{Mat4, Vec2, Vec3};

    #[derive(Debug, PartialEq)]
    enum Call {
        Uniforms(SpriteUniforms),
        Upload(usize, Vec<SpriteInstance>),
        Draw(usize, u32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn draws(&self) -> Vec<(usize, u32)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(b, n) => Some((*b, *n)),
                    _ => None,
                })
                .collect()
        }

        fn uploaded(&self) -> Vec<SpriteInstance> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Upload(_, v) => Some(v.clone()),
                    _ => None,
                })
                .flatten()
                .collect()
        }

        fn uniforms(&self) -> Vec<SpriteUniforms> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Uniforms(u) => Some(*u),
                    _ => None,
                })
                .collect()
        }
    }

    impl BatchSink for Recorder {
        fn upload_uniforms(&mut self, uniforms: &SpriteUniforms) {
            self.calls.push(Call::Uniforms(*uniforms));
        }

        fn upload_instances(&mut self, batch: usize, instances: &[SpriteInstance]) {
            self.calls.push(Call::Upload(batch, instances.to_vec()));
        }

        fn draw_instanced(&mut self, batch: usize, instance_count: u32) {
            self.calls.push(Call::Draw(batch, instance_count));
        }
    }

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn sprite(i: usize) -> SpriteCmd {
        SpriteCmd::new(Vec2::new(i as f32, 0.0), Vec2::splat(8.0))
    }

    fn batcher_with(n: usize) -> SpriteBatcher {
        let mut b = SpriteBatcher::new();
        b.submit_camera(CameraCmd::identity());
        b.extend((0..n).map(sprite));
        b
    }

    fn render(b: &mut SpriteBatcher) -> (BatchStats, Recorder) {
        let mut rec = Recorder::default();
        let stats = b.render(VIEWPORT, &mut rec).unwrap();
        (stats, rec)
    }

    // ── batch splitting ───────────────────────────────────────────────────

    #[test]
    fn draw_count_is_ceil_of_capacity() {
        for n in [0, 1, 7, INSTANCE_COUNT - 1, INSTANCE_COUNT, INSTANCE_COUNT + 1, 3 * INSTANCE_COUNT + 5] {
            let (stats, rec) = render(&mut batcher_with(n));
            assert_eq!(rec.draws().len(), n.div_ceil(INSTANCE_COUNT), "n = {n}");
            assert_eq!(stats, BatchStats { sprites: n, batches: batch_count(n) });
        }
    }

    #[test]
    fn exactly_capacity_is_one_full_batch() {
        let (_, rec) = render(&mut batcher_with(INSTANCE_COUNT));
        assert_eq!(rec.draws(), [(0, INSTANCE_COUNT as u32)]);
    }

    #[test]
    fn one_over_capacity_spills_a_single_instance() {
        let (_, rec) = render(&mut batcher_with(INSTANCE_COUNT + 1));
        assert_eq!(rec.draws(), [(0, INSTANCE_COUNT as u32), (1, 1)]);
    }

    #[test]
    fn batches_concatenate_to_submission_order() {
        let n = 2 * INSTANCE_COUNT + 17;
        let (_, rec) = render(&mut batcher_with(n));
        let xs: Vec<f32> = rec.uploaded().iter().map(|i| i.position[0]).collect();
        let expected: Vec<f32> = (0..n).map(|i| i as f32).collect();
        assert_eq!(xs, expected);
    }

    #[test]
    fn each_batch_uploads_before_it_draws() {
        let (_, rec) = render(&mut batcher_with(INSTANCE_COUNT + 3));
        let shape: Vec<&str> = rec
            .calls
            .iter()
            .map(|c| match c {
                Call::Uniforms(_) => "u",
                Call::Upload(..) => "up",
                Call::Draw(..) => "d",
            })
            .collect();
        assert_eq!(shape, ["u", "up", "d", "up", "d"]);
    }

    // ── uniforms / camera ─────────────────────────────────────────────────

    #[test]
    fn empty_slot_uploads_uniforms_without_drawing() {
        let (stats, rec) = render(&mut batcher_with(0));
        assert_eq!(rec.uniforms().len(), 1);
        assert!(rec.draws().is_empty());
        assert_eq!(stats.batches, 0);
    }

    #[test]
    fn uniforms_upload_once_per_pass() {
        let (_, rec) = render(&mut batcher_with(5 * INSTANCE_COUNT));
        assert_eq!(rec.uniforms().len(), 1);
    }

    #[test]
    fn last_camera_wins() {
        let mut b = batcher_with(1);
        let first = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let second = Mat4::from_scale(Vec3::splat(3.0));
        b.submit_camera(CameraCmd::new(Mat4::IDENTITY, first));
        b.submit_camera(CameraCmd::new(second, Mat4::IDENTITY));

        let (_, rec) = render(&mut b);
        let u = rec.uniforms()[0];
        assert_eq!(u.projection, second.to_cols_array_2d());
        assert_eq!(u.view_projection, second.to_cols_array_2d());
        assert_eq!(u.resolution, [800.0, 600.0]);
    }

    #[test]
    fn render_without_camera_is_rejected() {
        let mut b = SpriteBatcher::new();
        b.submit(sprite(0));
        let mut rec = Recorder::default();
        assert_eq!(b.render(VIEWPORT, &mut rec), Err(RenderError::NoCamera));
        assert!(rec.calls.is_empty());
        assert_eq!(b.pending(), 1);
    }

    // ── frame cycling ─────────────────────────────────────────────────────

    #[test]
    fn flip_starts_an_empty_frame() {
        let mut b = batcher_with(10);
        b.flip();
        assert_eq!(b.pending(), 0);
        assert_eq!(b.active_slot(), 1 % FRAME_COUNT);

        let (stats, rec) = render(&mut b);
        assert_eq!(stats.sprites, 0);
        assert!(rec.draws().is_empty());
    }

    #[test]
    fn camera_persists_across_flips() {
        let mut b = batcher_with(0);
        for _ in 0..FRAME_COUNT + 1 {
            b.flip();
        }
        b.submit(sprite(1));
        let (stats, _) = render(&mut b);
        assert_eq!(stats.batches, 1);
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn three_sprites_identity_camera_single_batch() {
        let mut b = SpriteBatcher::new();
        for p in [0.0, 10.0, 20.0] {
            b.submit(SpriteCmd::new(Vec2::splat(p), Vec2::ONE));
        }
        b.submit_camera(CameraCmd::identity());

        let (_, rec) = render(&mut b);
        assert_eq!(rec.draws(), [(0, 3)]);
        let positions: Vec<[f32; 2]> = rec.uploaded().iter().map(|i| i.position).collect();
        assert_eq!(positions, [[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]]);
    }
}
