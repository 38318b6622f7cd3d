use super::SpriteCmd;

/// Number of frames that may be in flight at once.
///
/// One command slot exists per frame in flight. The surface's maximum frame
/// latency is configured from the same value (see `device::GpuInit`).
pub const FRAME_COUNT: usize = 2;

/// Per-frame-in-flight sprite command store.
///
/// Exactly one slot is writable at a time. `flip()` rotates the writable slot
/// and clears it; slot vectors keep their capacity, so a warmed-up store does
/// not allocate per frame.
#[derive(Debug)]
pub struct FrameSlots {
    slots: [Vec<SpriteCmd>; FRAME_COUNT],
    active: usize,
}

impl Default for FrameSlots {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| Vec::new()),
            active: 0,
        }
    }
}

impl FrameSlots {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request to the writable slot.
    #[inline]
    pub fn push(&mut self, cmd: SpriteCmd) {
        self.slots[self.active].push(cmd);
    }

    /// Appends requests in iteration order.
    #[inline]
    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = SpriteCmd>,
    {
        self.slots[self.active].extend(cmds);
    }

    /// Requests submitted to the writable slot, in submission order.
    #[inline]
    pub fn active(&self) -> &[SpriteCmd] {
        &self.slots[self.active]
    }

    /// Index of the writable slot, in `0..FRAME_COUNT`.
    #[inline]
    pub fn active_slot(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.slots[self.active].len()
    }

    /// Advances to the next slot and clears it for new submissions.
    ///
    /// The slot being cleared was last written `FRAME_COUNT` frames ago; the
    /// caller must pace frames so the GPU has finished with it.
    pub fn flip(&mut self) {
        self.active = (self.active + 1) % FRAME_COUNT;
        self.slots[self.active].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sprite(x: f32) -> SpriteCmd {
        SpriteCmd::new(Vec2::new(x, x), Vec2::ONE)
    }

    // ── submission ────────────────────────────────────────────────────────

    #[test]
    fn push_preserves_submission_order() {
        let mut slots = FrameSlots::new();
        slots.push(sprite(0.0));
        slots.push(sprite(1.0));
        slots.extend([sprite(2.0), sprite(3.0)]);

        let xs: Vec<f32> = slots.active().iter().map(|s| s.position.x).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(slots.pending(), 4);
    }

    // ── flip ──────────────────────────────────────────────────────────────

    #[test]
    fn flip_cycles_modulo_frame_count() {
        let mut slots = FrameSlots::new();
        for k in 1..=(3 * FRAME_COUNT + 1) {
            slots.flip();
            assert_eq!(slots.active_slot(), k % FRAME_COUNT);
        }
    }

    #[test]
    fn new_active_slot_is_empty_after_flip() {
        let mut slots = FrameSlots::new();
        for frame in 0..(2 * FRAME_COUNT) {
            for i in 0..=frame {
                slots.push(sprite(i as f32));
            }
            slots.flip();
            assert_eq!(slots.pending(), 0);
            assert!(slots.active().is_empty());
        }
    }

    #[test]
    fn flip_leaves_other_slots_untouched() {
        let mut slots = FrameSlots::new();
        slots.push(sprite(7.0));
        slots.flip();
        slots.push(sprite(8.0));

        // Slot 0 still holds the previous frame until it becomes writable again.
        assert_eq!(slots.slots[0].len(), 1);
        assert_eq!(slots.active()[0].position.x, 8.0);
    }
}
