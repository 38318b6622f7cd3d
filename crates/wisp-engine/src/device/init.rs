use crate::sprite::FRAME_COUNT;

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode; falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead of the GPU.
    ///
    /// Clamped to `1..=FRAME_COUNT`, so presentation runs at most as many
    /// frames ahead as there are sprite frame slots. Slots are CPU lists whose
    /// data the queue copies at upload time; the clamp bounds latency, it does
    /// not guard slot memory.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: FRAME_COUNT as u32,
        }
    }
}

impl GpuInit {
    /// Frame latency actually requested from the surface.
    pub(crate) fn frame_latency(&self) -> u32 {
        let latency = self.desired_maximum_frame_latency.clamp(1, FRAME_COUNT as u32);
        if latency != self.desired_maximum_frame_latency {
            log::warn!(
                "GpuInit: frame latency {} clamped to {latency} (sprite frame slots: {FRAME_COUNT})",
                self.desired_maximum_frame_latency
            );
        }
        latency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_latency_matches_frame_slots() {
        assert_eq!(GpuInit::default().frame_latency(), FRAME_COUNT as u32);
    }

    #[test]
    fn latency_beyond_frame_slots_is_clamped() {
        let init = GpuInit { desired_maximum_frame_latency: 8, ..GpuInit::default() };
        assert_eq!(init.frame_latency(), FRAME_COUNT as u32);

        let init = GpuInit { desired_maximum_frame_latency: 0, ..GpuInit::default() };
        assert_eq!(init.frame_latency(), 1);
    }
}
