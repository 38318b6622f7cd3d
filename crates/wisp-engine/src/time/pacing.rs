use std::time::{Duration, Instant};

use super::FrameTime;

/// Decides when the runtime may start the next frame.
///
/// Called once after every presented frame. Returning `None` redraws as soon
/// as the event loop is idle; `Some(t)` parks the loop until `t`.
pub trait FramePacer {
    fn next_frame_at(&mut self, frame: &FrameTime) -> Option<Instant>;
}

/// Redraw continuously; presentation (vsync) is the only limiter.
#[derive(Debug, Copy, Clone, Default)]
pub struct Unpaced;

impl FramePacer for Unpaced {
    fn next_frame_at(&mut self, _frame: &FrameTime) -> Option<Instant> {
        None
    }
}

/// Starts frames no more often than once per `interval`.
#[derive(Debug, Copy, Clone)]
pub struct TargetInterval {
    interval: Duration,
}

impl TargetInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// `hz <= 0` or non-finite disables pacing (zero interval).
    pub fn from_hz(hz: f32) -> Self {
        if hz.is_finite() && hz > 0.0 {
            Self::new(Duration::from_secs_f64(1.0 / hz as f64))
        } else {
            Self::new(Duration::ZERO)
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FramePacer for TargetInterval {
    fn next_frame_at(&mut self, frame: &FrameTime) -> Option<Instant> {
        if self.interval.is_zero() {
            return None;
        }
        Some(frame.now + self.interval)
    }
}

impl<P: FramePacer + ?Sized> FramePacer for Box<P> {
    fn next_frame_at(&mut self, frame: &FrameTime) -> Option<Instant> {
        (**self).next_frame_at(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameTime {
        FrameTime { dt: 0.016, now: Instant::now(), frame_index: 0 }
    }

    #[test]
    fn unpaced_never_waits() {
        assert_eq!(Unpaced.next_frame_at(&frame()), None);
    }

    #[test]
    fn target_interval_schedules_from_frame_start() {
        let ft = frame();
        let mut pacer = TargetInterval::new(Duration::from_millis(20));
        assert_eq!(pacer.next_frame_at(&ft), Some(ft.now + Duration::from_millis(20)));
    }

    #[test]
    fn from_hz_converts_rate() {
        let pacer = TargetInterval::from_hz(50.0);
        assert_eq!(pacer.interval(), Duration::from_millis(20));
    }

    #[test]
    fn non_positive_rate_disables_pacing() {
        let mut pacer = TargetInterval::from_hz(0.0);
        assert_eq!(pacer.next_frame_at(&frame()), None);
        assert_eq!(TargetInterval::from_hz(f32::NAN).interval(), Duration::ZERO);
    }

    #[test]
    fn boxed_pacer_delegates() {
        let mut pacer: Box<dyn FramePacer> = Box::new(TargetInterval::from_hz(100.0));
        assert!(pacer.next_frame_at(&frame()).is_some());
    }
}
