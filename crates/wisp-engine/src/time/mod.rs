//! Frame timing.
//!
//! - `FrameClock`: one per window; `tick()` once per presented frame
//! - `FramePacer`: caller-supplied policy deciding when the next frame may start

mod frame_clock;
mod pacing;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacing::{FramePacer, TargetInterval, Unpaced};
