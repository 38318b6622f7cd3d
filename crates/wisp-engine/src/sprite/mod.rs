//! Sprite submission types.
//!
//! Responsibilities:
//! - immutable per-sprite and per-camera request values
//! - the frame-in-flight command store and its cycler
//! - a 2D camera helper producing camera requests
//!
//! Nothing here touches the GPU; `render::sprites` consumes these types.

mod camera;
mod cmd;
mod slots;

pub use camera::Camera2d;
pub use cmd::{CameraCmd, Space, SpriteCmd};
pub use slots::{FrameSlots, FRAME_COUNT};
