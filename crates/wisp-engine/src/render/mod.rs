//! GPU rendering subsystem.
//!
//! Renderers consume `sprite` requests and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - screen-space geometry is in logical pixels (top-left origin, +Y down)
//! - world-space geometry goes through the camera's view-projection

mod ctx;
pub mod sprites;

pub use ctx::{RenderCtx, RenderTarget};
