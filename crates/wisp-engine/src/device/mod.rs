//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates and configures the Surface (swapchain)
//! - acquires frames and provides an encoder + view for rendering
//!
//! The surface's frame latency is what makes sprite slot reuse safe: it is
//! configured from `sprite::FRAME_COUNT` unless overridden.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
