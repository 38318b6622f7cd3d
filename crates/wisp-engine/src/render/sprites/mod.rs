//! Instanced sprite batching.
//!
//! - `pack`: GPU record layouts and the instance/uniform packers
//! - `batch`: the GPU-agnostic batch scheduler, driven through [`BatchSink`]
//! - `renderer`: the wgpu implementation of the sink and its resources

mod batch;
mod pack;
mod quad;
mod renderer;

pub use batch::{batch_count, BatchSink, BatchStats, RenderError, SpriteBatcher};
pub use pack::{pack_instances, pack_uniforms, SpriteInstance, SpriteUniforms, INSTANCE_COUNT};
pub use renderer::{SpriteRenderer, SpriteRendererConfig};
