//! Window + runtime loop.
//!
//! Owns the `winit` event loop and windows, binds a `Gpu` to each window, and
//! drives `core::App` once per redraw under a `time::FramePacer`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
