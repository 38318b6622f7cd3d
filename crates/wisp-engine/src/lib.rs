//! Wisp engine crate.
//!
//! Sprite submission, frame-pipelined instanced batching, and the wgpu/winit
//! runtime that drives them once per presented frame.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod sprite;
pub mod render;
