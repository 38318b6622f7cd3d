//! Coordinate types shared by the sprite pipeline.
//!
//! Screen space:
//! - logical pixels (DPI-aware)
//! - origin top-left, +X right, +Y down
//!
//! World space is whatever the active camera maps onto the viewport.

mod viewport;

pub use glam::{Mat4, Vec2};
pub use viewport::Viewport;
