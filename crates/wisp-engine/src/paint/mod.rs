//! Color model shared between sprite requests and the GPU records.

pub mod color;

pub use color::Color;
