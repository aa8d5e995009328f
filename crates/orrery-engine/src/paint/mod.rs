//! Color model shared by scenes and renderers.

pub mod color;

pub use color::Color;
