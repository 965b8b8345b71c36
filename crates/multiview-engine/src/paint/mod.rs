//! Color model shared by drawable styles and renderers.
//!
//! Colors are linear and premultiplied; conversion to the surface format is
//! left to the render target.

mod color;

pub use color::Color;
