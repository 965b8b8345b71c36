//! Coordinate types shared by the view grid, drawables and renderers.
//!
//! Pixel space:
//! - Physical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Model space is whatever the drawables' vertices are in; cameras map it to clip space.

mod aabb;
mod rect;
mod size;

pub use aabb::Aabb;
pub use rect::PixelRect;
pub use size::TargetSize;
