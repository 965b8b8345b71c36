//! GPU rendering subsystem.
//!
//! [`DrawableRenderer`] is the wgpu implementation of
//! [`RenderBackend`](crate::frame::RenderBackend). It owns its GPU resources
//! (pipelines, per-drawable buffers, uniforms, depth target).
//!
//! Convention:
//! - model-space drawables are transformed by their viewport camera
//! - screen-space drawables are already in device coordinates
//! - each grid cell is rasterized through its own viewport and scissor rect

mod ctx;
mod drawables;

pub use ctx::{RenderCtx, RenderTarget};
pub use drawables::DrawableRenderer;
