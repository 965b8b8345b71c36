//! Multi-view drawable rendering.
//!
//! Geometry lives in [`Drawable`]s (one [`GeometryBuffer`] plus a topology).
//! A [`RenderCoordinator`] owns the drawables and a [`ViewGrid`] of viewports,
//! each with its own camera, and renders every viewport's assigned drawables
//! through a [`RenderBackend`]: the wgpu [`DrawableRenderer`], the headless
//! [`RecordingBackend`], or one of your own.
//!
//! The `window`, `device` and `core` modules provide a winit + wgpu runtime to
//! host the coordinator in a desktop window.

pub mod core;
pub mod device;
pub mod logging;
pub mod window;

pub mod coords;
pub mod frame;
pub mod geometry;
pub mod paint;
pub mod render;
pub mod scene;
pub mod view;

mod error;

pub use error::{Error, Result};

pub use coords::{Aabb, PixelRect, TargetSize};
pub use frame::{DrawCall, FrameSnapshot, FrameStats, RecordingBackend, RenderBackend, RenderCoordinator};
pub use geometry::{Dimension, GeometryBuffer, Topology};
pub use paint::Color;
pub use render::DrawableRenderer;
pub use scene::{Drawable, DrawableId, DrawableStyle};
pub use view::{Camera, Cell, ViewGrid, Viewport};
