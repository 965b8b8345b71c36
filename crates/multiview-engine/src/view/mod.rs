//! Viewports, their cameras, and the grid that lays them out over one target.

mod camera;
mod grid;
mod viewport;

pub use camera::Camera;
pub use grid::{layout_cell, ViewGrid};
pub use viewport::{Cell, Viewport};
