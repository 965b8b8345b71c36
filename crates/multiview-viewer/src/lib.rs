//! Desktop host for the multiview engine: one window, a grid of views, and the
//! drawables assigned to them.

mod app;
pub mod tutorial;

pub use app::MultiViewer;
