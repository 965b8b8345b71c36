//! Drawables: named geometry plus topology and render state.
//!
//! Drawables are built and filled independently of any view. Once handed to a
//! `frame::RenderCoordinator` they are owned by its registry and referred to by
//! [`DrawableId`].

mod drawable;
mod id;
mod style;

pub use drawable::Drawable;
pub use id::DrawableId;
pub use style::DrawableStyle;
