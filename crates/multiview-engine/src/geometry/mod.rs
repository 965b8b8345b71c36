//! Typed vertex/element storage and the primitive topologies that consume it.

mod buffer;
mod topology;
mod vertex;

pub use buffer::GeometryBuffer;
pub use topology::{Dimension, Topology};
pub use vertex::{Position, VertexSource};
