use std::sync::Arc;

use crate::error::{Error, Result};
use crate::geometry::{GeometryBuffer, Topology, VertexSource};

use super::DrawableStyle;

/// A named renderable unit: one geometry buffer assembled by one topology.
///
/// The buffer sits behind an `Arc`. Updates go through `Arc::make_mut`, so a
/// frame snapshot that still holds the previous buffer keeps seeing it whole
/// while the drawable moves on to the new contents.
#[derive(Debug, Clone)]
pub struct Drawable {
    name: Arc<str>,
    topology: Topology,
    buffer: Arc<GeometryBuffer>,
    visible: bool,
    style: DrawableStyle,
}

impl Drawable {
    /// Creates an empty, visible drawable. Fails with `EmptyName` for `""`.
    pub fn new(name: impl Into<String>, topology: Topology) -> Result<Self> {
        let name: String = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self {
            name: name.into(),
            topology,
            buffer: Arc::new(GeometryBuffer::new()),
            visible: true,
            style: DrawableStyle::for_topology(topology),
        })
    }

    #[inline]
    pub fn points(name: impl Into<String>) -> Result<Self> {
        Self::new(name, Topology::Points)
    }

    #[inline]
    pub fn lines(name: impl Into<String>) -> Result<Self> {
        Self::new(name, Topology::Lines)
    }

    #[inline]
    pub fn triangles(name: impl Into<String>) -> Result<Self> {
        Self::new(name, Topology::Triangles)
    }

    #[inline]
    pub fn lines_2d(name: impl Into<String>) -> Result<Self> {
        Self::new(name, Topology::Lines2D)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hides or shows the drawable without touching its viewport assignments.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn style(&self) -> DrawableStyle {
        self.style
    }

    #[inline]
    pub fn set_style(&mut self, style: DrawableStyle) {
        self.style = style;
    }

    #[inline]
    pub fn buffer(&self) -> &GeometryBuffer {
        &self.buffer
    }

    /// Shares the current buffer contents; later updates do not affect the returned value.
    #[inline]
    pub fn snapshot(&self) -> Arc<GeometryBuffer> {
        Arc::clone(&self.buffer)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.buffer.vertex_count()
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.buffer.primitive_count(self.topology)
    }

    /// Uploads model-space vertices. Not available for screen-space topologies.
    pub fn update_vertex_buffer<V>(&mut self, data: &V) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        if self.topology.is_screen_space() {
            return Err(Error::WrongCoordinateSpace {
                topology: self.topology,
                attempted: "model-space",
            });
        }
        Arc::make_mut(&mut self.buffer).set_vertices(data)
    }

    /// Uploads pixel-space vertices for a `width` x `height` render target.
    ///
    /// The conversion happens once, here; resizing the target afterwards does
    /// not re-normalize, call this again with the new size instead.
    pub fn update_screen_vertex_buffer<V>(&mut self, data: &V, width: f32, height: f32) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        if !self.topology.is_screen_space() {
            return Err(Error::WrongCoordinateSpace {
                topology: self.topology,
                attempted: "screen-space",
            });
        }
        Arc::make_mut(&mut self.buffer).set_screen_vertices(data, width, height)
    }

    pub fn update_element_buffer(&mut self, indices: &[u32]) -> Result<()> {
        let topology = self.topology;
        Arc::make_mut(&mut self.buffer).set_elements(indices, topology)
    }

    /// Replaces model-space vertices and elements in one validated step.
    pub fn update_buffers<V>(&mut self, data: &V, indices: &[u32]) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        if self.topology.is_screen_space() {
            return Err(Error::WrongCoordinateSpace {
                topology: self.topology,
                attempted: "model-space",
            });
        }
        let topology = self.topology;
        Arc::make_mut(&mut self.buffer).replace(data, indices, topology)
    }
}
