use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::coords::Aabb;
use crate::error::{Error, Result};

use super::{Dimension, Topology, VertexSource};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Vertex positions plus optional element (index) list for one drawable.
///
/// Invariants, enforced by every mutating call:
/// - every element index is `< vertex_count()`
/// - the element count is a multiple of the owning topology's arity
/// - once non-empty vertices were uploaded, the dimension never changes
///
/// Mutations replace the previous contents entirely. A rejected call leaves
/// the buffer untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<f32>,
    elements: Vec<u32>,
    dimension: Option<Dimension>,
    /// Process-wide unique stamp of the last successful mutation. `0` = never written.
    revision: u64,
}

impl GeometryBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex width, fixed by the first non-empty upload.
    #[inline]
    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.dimension
            .map_or(0, |d| self.positions.len() / d.components())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Flat vertex components, `dimension().components()` per vertex.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let width = self.dimension?.components();
        let start = index.checked_mul(width)?;
        self.positions.get(start..start.checked_add(width)?)
    }

    #[inline]
    pub fn elements(&self) -> &[u32] {
        &self.elements
    }

    /// `false` means vertices are assembled sequentially.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        !self.elements.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replaces all vertices. The dimension comes from the data's type.
    ///
    /// Fails with `DimensionMismatch` if the width differs from earlier uploads,
    /// or `IndexOutOfRange` if the current elements would reference dropped vertices.
    pub fn set_vertices<V>(&mut self, data: &V) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        let dimension = self.resolve_dimension(data)?;
        check_indices(&self.elements, data.vertex_count())?;

        self.positions.clear();
        data.write_flat(&mut self.positions);
        self.dimension = dimension;
        self.revision = next_revision();
        Ok(())
    }

    /// Replaces all vertices with screen-space pixel positions, normalized to
    /// device coordinates of a `width` x `height` target (origin top-left, +Y down).
    pub fn set_screen_vertices<V>(&mut self, data: &V, width: f32, height: f32) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidTargetSize { width, height });
        }
        if data.vertex_count() > 0 && data.dimension() != Dimension::Two {
            return Err(Error::DimensionMismatch {
                expected: Dimension::Two,
                actual: data.dimension(),
            });
        }
        let dimension = self.resolve_dimension(data)?;
        check_indices(&self.elements, data.vertex_count())?;

        self.positions.clear();
        data.write_flat(&mut self.positions);
        for p in self.positions.chunks_exact_mut(2) {
            p[0] = 2.0 * p[0] / width - 1.0;
            p[1] = 1.0 - 2.0 * p[1] / height;
        }
        self.dimension = dimension;
        self.revision = next_revision();
        Ok(())
    }

    /// Replaces the element list.
    ///
    /// Indices are checked against the current vertex count first, then the
    /// length against `topology`'s arity.
    pub fn set_elements(&mut self, indices: &[u32], topology: Topology) -> Result<()> {
        check_indices(indices, self.vertex_count())?;
        check_arity(indices.len(), topology)?;

        self.elements.clear();
        self.elements.extend_from_slice(indices);
        self.revision = next_revision();
        Ok(())
    }

    /// Replaces vertices and elements together, validating the pair as a whole.
    ///
    /// Unlike two separate calls this can shrink indexed geometry in one step.
    pub fn replace<V>(&mut self, data: &V, indices: &[u32], topology: Topology) -> Result<()>
    where
        V: VertexSource + ?Sized,
    {
        let dimension = self.resolve_dimension(data)?;
        check_indices(indices, data.vertex_count())?;
        check_arity(indices.len(), topology)?;

        self.positions.clear();
        data.write_flat(&mut self.positions);
        self.elements.clear();
        self.elements.extend_from_slice(indices);
        self.dimension = dimension;
        self.revision = next_revision();
        Ok(())
    }

    /// Number of whole primitives `topology` assembles from this buffer.
    pub fn primitive_count(&self, topology: Topology) -> usize {
        let assembled = if self.is_indexed() {
            self.elements.len()
        } else {
            self.vertex_count()
        };
        assembled / topology.arity()
    }

    /// Iterates positions widened to 3D (`z = 0` for 2D buffers).
    pub fn iter_xyz(&self) -> impl Iterator<Item = Vec3> + '_ {
        let width = self.dimension.map_or(3, Dimension::components);
        self.positions.chunks_exact(width).map(move |p| match width {
            2 => Vec3::new(p[0], p[1], 0.0),
            _ => Vec3::new(p[0], p[1], p[2]),
        })
    }

    /// Positions widened to 3D, ready for a single vertex layout on the GPU.
    pub fn positions_xyz(&self) -> Vec<[f32; 3]> {
        self.iter_xyz().map(|v| v.to_array()).collect()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.iter_xyz())
    }

    fn resolve_dimension<V>(&self, data: &V) -> Result<Option<Dimension>>
    where
        V: VertexSource + ?Sized,
    {
        if data.vertex_count() == 0 {
            return Ok(self.dimension);
        }
        match self.dimension {
            Some(expected) if expected != data.dimension() => Err(Error::DimensionMismatch {
                expected,
                actual: data.dimension(),
            }),
            _ => Ok(Some(data.dimension())),
        }
    }
}

fn check_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(Error::IndexOutOfRange { index, vertex_count }),
        None => Ok(()),
    }
}

fn check_arity(len: usize, topology: Topology) -> Result<()> {
    let arity = topology.arity();
    if len % arity != 0 {
        return Err(Error::TopologyLengthMismatch { topology, len, arity });
    }
    Ok(())
}
