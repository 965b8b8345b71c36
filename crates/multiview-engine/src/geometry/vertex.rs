use super::Dimension;

/// A single vertex position of fixed width.
pub trait Position: Copy {
    const DIMENSION: Dimension;

    fn extend_flat(self, out: &mut Vec<f32>);
}

impl Position for [f32; 2] {
    const DIMENSION: Dimension = Dimension::Two;

    #[inline]
    fn extend_flat(self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self);
    }
}

impl Position for [f32; 3] {
    const DIMENSION: Dimension = Dimension::Three;

    #[inline]
    fn extend_flat(self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self);
    }
}

impl Position for glam::Vec2 {
    const DIMENSION: Dimension = Dimension::Two;

    #[inline]
    fn extend_flat(self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}

impl Position for glam::Vec3 {
    const DIMENSION: Dimension = Dimension::Three;

    #[inline]
    fn extend_flat(self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}

/// Anything that can be uploaded as a vertex list.
///
/// Implemented for slices, arrays and `Vec`s of [`Position`]s, so the width of
/// the data is known from its type.
pub trait VertexSource {
    fn dimension(&self) -> Dimension;

    fn vertex_count(&self) -> usize;

    /// Appends every vertex as consecutive `f32` components.
    fn write_flat(&self, out: &mut Vec<f32>);
}

impl<P: Position> VertexSource for [P] {
    #[inline]
    fn dimension(&self) -> Dimension {
        P::DIMENSION
    }

    #[inline]
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn write_flat(&self, out: &mut Vec<f32>) {
        out.reserve(self.len() * P::DIMENSION.components());
        for p in self {
            p.extend_flat(out);
        }
    }
}

impl<P: Position, const N: usize> VertexSource for [P; N] {
    #[inline]
    fn dimension(&self) -> Dimension {
        P::DIMENSION
    }

    #[inline]
    fn vertex_count(&self) -> usize {
        N
    }

    #[inline]
    fn write_flat(&self, out: &mut Vec<f32>) {
        self.as_slice().write_flat(out);
    }
}

impl<P: Position> VertexSource for Vec<P> {
    #[inline]
    fn dimension(&self) -> Dimension {
        P::DIMENSION
    }

    #[inline]
    fn vertex_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn write_flat(&self, out: &mut Vec<f32>) {
        self.as_slice().write_flat(out);
    }
}
