use core::fmt;

/// Primitive assembly rule applied to a drawable's (indexed) vertices.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
    /// Line segments in screen space, pre-normalized to the render target at upload.
    Lines2D,
}

impl Topology {
    /// Vertices consumed per primitive.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            Topology::Points => 1,
            Topology::Lines | Topology::Lines2D => 2,
            Topology::Triangles => 3,
        }
    }

    /// Screen-space topologies ignore the viewport camera.
    #[inline]
    pub const fn is_screen_space(self) -> bool {
        matches!(self, Topology::Lines2D)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Topology::Points => "points",
            Topology::Lines => "lines",
            Topology::Triangles => "triangles",
            Topology::Lines2D => "2d lines",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of components per vertex position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Two => f.write_str("2D"),
            Dimension::Three => f.write_str("3D"),
        }
    }
}
