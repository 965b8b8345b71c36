use crate::geometry::Topology;
use crate::paint::Color;

/// Per-drawable render parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawableStyle {
    pub color: Color,
}

impl DrawableStyle {
    /// Default look for a freshly created drawable of `topology`.
    pub fn for_topology(topology: Topology) -> Self {
        let color = match topology {
            Topology::Points => Color::from_rgb_u8(60, 110, 200),
            Topology::Lines => Color::from_rgb_u8(30, 30, 30),
            Topology::Triangles => Color::from_rgb_u8(255, 204, 102),
            Topology::Lines2D => Color::from_rgb_u8(200, 40, 40),
        };
        Self { color }
    }
}
