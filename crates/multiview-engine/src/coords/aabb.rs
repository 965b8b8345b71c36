use glam::Vec3;

/// Axis-aligned bounding box in model space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    ///
    /// Non-finite points are ignored.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Aabb>, p| match acc {
                None => Some(Aabb::new(p, p)),
                Some(b) => Some(Aabb::new(b.min.min(p), b.max.max(p))),
            })
    }

    #[inline]
    pub fn union(self, other: Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`center`](Self::center).
    #[inline]
    pub fn radius(self) -> f32 {
        (self.max - self.min).length() * 0.5
    }
}
