use super::PixelRect;

/// Render-target size in physical pixels.
///
/// This is the coordinate basis for view grid layout and for normalizing
/// screen-space vertices. A zero extent is legal (minimized window); layout then
/// produces empty rects and nothing is drawn.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The whole target as a rect anchored at the origin.
    #[inline]
    pub const fn rect(self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for TargetSize {
    #[inline]
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}
