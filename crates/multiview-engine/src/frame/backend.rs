use std::sync::Arc;

use glam::Mat4;

use crate::coords::{PixelRect, TargetSize};
use crate::geometry::{GeometryBuffer, Topology};
use crate::scene::{DrawableId, DrawableStyle};
use crate::view::{Camera, Cell};

/// Receiver of one rendered frame.
///
/// Call order per frame:
/// 1) `begin_frame`
/// 2) for each viewport, row-major: `bind_viewport`, then `draw` per assigned drawable
/// 3) `draw_separators` (only if the grid has more than one cell)
/// 4) `end_frame`
///
/// Implementations must not fail; anything that could be invalid was rejected
/// when the drawable or grid was mutated.
pub trait RenderBackend {
    fn begin_frame(&mut self, target: TargetSize) {
        let _ = target;
    }

    fn bind_viewport(&mut self, binding: &ViewportBinding<'_>);

    fn draw(&mut self, call: &DrawCall<'_>);

    /// Cell division lines in device coordinates of the whole target.
    fn draw_separators(&mut self, lines: &[[[f32; 2]; 2]]) {
        let _ = lines;
    }

    fn end_frame(&mut self, stats: &FrameStats) {
        let _ = stats;
    }
}

/// Viewport state bound before its draws are issued.
#[derive(Debug, Copy, Clone)]
pub struct ViewportBinding<'a> {
    pub cell: Cell,
    pub rect: PixelRect,
    pub camera: &'a Camera,
    /// `camera.view_projection(rect.aspect())`
    pub view_projection: Mat4,
}

/// One draw of one drawable into the currently bound viewport.
#[derive(Debug, Copy, Clone)]
pub struct DrawCall<'a> {
    pub cell: Cell,
    pub rect: PixelRect,
    pub id: DrawableId,
    pub name: &'a str,
    pub topology: Topology,
    pub style: DrawableStyle,
    /// Shared so backends can keep the contents alive past the call.
    pub buffer: &'a Arc<GeometryBuffer>,
    /// Model to clip transform. Identity for screen-space topologies.
    pub transform: Mat4,
}

impl DrawCall<'_> {
    #[inline]
    pub fn vertices(&self) -> &[f32] {
        self.buffer.positions()
    }

    #[inline]
    pub fn elements(&self) -> &[u32] {
        self.buffer.elements()
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.buffer.primitive_count(self.topology)
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub viewports: usize,
    pub draws: usize,
    pub primitives: usize,
    /// Assignments skipped because the drawable was hidden.
    pub skipped_hidden: usize,
    /// Assignments skipped because the drawable had no vertices.
    pub skipped_empty: usize,
}
