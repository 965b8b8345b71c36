use std::sync::Arc;

use glam::Mat4;

use crate::coords::{PixelRect, TargetSize};
use crate::geometry::{GeometryBuffer, Topology};
use crate::scene::{DrawableId, DrawableStyle};
use crate::view::{Camera, Cell};

use super::{DrawCall, FrameStats, RenderBackend, ViewportBinding};

/// A drawable as captured for one frame.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub id: DrawableId,
    pub name: Arc<str>,
    pub topology: Topology,
    pub style: DrawableStyle,
    pub buffer: Arc<GeometryBuffer>,
}

/// One viewport as captured for one frame, draw items in assignment order.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub cell: Cell,
    pub rect: PixelRect,
    pub camera: Camera,
    pub items: Vec<DrawItem>,
}

/// Self-contained copy of everything a frame reads.
///
/// Geometry is shared by `Arc`, so capturing is cheap and later mutations of the
/// coordinator never leak into a frame that is already being rendered. Hidden
/// and empty drawables are filtered out at capture time.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub(crate) target: TargetSize,
    pub(crate) views: Vec<ViewSnapshot>,
    pub(crate) separators: Vec<[[f32; 2]; 2]>,
    pub(crate) skipped_hidden: usize,
    pub(crate) skipped_empty: usize,
}

impl FrameSnapshot {
    #[inline]
    pub fn target_size(&self) -> TargetSize {
        self.target
    }

    /// Captured viewports in row-major order.
    #[inline]
    pub fn views(&self) -> &[ViewSnapshot] {
        &self.views
    }

    #[inline]
    pub fn separators(&self) -> &[[[f32; 2]; 2]] {
        &self.separators
    }

    /// Replays the frame into `backend`.
    pub fn render<B>(&self, backend: &mut B) -> FrameStats
    where
        B: RenderBackend + ?Sized,
    {
        let mut stats = FrameStats {
            viewports: self.views.len(),
            skipped_hidden: self.skipped_hidden,
            skipped_empty: self.skipped_empty,
            ..FrameStats::default()
        };

        backend.begin_frame(self.target);

        for view in &self.views {
            let view_projection = view.camera.view_projection(view.rect.aspect());
            backend.bind_viewport(&ViewportBinding {
                cell: view.cell,
                rect: view.rect,
                camera: &view.camera,
                view_projection,
            });

            for item in &view.items {
                let transform = if item.topology.is_screen_space() {
                    Mat4::IDENTITY
                } else {
                    view_projection
                };
                let call = DrawCall {
                    cell: view.cell,
                    rect: view.rect,
                    id: item.id,
                    name: &item.name,
                    topology: item.topology,
                    style: item.style,
                    buffer: &item.buffer,
                    transform,
                };
                stats.draws += 1;
                stats.primitives += call.primitive_count();
                backend.draw(&call);
            }
        }

        if !self.separators.is_empty() {
            backend.draw_separators(&self.separators);
        }

        backend.end_frame(&stats);

        log::trace!(
            "frame: {} viewports, {} draws, {} primitives ({} hidden, {} empty skipped)",
            stats.viewports,
            stats.draws,
            stats.primitives,
            stats.skipped_hidden,
            stats.skipped_empty
        );

        stats
    }
}
