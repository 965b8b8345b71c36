use glam::Mat4;

use crate::coords::{PixelRect, TargetSize};
use crate::geometry::Topology;
use crate::scene::DrawableId;
use crate::view::Cell;

use super::{DrawCall, FrameStats, RenderBackend, ViewportBinding};

/// A draw as seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub cell: Cell,
    pub rect: PixelRect,
    pub id: DrawableId,
    pub name: String,
    pub topology: Topology,
    pub vertex_count: usize,
    pub index_count: usize,
    pub max_index: Option<u32>,
    pub primitives: usize,
    pub revision: u64,
    pub transform: Mat4,
}

/// Backend callbacks in the order they were received.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Begin(TargetSize),
    Bind { cell: Cell, rect: PixelRect },
    Draw(RecordedDraw),
    Separators(usize),
    End(FrameStats),
}

/// Headless backend that records every call instead of rendering.
///
/// Useful for tests and for hosts that want to inspect a frame without a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    events: Vec<Recorded>,
    frames: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn events(&self) -> &[Recorded] {
        &self.events
    }

    /// Number of completed frames since creation or the last [`clear`](Self::clear).
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.events.iter().filter_map(|e| match e {
            Recorded::Draw(d) => Some(d),
            _ => None,
        })
    }

    pub fn draws_in(&self, cell: Cell) -> Vec<&RecordedDraw> {
        self.draws().filter(|d| d.cell == cell).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.frames = 0;
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, target: TargetSize) {
        self.events.push(Recorded::Begin(target));
    }

    fn bind_viewport(&mut self, binding: &ViewportBinding<'_>) {
        self.events.push(Recorded::Bind {
            cell: binding.cell,
            rect: binding.rect,
        });
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.events.push(Recorded::Draw(RecordedDraw {
            cell: call.cell,
            rect: call.rect,
            id: call.id,
            name: call.name.to_string(),
            topology: call.topology,
            vertex_count: call.buffer.vertex_count(),
            index_count: call.elements().len(),
            max_index: call.elements().iter().copied().max(),
            primitives: call.primitive_count(),
            revision: call.buffer.revision(),
            transform: call.transform,
        }));
    }

    fn draw_separators(&mut self, lines: &[[[f32; 2]; 2]]) {
        self.events.push(Recorded::Separators(lines.len()));
    }

    fn end_frame(&mut self, stats: &FrameStats) {
        self.events.push(Recorded::End(*stats));
        self.frames += 1;
    }
}
