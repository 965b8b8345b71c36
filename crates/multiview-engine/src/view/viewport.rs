use core::fmt;

use crate::coords::PixelRect;
use crate::scene::DrawableId;

use super::Camera;

/// Grid address of a viewport.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One cell of a [`ViewGrid`](super::ViewGrid): a pixel rect, a camera, and the
/// drawables shown in it.
///
/// The assignment list holds ids, never drawables. Order is draw order and the
/// same id may appear more than once (each occurrence is drawn).
#[derive(Debug, Clone)]
pub struct Viewport {
    cell: Cell,
    rect: PixelRect,
    camera: Camera,
    assigned: Vec<DrawableId>,
}

impl Viewport {
    pub(crate) fn new(cell: Cell, rect: PixelRect) -> Self {
        Self {
            cell,
            rect,
            camera: Camera::default(),
            assigned: Vec::new(),
        }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Pixel rect from the most recent layout.
    #[inline]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn assigned(&self) -> &[DrawableId] {
        &self.assigned
    }

    #[inline]
    pub fn is_assigned(&self, id: DrawableId) -> bool {
        self.assigned.contains(&id)
    }

    pub(crate) fn set_rect(&mut self, rect: PixelRect) {
        self.rect = rect;
    }

    pub(crate) fn push(&mut self, id: DrawableId) {
        self.assigned.push(id);
    }

    /// Removes the first occurrence of `id`.
    pub(crate) fn remove_first(&mut self, id: DrawableId) -> bool {
        match self.assigned.iter().position(|&a| a == id) {
            Some(i) => {
                self.assigned.remove(i);
                true
            }
            None => false,
        }
    }

    /// Removes every occurrence of `id`, returning how many there were.
    pub(crate) fn remove_all(&mut self, id: DrawableId) -> usize {
        let before = self.assigned.len();
        self.assigned.retain(|&a| a != id);
        before - self.assigned.len()
    }
}
