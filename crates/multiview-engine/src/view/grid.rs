use crate::coords::{PixelRect, TargetSize};
use crate::error::{Error, Result};
use crate::scene::DrawableId;

use super::{Cell, Viewport};

/// `rows` x `cols` viewports tiling one render target.
///
/// Every cell always holds exactly one viewport. Storage and iteration are
/// row-major, which is also the render order.
#[derive(Debug, Clone)]
pub struct ViewGrid {
    rows: usize,
    cols: usize,
    target: TargetSize,
    viewports: Vec<Viewport>,
}

impl ViewGrid {
    /// Allocates all viewports eagerly, each with its own default camera.
    pub fn new(rows: usize, cols: usize, target: TargetSize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGridSize { rows, cols });
        }

        let viewports = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col)))
            .map(|cell| Viewport::new(cell, layout_cell(target, rows, cols, cell)))
            .collect();

        Ok(Self {
            rows,
            cols,
            target,
            viewports,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn target_size(&self) -> TargetSize {
        self.target
    }

    pub fn viewport(&self, row: usize, col: usize) -> Result<&Viewport> {
        let i = self.index(row, col)?;
        Ok(&self.viewports[i])
    }

    pub fn viewport_mut(&mut self, row: usize, col: usize) -> Result<&mut Viewport> {
        let i = self.index(row, col)?;
        Ok(&mut self.viewports[i])
    }

    /// Viewports in row-major order.
    #[inline]
    pub fn viewports(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }

    #[inline]
    pub fn viewports_mut(&mut self) -> impl Iterator<Item = &mut Viewport> {
        self.viewports.iter_mut()
    }

    /// Re-lays out every viewport for a new target size.
    pub fn resize(&mut self, target: TargetSize) {
        self.target = target;
        let (rows, cols) = (self.rows, self.cols);
        for vp in &mut self.viewports {
            vp.set_rect(layout_cell(target, rows, cols, vp.cell()));
        }
        log::debug!(
            "view grid {}x{} laid out for {}x{}",
            rows, cols, target.width, target.height
        );
    }

    /// The viewport under a pixel, if the pixel is inside the target.
    pub fn cell_at(&self, x: u32, y: u32) -> Option<Cell> {
        if x >= self.target.width || y >= self.target.height {
            return None;
        }
        let row = axis_slot(y, self.target.height, self.rows);
        let col = axis_slot(x, self.target.width, self.cols);
        Some(Cell::new(row, col))
    }

    /// Division lines between cells as `[start, end]` pairs in device
    /// coordinates of the whole target. Empty for a zero-size target.
    pub fn separators(&self) -> Vec<[[f32; 2]; 2]> {
        if self.target.is_empty() {
            return Vec::new();
        }
        let (w, h) = (self.target.width as f32, self.target.height as f32);
        let step_x = self.target.width / self.cols as u32;
        let step_y = self.target.height / self.rows as u32;

        let verticals = (1..self.cols).map(|c| {
            let x = 2.0 * (c as u32 * step_x) as f32 / w - 1.0;
            [[x, -1.0], [x, 1.0]]
        });
        let horizontals = (1..self.rows).map(|r| {
            let y = 1.0 - 2.0 * (r as u32 * step_y) as f32 / h;
            [[-1.0, y], [1.0, y]]
        });
        verticals.chain(horizontals).collect()
    }

    pub(crate) fn assign(&mut self, row: usize, col: usize, id: DrawableId) -> Result<()> {
        let i = self.index(row, col)?;
        self.viewports[i].push(id);
        Ok(())
    }

    pub(crate) fn unassign(&mut self, row: usize, col: usize, id: DrawableId) -> Result<bool> {
        let i = self.index(row, col)?;
        Ok(self.viewports[i].remove_first(id))
    }

    /// Drops `id` from every viewport, returning the number of removed references.
    pub(crate) fn unassign_everywhere(&mut self, id: DrawableId) -> usize {
        self.viewports.iter_mut().map(|vp| vp.remove_all(id)).sum()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }
}

/// Pixel rect of `cell` in a `rows` x `cols` grid over `target`.
///
/// Cells get `extent / count` pixels per axis; the remainder goes to the last
/// row and column so the grid covers the target without gaps.
pub fn layout_cell(target: TargetSize, rows: usize, cols: usize, cell: Cell) -> PixelRect {
    let (x, width) = axis_span(target.width, cols, cell.col);
    let (y, height) = axis_span(target.height, rows, cell.row);
    PixelRect::new(x, y, width, height)
}

fn axis_span(extent: u32, count: usize, slot: usize) -> (u32, u32) {
    let step = extent / count as u32;
    let start = slot as u32 * step;
    if slot + 1 == count {
        (start, extent - start)
    } else {
        (start, step)
    }
}

fn axis_slot(pos: u32, extent: u32, count: usize) -> usize {
    let step = extent / count as u32;
    if step == 0 {
        return count - 1;
    }
    ((pos / step) as usize).min(count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize, w: u32, h: u32) -> ViewGrid {
        ViewGrid::new(rows, cols, TargetSize::new(w, h)).unwrap()
    }

    fn assert_tiles(g: &ViewGrid) {
        let target = g.target_size();
        let rects: Vec<PixelRect> = g.viewports().map(Viewport::rect).collect();

        let covered: u64 = rects.iter().map(|r| r.area()).sum();
        assert_eq!(covered, target.rect().area(), "coverage for {target:?}");

        for (i, a) in rects.iter().enumerate() {
            assert!(a.right() <= target.width && a.bottom() <= target.height);
            for b in &rects[i + 1..] {
                assert!(a.intersect(*b).is_none(), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn zero_rows_or_cols_is_rejected() {
        for (rows, cols) in [(0, 2), (2, 0), (0, 0)] {
            let err = ViewGrid::new(rows, cols, TargetSize::new(800, 600)).unwrap_err();
            assert_eq!(err, Error::InvalidGridSize { rows, cols });
        }
    }

    #[test]
    fn every_cell_is_allocated_row_major() {
        let g = grid(2, 3, 600, 400);
        let cells: Vec<Cell> = g.viewports().map(Viewport::cell).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[2], Cell::new(0, 2));
        assert_eq!(cells[3], Cell::new(1, 0));
        assert!(g.viewports().all(|vp| vp.assigned().is_empty()));
    }

    #[test]
    fn out_of_range_cells_are_rejected() {
        let mut g = grid(2, 2, 800, 600);
        assert!(matches!(g.viewport(2, 0), Err(Error::OutOfRange { row: 2, col: 0, .. })));
        assert!(matches!(g.viewport_mut(0, 5), Err(Error::OutOfRange { .. })));
        assert!(g.assign(1, 2, DrawableId::new(1)).is_err());
    }

    #[test]
    fn even_split_of_800x600() {
        let g = grid(2, 2, 800, 600);
        assert_eq!(g.viewport(0, 0).unwrap().rect(), PixelRect::new(0, 0, 400, 300));
        assert_eq!(g.viewport(0, 1).unwrap().rect(), PixelRect::new(400, 0, 400, 300));
        assert_eq!(g.viewport(1, 0).unwrap().rect(), PixelRect::new(0, 300, 400, 300));
        assert_eq!(g.viewport(1, 1).unwrap().rect(), PixelRect::new(400, 300, 400, 300));
    }

    #[test]
    fn remainder_pixels_go_to_last_row_and_column() {
        let g = grid(3, 3, 802, 601);
        assert_eq!(g.viewport(0, 0).unwrap().rect(), PixelRect::new(0, 0, 267, 200));
        assert_eq!(g.viewport(2, 2).unwrap().rect(), PixelRect::new(534, 400, 268, 201));
        assert_tiles(&g);
    }

    #[test]
    fn resize_keeps_exact_tiling() {
        let mut g = grid(2, 2, 800, 600);
        for (w, h) in [(801, 599), (1, 1), (3, 7), (1920, 1080), (0, 480), (1023, 767)] {
            g.resize(TargetSize::new(w, h));
            assert_eq!(g.target_size(), TargetSize::new(w, h));
            assert_tiles(&g);
        }
    }

    #[test]
    fn tiling_holds_across_shapes() {
        for rows in 1..=4 {
            for cols in 1..=5 {
                for (w, h) in [(640, 480), (641, 479), (5, 3), (2, 2)] {
                    assert_tiles(&grid(rows, cols, w, h));
                }
            }
        }
    }

    #[test]
    fn cell_at_agrees_with_layout() {
        let g = grid(3, 2, 801, 599);
        for &(x, y) in &[(0, 0), (400, 199), (401, 200), (800, 598), (399, 598)] {
            let cell = g.cell_at(x, y).unwrap();
            let rect = g.viewport(cell.row, cell.col).unwrap().rect();
            assert!(rect.contains(x, y), "({x}, {y}) not in {cell} {rect:?}");
        }
        assert!(g.cell_at(801, 0).is_none());
    }

    #[test]
    fn separators_split_2x2_through_the_middle() {
        let g = grid(2, 2, 800, 600);
        assert_eq!(
            g.separators(),
            vec![[[0.0, -1.0], [0.0, 1.0]], [[-1.0, 0.0], [1.0, 0.0]]]
        );
        assert!(grid(1, 1, 800, 600).separators().is_empty());
        assert!(grid(2, 2, 0, 600).separators().is_empty());
    }

    #[test]
    fn unassign_everywhere_counts_references() {
        let mut g = grid(2, 2, 800, 600);
        let id = DrawableId::new(7);
        g.assign(0, 0, id).unwrap();
        g.assign(0, 0, id).unwrap();
        g.assign(1, 1, id).unwrap();

        assert!(g.unassign(1, 1, id).unwrap());
        assert!(!g.unassign(1, 1, id).unwrap());
        assert_eq!(g.unassign_everywhere(id), 2);
        assert!(g.viewports().all(|vp| vp.assigned().is_empty()));
    }
}
