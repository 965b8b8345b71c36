use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::coords::{Aabb, TargetSize};
use crate::error::{Error, Result};
use crate::scene::{Drawable, DrawableId};
use crate::view::{ViewGrid, Viewport};

use super::{DrawItem, FrameSnapshot, FrameStats, RenderBackend, ViewSnapshot};

/// Owns every drawable and the view grid, and turns them into frames.
///
/// Drawables are addressed by [`DrawableId`] (never reused) or by their unique
/// name. Viewports hold ids only, so removing a drawable here is the single
/// place that has to clean up references.
#[derive(Debug, Clone)]
pub struct RenderCoordinator {
    drawables: BTreeMap<DrawableId, Drawable>,
    names: HashMap<Arc<str>, DrawableId>,
    grid: ViewGrid,
    next_id: u64,
}

impl RenderCoordinator {
    pub fn new(rows: usize, cols: usize, target: TargetSize) -> Result<Self> {
        let grid = ViewGrid::new(rows, cols, target)?;
        log::debug!(
            "render coordinator: {rows}x{cols} grid on {}x{}",
            target.width,
            target.height
        );
        Ok(Self {
            drawables: BTreeMap::new(),
            names: HashMap::new(),
            grid,
            next_id: 1,
        })
    }

    // ── registry ───────────────────────────────────────────────────────

    /// Takes ownership of `drawable`. Fails with `DuplicateName` if the name is taken,
    /// in which case the registry is left as it was.
    pub fn register(&mut self, drawable: Drawable) -> Result<DrawableId> {
        if self.names.contains_key(drawable.name()) {
            return Err(Error::DuplicateName(drawable.name().to_string()));
        }

        let id = DrawableId::new(self.next_id);
        self.next_id += 1;

        log::debug!(
            "register {id} '{}' ({}, {} vertices)",
            drawable.name(),
            drawable.topology(),
            drawable.vertex_count()
        );

        self.names.insert(Arc::clone(drawable.shared_name()), id);
        self.drawables.insert(id, drawable);
        Ok(id)
    }

    /// Unregisters by name, after dropping every viewport reference to it.
    pub fn remove(&mut self, name: &str) -> Result<Drawable> {
        let id = self
            .id_of(name)
            .ok_or_else(|| Error::UnknownDrawable(name.to_string()))?;
        self.remove_id(id)
    }

    pub fn remove_id(&mut self, id: DrawableId) -> Result<Drawable> {
        if !self.drawables.contains_key(&id) {
            return Err(Error::UnknownDrawable(id.to_string()));
        }

        let refs = self.grid.unassign_everywhere(id);
        let Some(drawable) = self.drawables.remove(&id) else {
            return Err(Error::UnknownDrawable(id.to_string()));
        };
        self.names.remove(drawable.name());

        log::debug!("remove {id} '{}' ({refs} viewport references)", drawable.name());
        Ok(drawable)
    }

    #[inline]
    pub fn id_of(&self, name: &str) -> Option<DrawableId> {
        self.names.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, id: DrawableId) -> bool {
        self.drawables.contains_key(&id)
    }

    #[inline]
    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    /// Mutable access for buffer updates, style and visibility changes.
    #[inline]
    pub fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.drawables.get_mut(&id)
    }

    pub fn drawable_by_name(&self, name: &str) -> Option<&Drawable> {
        self.id_of(name).and_then(|id| self.drawables.get(&id))
    }

    pub fn drawable_by_name_mut(&mut self, name: &str) -> Option<&mut Drawable> {
        let id = self.id_of(name)?;
        self.drawables.get_mut(&id)
    }

    /// Registered drawables in registration order.
    pub fn drawables(&self) -> impl Iterator<Item = (DrawableId, &Drawable)> {
        self.drawables.iter().map(|(&id, d)| (id, d))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    // ── assignment ─────────────────────────────────────────────────────

    /// Appends `id` to the viewport at (`row`, `col`). Assigning the same drawable
    /// twice draws it twice.
    pub fn assign(&mut self, row: usize, col: usize, id: DrawableId) -> Result<()> {
        self.grid.viewport(row, col)?;
        if !self.contains(id) {
            return Err(Error::UnknownDrawable(id.to_string()));
        }
        self.grid.assign(row, col, id)?;
        log::trace!("assign {id} to ({row}, {col})");
        Ok(())
    }

    pub fn assign_by_name(&mut self, row: usize, col: usize, name: &str) -> Result<DrawableId> {
        self.grid.viewport(row, col)?;
        let id = self
            .id_of(name)
            .ok_or_else(|| Error::UnknownDrawable(name.to_string()))?;
        self.assign(row, col, id)?;
        Ok(id)
    }

    /// Removes the first occurrence of `id` from one viewport. Returns whether
    /// anything was removed.
    pub fn unassign(&mut self, row: usize, col: usize, id: DrawableId) -> Result<bool> {
        self.grid.unassign(row, col, id)
    }

    // ── views ──────────────────────────────────────────────────────────

    #[inline]
    pub fn grid(&self) -> &ViewGrid {
        &self.grid
    }

    #[inline]
    pub fn viewport(&self, row: usize, col: usize) -> Result<&Viewport> {
        self.grid.viewport(row, col)
    }

    /// Mutable viewport, mainly for camera control.
    #[inline]
    pub fn viewport_mut(&mut self, row: usize, col: usize) -> Result<&mut Viewport> {
        self.grid.viewport_mut(row, col)
    }

    #[inline]
    pub fn target_size(&self) -> TargetSize {
        self.grid.target_size()
    }

    pub fn resize(&mut self, target: TargetSize) {
        self.grid.resize(target);
    }

    /// Points every viewport camera at the union bounds of its model-space
    /// drawables. Viewports with nothing to fit keep their camera. Returns the
    /// number of cameras moved.
    pub fn fit_cameras(&mut self) -> usize {
        let drawables = &self.drawables;
        let mut fitted = 0;

        for vp in self.grid.viewports_mut() {
            let bounds = vp
                .assigned()
                .iter()
                .filter_map(|id| drawables.get(id))
                .filter(|d| !d.topology().is_screen_space())
                .filter_map(|d| d.buffer().bounds())
                .reduce(Aabb::union);

            if let Some(bounds) = bounds {
                vp.camera_mut().fit(bounds);
                fitted += 1;
            }
        }

        log::debug!("fitted {fitted} viewport cameras");
        fitted
    }

    // ── frames ─────────────────────────────────────────────────────────

    /// Captures the current state for rendering.
    ///
    /// Hidden drawables and drawables without vertices are left out. The
    /// snapshot shares geometry with the registry, so later updates do not
    /// reach it.
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut skipped_hidden = 0;
        let mut skipped_empty = 0;
        let mut views = Vec::with_capacity(self.grid.rows() * self.grid.cols());

        for vp in self.grid.viewports() {
            let mut items = Vec::with_capacity(vp.assigned().len());
            for id in vp.assigned() {
                let Some(drawable) = self.drawables.get(id) else {
                    log::warn!("viewport {} references unregistered {id}", vp.cell());
                    continue;
                };
                if !drawable.is_visible() {
                    skipped_hidden += 1;
                    continue;
                }
                if drawable.vertex_count() == 0 {
                    skipped_empty += 1;
                    continue;
                }
                items.push(DrawItem {
                    id: *id,
                    name: Arc::clone(drawable.shared_name()),
                    topology: drawable.topology(),
                    style: drawable.style(),
                    buffer: drawable.snapshot(),
                });
            }
            views.push(ViewSnapshot {
                cell: vp.cell(),
                rect: vp.rect(),
                camera: *vp.camera(),
                items,
            });
        }

        FrameSnapshot {
            target: self.grid.target_size(),
            views,
            separators: self.grid.separators(),
            skipped_hidden,
            skipped_empty,
        }
    }

    /// Renders one frame: every viewport in row-major order, each drawable in
    /// assignment order.
    pub fn render_frame<B>(&self, backend: &mut B) -> FrameStats
    where
        B: RenderBackend + ?Sized,
    {
        self.snapshot().render(backend)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use glam::Mat4;

    use super::*;
    use crate::coords::PixelRect;
    use crate::frame::{Recorded, RecordingBackend};
    use crate::geometry::Topology;
    use crate::view::Cell;

    const CUBE: [[f32; 3]; 8] = [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
    ];

    const CUBE_EDGES: [u32; 24] = [
        0, 1, 1, 2, 2, 3, 3, 0, // front
        4, 5, 5, 6, 6, 7, 7, 4, // back
        0, 4, 1, 5, 2, 6, 3, 7, // sides
    ];

    fn coordinator() -> RenderCoordinator {
        RenderCoordinator::new(2, 2, TargetSize::new(800, 600)).unwrap()
    }

    fn wireframe() -> Drawable {
        let mut d = Drawable::lines("wireframe").unwrap();
        d.update_buffers(&CUBE, &CUBE_EDGES).unwrap();
        d
    }

    fn dot(name: &str) -> Drawable {
        let mut d = Drawable::points(name).unwrap();
        d.update_vertex_buffer(&[[0.0, 0.0, 0.0]]).unwrap();
        d
    }

    // ── registry ───────────────────────────────────────────────────────

    #[test]
    fn zero_sized_grid_is_rejected() {
        let err = RenderCoordinator::new(0, 2, TargetSize::new(800, 600)).unwrap_err();
        assert_eq!(err, Error::InvalidGridSize { rows: 0, cols: 2 });
    }

    #[test]
    fn duplicate_name_is_rejected_and_registry_unchanged() {
        let mut rc = coordinator();
        let first = rc.register(Drawable::points("a").unwrap()).unwrap();

        let err = rc.register(Drawable::lines("a").unwrap()).unwrap_err();
        assert_eq!(err, Error::DuplicateName("a".into()));

        assert_eq!(rc.len(), 1);
        assert_eq!(rc.id_of("a"), Some(first));
        assert_eq!(rc.drawable(first).unwrap().topology(), Topology::Points);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut rc = coordinator();
        let a = rc.register(dot("a")).unwrap();
        rc.remove("a").unwrap();
        let b = rc.register(dot("a")).unwrap();
        assert_ne!(a, b);
        assert!(!rc.contains(a));
        assert_eq!(rc.id_of("a"), Some(b));
    }

    #[test]
    fn stale_id_is_rejected_after_name_is_reused() {
        let mut rc = coordinator();
        let old = rc.register(dot("a")).unwrap();
        rc.remove("a").unwrap();
        rc.register(dot("a")).unwrap();

        assert!(rc.drawable(old).is_none());
        assert_eq!(
            rc.assign(0, 0, old).unwrap_err(),
            Error::UnknownDrawable(old.to_string())
        );
        assert!(!rc.unassign(0, 0, old).unwrap());
    }

    #[test]
    fn drawables_iterate_in_registration_order() {
        let mut rc = coordinator();
        for name in ["z", "m", "a"] {
            rc.register(dot(name)).unwrap();
        }
        let names: Vec<&str> = rc.drawables().map(|(_, d)| d.name()).collect();
        assert_eq!(names, ["z", "m", "a"]);
    }

    #[test]
    fn remove_unknown_name_fails() {
        let mut rc = coordinator();
        assert_eq!(rc.remove("ghost").unwrap_err(), Error::UnknownDrawable("ghost".into()));
    }

    #[test]
    fn lookup_by_name_reaches_mutable_drawable() {
        let mut rc = coordinator();
        rc.register(dot("p")).unwrap();
        rc.drawable_by_name_mut("p").unwrap().set_visible(false);
        assert!(!rc.drawable_by_name("p").unwrap().is_visible());
        assert!(rc.drawable_by_name("q").is_none());
    }

    // ── assignment ─────────────────────────────────────────────────────

    #[test]
    fn assign_checks_cell_then_drawable() {
        let mut rc = coordinator();
        let id = rc.register(dot("p")).unwrap();

        assert!(matches!(rc.assign(2, 0, id), Err(Error::OutOfRange { .. })));
        rc.remove("p").unwrap();
        assert_eq!(rc.assign(0, 0, id).unwrap_err(), Error::UnknownDrawable(id.to_string()));
        assert!(matches!(rc.assign_by_name(0, 0, "p"), Err(Error::UnknownDrawable(_))));
    }

    #[test]
    fn unassign_removes_one_occurrence() {
        let mut rc = coordinator();
        let id = rc.register(dot("p")).unwrap();
        rc.assign(0, 1, id).unwrap();
        rc.assign(0, 1, id).unwrap();

        assert!(rc.unassign(0, 1, id).unwrap());
        assert_eq!(rc.viewport(0, 1).unwrap().assigned(), &[id]);
        assert!(!rc.unassign(1, 1, id).unwrap());
        assert!(rc.unassign(5, 5, id).is_err());
    }

    // ── frames ─────────────────────────────────────────────────────────

    #[test]
    fn wireframe_draws_once_in_its_cell() {
        let mut rc = coordinator();
        let id = rc.register(wireframe()).unwrap();
        rc.assign(1, 0, id).unwrap();

        let mut backend = RecordingBackend::new();
        let stats = rc.render_frame(&mut backend);

        let draws: Vec<_> = backend.draws().collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].cell, Cell::new(1, 0));
        assert_eq!(draws[0].rect, PixelRect::new(0, 300, 400, 300));
        assert_eq!(draws[0].primitives, 12);
        assert_eq!(draws[0].name, "wireframe");
        assert_eq!(stats.viewports, 4);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.primitives, 12);
    }

    #[test]
    fn double_assignment_draws_twice() {
        let mut rc = coordinator();
        let id = rc.register(wireframe()).unwrap();
        rc.assign(0, 0, id).unwrap();
        rc.assign(0, 0, id).unwrap();

        let mut backend = RecordingBackend::new();
        let stats = rc.render_frame(&mut backend);
        assert_eq!(backend.draws_in(Cell::new(0, 0)).len(), 2);
        assert_eq!(stats.primitives, 24);
    }

    #[test]
    fn removed_drawable_is_never_referenced() {
        let mut rc = coordinator();
        let id = rc.register(wireframe()).unwrap();
        let keep = rc.register(dot("keep")).unwrap();
        rc.assign(0, 0, id).unwrap();
        rc.assign(1, 1, id).unwrap();
        rc.assign(1, 1, keep).unwrap();

        let removed = rc.remove("wireframe").unwrap();
        assert_eq!(removed.name(), "wireframe");
        assert!(rc.grid().viewports().all(|vp| !vp.is_assigned(id)));

        let mut backend = RecordingBackend::new();
        rc.render_frame(&mut backend);
        assert!(backend.draws().all(|d| d.id != id));
        assert_eq!(backend.draws().count(), 1);
    }

    #[test]
    fn hidden_and_empty_drawables_are_skipped() {
        let mut rc = coordinator();
        let hidden = rc.register(dot("hidden")).unwrap();
        let empty = rc.register(Drawable::triangles("empty").unwrap()).unwrap();
        let shown = rc.register(dot("shown")).unwrap();
        rc.drawable_mut(hidden).unwrap().set_visible(false);
        for id in [hidden, empty, shown] {
            rc.assign(0, 0, id).unwrap();
        }

        let mut backend = RecordingBackend::new();
        let stats = rc.render_frame(&mut backend);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.skipped_hidden, 1);
        assert_eq!(stats.skipped_empty, 1);
        assert_eq!(backend.draws().next().unwrap().id, shown);

        // Hiding keeps the assignment.
        assert!(rc.viewport(0, 0).unwrap().is_assigned(hidden));
    }

    #[test]
    fn frame_callbacks_arrive_in_order() {
        let mut rc = coordinator();
        let a = rc.register(dot("a")).unwrap();
        let b = rc.register(wireframe()).unwrap();
        rc.assign(1, 1, b).unwrap();
        rc.assign(1, 1, a).unwrap();

        let mut backend = RecordingBackend::new();
        rc.render_frame(&mut backend);

        let events = backend.events();
        assert_eq!(events[0], Recorded::Begin(TargetSize::new(800, 600)));
        let binds: Vec<Cell> = events
            .iter()
            .filter_map(|e| match e {
                Recorded::Bind { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(
            binds,
            [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );

        let order: Vec<DrawableId> = backend.draws().map(|d| d.id).collect();
        assert_eq!(order, [b, a]);
        assert_eq!(events[events.len() - 2], Recorded::Separators(2));
        assert!(matches!(events.last(), Some(Recorded::End(_))));
        assert_eq!(backend.frames(), 1);
    }

    #[test]
    fn screen_space_draws_skip_the_camera() {
        let mut rc = coordinator();
        let mut star = Drawable::lines_2d("star").unwrap();
        star.update_screen_vertex_buffer(&[[0.0, 0.0], [800.0, 600.0]], 800.0, 600.0)
            .unwrap();
        star.update_element_buffer(&[0, 1]).unwrap();
        let star = rc.register(star).unwrap();
        let cube = rc.register(wireframe()).unwrap();
        rc.assign(1, 1, star).unwrap();
        rc.assign(1, 1, cube).unwrap();

        let mut backend = RecordingBackend::new();
        rc.render_frame(&mut backend);

        let draws = backend.draws_in(Cell::new(1, 1));
        assert_eq!(draws[0].transform, Mat4::IDENTITY);
        let camera = rc.viewport(1, 1).unwrap().camera();
        assert_eq!(draws[1].transform, camera.view_projection(400.0 / 300.0));
    }

    #[test]
    fn resize_relays_out_viewports() {
        let mut rc = coordinator();
        let id = rc.register(dot("p")).unwrap();
        rc.assign(1, 1, id).unwrap();
        rc.resize(TargetSize::new(1024, 768));

        let mut backend = RecordingBackend::new();
        rc.render_frame(&mut backend);
        assert_eq!(backend.draws().next().unwrap().rect, PixelRect::new(512, 384, 512, 384));
    }

    #[test]
    fn zero_size_target_still_renders_without_panicking() {
        let mut rc = coordinator();
        let id = rc.register(wireframe()).unwrap();
        rc.assign(0, 0, id).unwrap();
        rc.resize(TargetSize::new(0, 0));

        let mut backend = RecordingBackend::new();
        let stats = rc.render_frame(&mut backend);
        assert_eq!(stats.draws, 1);
        assert!(backend.draws().all(|d| d.rect.is_empty()));
        assert!(!backend.events().iter().any(|e| matches!(e, Recorded::Separators(_))));
    }

    #[test]
    fn fit_cameras_frames_assigned_geometry() {
        let mut rc = coordinator();
        let mut far = Drawable::points("far").unwrap();
        far.update_vertex_buffer(&[[10.0, 0.0, 0.0], [12.0, 2.0, 0.0]]).unwrap();
        let far = rc.register(far).unwrap();
        rc.assign(0, 1, far).unwrap();

        let untouched = *rc.viewport(0, 0).unwrap().camera();
        assert_eq!(rc.fit_cameras(), 1);

        assert_eq!(*rc.viewport(0, 0).unwrap().camera(), untouched);
        let cam = rc.viewport(0, 1).unwrap().camera();
        assert_eq!(cam.target, glam::Vec3::new(11.0, 1.0, 0.0));
    }

    #[test]
    fn snapshot_keeps_contents_from_capture_time() {
        let mut rc = coordinator();
        let id = rc.register(wireframe()).unwrap();
        rc.assign(0, 0, id).unwrap();

        let snapshot = rc.snapshot();
        rc.drawable_mut(id)
            .unwrap()
            .update_buffers(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], &[0, 1])
            .unwrap();

        let mut backend = RecordingBackend::new();
        snapshot.render(&mut backend);
        let draw = backend.draws().next().unwrap();
        assert_eq!(draw.vertex_count, 8);
        assert_eq!(draw.primitives, 12);
    }

    #[test]
    fn coordinator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderCoordinator>();
        assert_send_sync::<FrameSnapshot>();
    }

    #[test]
    fn concurrent_updates_never_produce_torn_frames() {
        let mut rc = coordinator();
        let id = rc.register(Drawable::lines("strip").unwrap()).unwrap();
        rc.assign(0, 0, id).unwrap();
        let shared = Mutex::new(rc);

        std::thread::scope(|s| {
            s.spawn(|| {
                for n in 2..200u32 {
                    let verts: Vec<[f32; 3]> = (0..n).map(|i| [i as f32, 0.0, 0.0]).collect();
                    let indices: Vec<u32> = (0..n - 1).flat_map(|i| [i, i + 1]).collect();
                    let mut rc = shared.lock().unwrap();
                    rc.drawable_mut(id)
                        .unwrap()
                        .update_buffers(&verts, &indices)
                        .unwrap();
                }
            });

            s.spawn(|| {
                let mut backend = RecordingBackend::new();
                for _ in 0..200 {
                    let snapshot = shared.lock().unwrap().snapshot();
                    snapshot.render(&mut backend);
                }
                for draw in backend.draws() {
                    if let Some(max) = draw.max_index {
                        assert!((max as usize) < draw.vertex_count);
                    }
                    assert_eq!(draw.primitives * 2, draw.index_count);
                }
                assert_eq!(backend.frames(), 200);
            });
        });
    }
}
