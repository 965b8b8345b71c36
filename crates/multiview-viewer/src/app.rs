use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use multiview_engine::core::{App as EngineApp, AppControl, FrameCtx};
use multiview_engine::device::GpuInit;
use multiview_engine::window::{Runtime, RuntimeConfig};
use multiview_engine::{
    Color, Drawable, DrawableId, DrawableRenderer, RenderCoordinator, Result, TargetSize,
};

// ── MultiViewer ───────────────────────────────────────────────────────────

/// A window split into a grid of independent views.
///
/// Build it, add drawables and assign them to cells, then [`run`](Self::run):
///
/// ```rust,ignore
/// let mut viewer = MultiViewer::new(2, 2)?.title("Drawables");
/// let cube = viewer.add_drawable(cube)?;
/// viewer.assign(0, 1, cube)?;
/// viewer.run()?;
/// ```
pub struct MultiViewer {
    title: String,
    coordinator: RenderCoordinator,
    clear_color: Color,
    separator_color: Option<Color>,
    gpu_init: GpuInit,
    continuous: bool,
}

impl MultiViewer {
    pub const DEFAULT_SIZE: TargetSize = TargetSize::new(800, 600);

    /// A `rows` x `cols` viewer with an 800x600 window. Fails with
    /// `InvalidGridSize` if either is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            title: "multiview".to_string(),
            coordinator: RenderCoordinator::new(rows, cols, Self::DEFAULT_SIZE)?,
            clear_color: Color::WHITE,
            separator_color: Some(Color::from_rgb_u8(160, 160, 160)),
            gpu_init: GpuInit::default(),
            continuous: false,
        })
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in physical pixels.
    ///
    /// Set this before uploading screen-space drawables, which are normalized
    /// against [`width`](Self::width) and [`height`](Self::height).
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.coordinator.resize(TargetSize::new(width, height));
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Color of the lines between cells; `None` hides them.
    pub fn separators(mut self, color: Option<Color>) -> Self {
        self.separator_color = color;
        self
    }

    pub fn gpu(mut self, init: GpuInit) -> Self {
        self.gpu_init = init;
        self
    }

    /// Redraw every event-loop iteration instead of only after window events.
    pub fn continuous(mut self, on: bool) -> Self {
        self.continuous = on;
        self
    }

    /// Current render target width in pixels.
    pub fn width(&self) -> u32 {
        self.coordinator.target_size().width
    }

    /// Current render target height in pixels.
    pub fn height(&self) -> u32 {
        self.coordinator.target_size().height
    }

    pub fn add_drawable(&mut self, drawable: Drawable) -> Result<DrawableId> {
        self.coordinator.register(drawable)
    }

    pub fn assign(&mut self, row: usize, col: usize, id: DrawableId) -> Result<()> {
        self.coordinator.assign(row, col, id)
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut RenderCoordinator {
        &mut self.coordinator
    }

    fn runtime_config(&self) -> RuntimeConfig {
        let size = self.coordinator.target_size();
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: PhysicalSize::new(size.width, size.height),
            continuous: self.continuous,
        }
    }

    /// Fits every camera to its view's content, opens the window and blocks
    /// until it is closed.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.coordinator.fit_cameras();
        let config = self.runtime_config();

        log::info!(
            "starting '{}': {}x{} views, {} drawables",
            self.title,
            self.coordinator.grid().rows(),
            self.coordinator.grid().cols(),
            self.coordinator.len()
        );

        let gpu_init = self.gpu_init.clone();
        Runtime::run(config, gpu_init, ViewerApp::new(self))
    }
}

// ── ViewerApp ─────────────────────────────────────────────────────────────

/// Engine-facing side of [`MultiViewer`]; user code never sees it.
struct ViewerApp {
    coordinator: RenderCoordinator,
    renderer: DrawableRenderer,
    clear_color: Color,
}

impl ViewerApp {
    fn new(viewer: MultiViewer) -> Self {
        let mut renderer = DrawableRenderer::new();
        renderer.set_separator_color(viewer.separator_color);
        Self {
            coordinator: viewer.coordinator,
            renderer,
            clear_color: viewer.clear_color,
        }
    }
}

impl EngineApp for ViewerApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, size: TargetSize) {
        self.coordinator.resize(size);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.coordinator.render_frame(&mut self.renderer);

        let renderer = &mut self.renderer;
        ctx.render(self.clear_color, |rctx, target| renderer.encode(rctx, target))
    }
}

#[cfg(test)]
mod tests {
    use multiview_engine::{Error, RecordingBackend};

    use super::*;

    #[test]
    fn builder_sets_target_size() {
        let viewer = MultiViewer::new(2, 2).unwrap().title("t").size(1024, 768);
        assert_eq!((viewer.width(), viewer.height()), (1024, 768));
        assert_eq!(
            viewer.coordinator().viewport(1, 1).unwrap().rect(),
            multiview_engine::PixelRect::new(512, 384, 512, 384)
        );
    }

    #[test]
    fn runtime_config_follows_builder() {
        let viewer = MultiViewer::new(1, 1)
            .unwrap()
            .title("views")
            .size(640, 480)
            .continuous(true);
        let config = viewer.runtime_config();
        assert_eq!(config.title, "views");
        assert_eq!(config.initial_size, PhysicalSize::new(640, 480));
        assert!(config.continuous);

        assert!(!MultiViewer::new(1, 1).unwrap().runtime_config().continuous);
    }

    #[test]
    fn zero_grid_is_rejected() {
        assert!(matches!(MultiViewer::new(0, 1), Err(Error::InvalidGridSize { .. })));
    }

    #[test]
    fn app_resize_reaches_coordinator() {
        let mut viewer = MultiViewer::new(1, 2).unwrap();
        let mut d = Drawable::points("p").unwrap();
        d.update_vertex_buffer(&[[0.0, 0.0, 0.0]]).unwrap();
        let id = viewer.add_drawable(d).unwrap();
        viewer.assign(0, 1, id).unwrap();

        let mut app = ViewerApp::new(viewer);
        app.on_resize(TargetSize::new(300, 100));

        let mut backend = RecordingBackend::new();
        app.coordinator.render_frame(&mut backend);
        let draw = backend.draws().next().unwrap();
        assert_eq!(draw.rect, multiview_engine::PixelRect::new(150, 0, 150, 100));
    }
}
