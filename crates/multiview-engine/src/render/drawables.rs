use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::coords::{PixelRect, TargetSize};
use crate::frame::{DrawCall, FrameStats, RenderBackend, ViewportBinding};
use crate::geometry::{GeometryBuffer, Topology};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawableId;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu backend for drawables.
///
/// Frame recording (`RenderBackend`) only collects draws; [`encode`](Self::encode)
/// uploads geometry and issues one render pass with a viewport and scissor per
/// grid cell. Vertex/index buffers are cached per drawable and rebuilt only when
/// the drawable's buffer revision changes.
///
/// Points and lines are rasterized at 1 physical pixel.
#[derive(Default)]
pub struct DrawableRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: Option<Pipelines>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,

    depth_size: TargetSize,
    depth_view: Option<wgpu::TextureView>,

    geometry: HashMap<DrawableId, GpuGeometry>,

    separator_color: Option<Color>,
    separator_lines: Vec<[[f32; 2]; 2]>,
    separator_vbo: Option<wgpu::Buffer>,

    target: TargetSize,
    views: Vec<PendingView>,
    draws: Vec<PendingDraw>,
    pending_separators: Vec<[[f32; 2]; 2]>,
}

struct Pipelines {
    points: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    overlay: wgpu::RenderPipeline,
}

impl Pipelines {
    fn for_topology(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Points => &self.points,
            Topology::Lines => &self.lines,
            Topology::Triangles => &self.triangles,
            Topology::Lines2D => &self.overlay,
        }
    }
}

struct GpuGeometry {
    revision: u64,
    vbo: wgpu::Buffer,
    ibo: Option<wgpu::Buffer>,
}

struct PendingView {
    rect: PixelRect,
    first_draw: usize,
}

struct PendingDraw {
    id: DrawableId,
    topology: Topology,
    buffer: Arc<GeometryBuffer>,
    uniform: DrawUniform,
}

impl DrawableRenderer {
    pub fn new() -> Self {
        Self {
            separator_color: Some(Color::from_rgb_u8(160, 160, 160)),
            ..Self::default()
        }
    }

    /// Color of the cell division lines; `None` disables them.
    pub fn set_separator_color(&mut self, color: Option<Color>) {
        self.separator_color = color;
    }

    /// Encodes the recorded frame into `target`. The color target is loaded,
    /// not cleared.
    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let size = ctx.target;
        if size.is_empty() || (self.draws.is_empty() && self.pending_separators.is_empty()) {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_depth(ctx, size);
        self.upload_geometry(ctx);
        self.ensure_separators(ctx);

        let separator_slot = self.separator_slot();
        let slots = self.draws.len() + usize::from(separator_slot.is_some());
        self.ensure_uniform_capacity(ctx, slots);
        self.write_uniforms(ctx);

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(depth_view) = self.depth_view.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("multiview drawable pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (v, view) in self.views.iter().enumerate() {
            let Some(rect) = clamp_to_target(view.rect, size) else { continue };
            let end = self
                .views
                .get(v + 1)
                .map_or(self.draws.len(), |next| next.first_draw);
            if view.first_draw == end {
                continue;
            }

            rpass.set_viewport(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
                0.0,
                1.0,
            );
            rpass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);

            for (slot, draw) in self.draws.iter().enumerate().take(end).skip(view.first_draw) {
                let Some(geometry) = self.geometry.get(&draw.id) else { continue };
                let offset = slot as u64 * self.uniform_stride;

                rpass.set_pipeline(pipelines.for_topology(draw.topology));
                rpass.set_bind_group(0, bind_group, &[offset as u32]);
                rpass.set_vertex_buffer(0, geometry.vbo.slice(..));

                match geometry.ibo.as_ref() {
                    Some(ibo) => {
                        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(0..draw.buffer.elements().len() as u32, 0, 0..1);
                    }
                    None => {
                        let count = draw.buffer.primitive_count(draw.topology) * draw.topology.arity();
                        rpass.draw(0..count as u32, 0..1);
                    }
                }
            }
        }

        if let (Some(slot), Some(vbo)) = (separator_slot, self.separator_vbo.as_ref()) {
            rpass.set_viewport(0.0, 0.0, size.width as f32, size.height as f32, 0.0, 1.0);
            rpass.set_scissor_rect(0, 0, size.width, size.height);
            rpass.set_pipeline(&pipelines.overlay);
            rpass.set_bind_group(0, bind_group, &[(slot as u64 * self.uniform_stride) as u32]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..self.separator_lines.len() as u32 * 2, 0..1);
        }
    }

    fn separator_slot(&self) -> Option<usize> {
        let drawn = self.separator_color.is_some()
            && !self.pending_separators.is_empty()
            && self.separator_vbo.is_some();
        drawn.then_some(self.draws.len())
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipelines.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("multiview drawable shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/drawable.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("multiview drawable bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(DrawUniform::SIZE),
                        },
                        count: None,
                    }],
                });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("multiview drawable pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let build = |label: &str, topology: wgpu::PrimitiveTopology, depth_tested: bool| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[position_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_tested,
                    depth_compare: if depth_tested {
                        wgpu::CompareFunction::LessEqual
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let pipelines = Pipelines {
            points: build("multiview points pipeline", wgpu::PrimitiveTopology::PointList, true),
            lines: build("multiview lines pipeline", wgpu::PrimitiveTopology::LineList, true),
            triangles: build(
                "multiview triangles pipeline",
                wgpu::PrimitiveTopology::TriangleList,
                true,
            ),
            overlay: build("multiview overlay pipeline", wgpu::PrimitiveTopology::LineList, false),
        };

        log::debug!("drawable pipelines built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipelines = Some(pipelines);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.uniform_buffer = None;
        self.uniform_capacity = 0;
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>, size: TargetSize) {
        if self.depth_size == size && self.depth_view.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("multiview depth"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.depth_size = size;
    }

    fn upload_geometry(&mut self, ctx: &RenderCtx<'_>) {
        let live: HashSet<DrawableId> = self.draws.iter().map(|d| d.id).collect();
        self.geometry.retain(|id, _| live.contains(id));

        for draw in &self.draws {
            let revision = draw.buffer.revision();
            if self
                .geometry
                .get(&draw.id)
                .is_some_and(|g| g.revision == revision)
            {
                continue;
            }

            let positions = draw.buffer.positions_xyz();
            let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("multiview drawable vbo"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let elements = draw.buffer.elements();
            let ibo = (!elements.is_empty()).then(|| {
                ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("multiview drawable ibo"),
                    contents: bytemuck::cast_slice(elements),
                    usage: wgpu::BufferUsages::INDEX,
                })
            });

            log::trace!(
                "upload {} rev {revision}: {} vertices, {} indices",
                draw.id,
                positions.len(),
                elements.len()
            );
            self.geometry.insert(draw.id, GpuGeometry { revision, vbo, ibo });
        }
    }

    fn ensure_separators(&mut self, ctx: &RenderCtx<'_>) {
        if self.pending_separators.is_empty() {
            return;
        }
        if self.separator_vbo.is_some() && self.separator_lines == self.pending_separators {
            return;
        }

        let vertices: Vec<[f32; 3]> = self
            .pending_separators
            .iter()
            .flat_map(|[a, b]| [[a[0], a[1], 0.0], [b[0], b[1], 0.0]])
            .collect();

        self.separator_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("multiview separator vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.separator_lines = self.pending_separators.clone();
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, slots: usize) {
        if slots <= self.uniform_capacity && self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let alignment = u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment);
        self.uniform_stride = DrawUniform::SIZE.div_ceil(alignment) * alignment;

        let capacity = slots.next_power_of_two().max(16);
        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("multiview drawable ubo"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("multiview drawable bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(DrawUniform::SIZE),
                }),
            }],
        });

        self.uniform_buffer = Some(uniform_buffer);
        self.bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.uniform_buffer.as_ref() else { return };
        let stride = self.uniform_stride as usize;

        let separator = self
            .separator_slot()
            .zip(self.separator_color)
            .map(|(_, color)| DrawUniform::new(Mat4::IDENTITY, color, false));

        let uniforms = self.draws.iter().map(|d| d.uniform).chain(separator);
        let mut bytes = Vec::with_capacity((self.draws.len() + 1) * stride);
        for u in uniforms {
            let start = bytes.len();
            bytes.extend_from_slice(bytemuck::bytes_of(&u));
            bytes.resize(start + stride, 0);
        }
        ctx.queue.write_buffer(ubo, 0, &bytes);
    }
}

impl RenderBackend for DrawableRenderer {
    fn begin_frame(&mut self, target: TargetSize) {
        self.target = target;
        self.views.clear();
        self.draws.clear();
        self.pending_separators.clear();
    }

    fn bind_viewport(&mut self, binding: &ViewportBinding<'_>) {
        self.views.push(PendingView {
            rect: binding.rect,
            first_draw: self.draws.len(),
        });
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.draws.push(PendingDraw {
            id: call.id,
            topology: call.topology,
            buffer: Arc::clone(call.buffer),
            uniform: DrawUniform::new(
                call.transform,
                call.style.color,
                call.topology == Topology::Triangles,
            ),
        });
    }

    fn draw_separators(&mut self, lines: &[[[f32; 2]; 2]]) {
        self.pending_separators.extend_from_slice(lines);
    }

    fn end_frame(&mut self, stats: &FrameStats) {
        log::trace!(
            "drawable renderer recorded {} draws over {} viewports for {}x{}",
            stats.draws,
            stats.viewports,
            self.target.width,
            self.target.height
        );
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    transform: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl DrawUniform {
    const SIZE: u64 = std::mem::size_of::<DrawUniform>() as u64;

    fn new(transform: Mat4, color: Color, shaded: bool) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color: color.to_array(),
            params: [if shaded { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// Intersects a cell rect with the target; `None` when nothing is left to draw.
fn clamp_to_target(rect: PixelRect, target: TargetSize) -> Option<PixelRect> {
    if rect.is_empty() {
        return None;
    }
    rect.intersect(target.rect()).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(DrawUniform::SIZE, 96);
        let u = DrawUniform::new(Mat4::IDENTITY, Color::WHITE, true);
        assert_eq!(u.transform[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(u.params[0], 1.0);
    }

    #[test]
    fn empty_cells_are_not_drawn() {
        let target = TargetSize::new(800, 600);
        assert!(clamp_to_target(PixelRect::new(0, 0, 0, 300), target).is_none());
        assert!(clamp_to_target(PixelRect::new(900, 0, 10, 10), target).is_none());
        assert_eq!(
            clamp_to_target(PixelRect::new(400, 300, 400, 300), target),
            Some(PixelRect::new(400, 300, 400, 300))
        );
    }

    #[test]
    fn recording_groups_draws_by_viewport() {
        use crate::frame::RenderCoordinator;
        use crate::scene::Drawable;

        let mut rc = RenderCoordinator::new(1, 2, TargetSize::new(200, 100)).unwrap();
        let mut d = Drawable::points("p").unwrap();
        d.update_vertex_buffer(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        let id = rc.register(d).unwrap();
        rc.assign(0, 1, id).unwrap();
        rc.assign(0, 1, id).unwrap();

        let mut renderer = DrawableRenderer::new();
        rc.render_frame(&mut renderer);

        assert_eq!(renderer.views.len(), 2);
        assert_eq!(renderer.views[0].first_draw, 0);
        assert_eq!(renderer.views[1].first_draw, 0);
        assert_eq!(renderer.draws.len(), 2);
        assert_eq!(renderer.pending_separators.len(), 1);
        assert_eq!(renderer.draws[0].uniform.params[0], 0.0);
    }
}
