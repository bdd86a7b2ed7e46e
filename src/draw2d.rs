use std::collections::HashMap;
use std::ops::Range;

use glam::Vec2;
use tracing::{debug, warn};

use crate::capture::{FrameCapture, FrameId};
use crate::gpu::GpuContext;
use crate::shape::{Color, DrawList, Rect, Shape};

/// Vertex for 2D shape and captured-frame rendering.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    fn colored(position: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            uv: [0.0, 0.0],
            color,
        }
    }
}

/// Uniforms for 2D rendering.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Draw2dUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

/// Vertex buffer size before the first frame that needs more.
const INITIAL_VERTICES: usize = 1 << 17;
/// Hard limit on the vertex buffer. Anything past it is dropped.
const MAX_VERTICES: usize = 1 << 22;

/// Buffer capacity, in vertices, that holds `needed` vertices.
///
/// Grows to the next power of two and never shrinks, capped at
/// [`MAX_VERTICES`].
fn vertex_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().min(MAX_VERTICES).max(current)
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw2d Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex2d>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Which pipeline a run of vertices is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    Colored,
    Image(FrameId),
}

/// A contiguous run of vertices sharing one pipeline and bind group.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub kind: BatchKind,
    pub vertices: Range<u32>,
}

/// Triangles for one frame's [`DrawList`], in draw order.
#[derive(Debug, Default)]
pub struct Tessellation {
    pub vertices: Vec<Vertex2d>,
    pub batches: Vec<Batch>,
}

impl Tessellation {
    /// Turn `list` into triangle-list vertices for a screen of the given size.
    ///
    /// Consecutive shapes that use the same pipeline end up in one batch, so a
    /// list of plain colored shapes is a single draw call.
    pub fn build(list: &DrawList, screen: Vec2) -> Self {
        let mut out = Self::default();
        for shape in list.shapes() {
            out.shape(shape, screen);
        }
        out
    }

    fn shape(&mut self, shape: &Shape, screen: Vec2) {
        match *shape {
            Shape::Rect { rect, color } => self.rect(rect, color),
            Shape::Quad { corners, color } => {
                let c = color.to_array();
                let [a, b, d, e] = corners.map(|p| Vertex2d::colored(p, c));
                self.push(BatchKind::Colored, &[a, b, d, a, d, e]);
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => self.circle(center, radius, color),
            Shape::Line {
                from,
                to,
                thickness,
                color,
            } => self.line(from, to, thickness, color),
            Shape::Frame {
                rect,
                thickness,
                color,
            } => {
                let t = thickness;
                let h = t * 0.5;
                let Rect {
                    x,
                    y,
                    width: w,
                    height,
                } = rect;
                self.rect(Rect::new(x - h, y - h, w + t, t), color);
                self.rect(Rect::new(x - h, y + height - h, w + t, t), color);
                self.rect(Rect::new(x - h, y + h, t, height - t), color);
                self.rect(Rect::new(x + w - h, y + h, t, height - t), color);
            }
            Shape::Image { frame, src, dst } => {
                if dst.width <= 0.0 || dst.height <= 0.0 {
                    return;
                }
                let uv_min = src.position() / screen;
                let uv_max = (src.position() + src.size()) / screen;
                let corner = |p: Vec2, uv: Vec2| Vertex2d {
                    position: p.to_array(),
                    uv: uv.to_array(),
                    color: Color::WHITE.to_array(),
                };
                let min = dst.position();
                let max = min + dst.size();
                let a = corner(min, uv_min);
                let b = corner(Vec2::new(max.x, min.y), Vec2::new(uv_max.x, uv_min.y));
                let c = corner(max, uv_max);
                let d = corner(Vec2::new(min.x, max.y), Vec2::new(uv_min.x, uv_max.y));
                self.push(BatchKind::Image(frame), &[a, b, c, a, c, d]);
            }
            Shape::Fill { color } => self.rect(Rect::new(0.0, 0.0, screen.x, screen.y), color),
        }
    }

    fn rect(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let c = color.to_array();
        let min = rect.position();
        let max = min + rect.size();
        let a = Vertex2d::colored(min, c);
        let b = Vertex2d::colored(Vec2::new(max.x, min.y), c);
        let d = Vertex2d::colored(max, c);
        let e = Vertex2d::colored(Vec2::new(min.x, max.y), c);
        self.push(BatchKind::Colored, &[a, b, e, b, d, e]);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let c = color.to_array();
        let segments = circle_segments(radius);
        let step = std::f32::consts::TAU / segments as f32;
        let rim = |i: u32| center + Vec2::from_angle(i as f32 * step) * radius;

        let mut fan = Vec::with_capacity(segments as usize * 3);
        for i in 0..segments {
            fan.push(Vertex2d::colored(center, c));
            fan.push(Vertex2d::colored(rim(i), c));
            fan.push(Vertex2d::colored(rim(i + 1), c));
        }
        self.push(BatchKind::Colored, &fan);
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let Some(dir) = (to - from).try_normalize() else {
            return;
        };
        let c = color.to_array();
        let n = dir.perp() * (thickness * 0.5);
        let a = Vertex2d::colored(from + n, c);
        let b = Vertex2d::colored(to + n, c);
        let d = Vertex2d::colored(to - n, c);
        let e = Vertex2d::colored(from - n, c);
        self.push(BatchKind::Colored, &[a, b, d, a, d, e]);
    }

    fn push(&mut self, kind: BatchKind, vertices: &[Vertex2d]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.kind == kind => last.vertices.end = end,
            _ => self.batches.push(Batch {
                kind,
                vertices: start..end,
            }),
        }
    }

    /// Drop everything past `max` vertices, shortening or removing batches.
    fn truncate(&mut self, max: usize) {
        if self.vertices.len() <= max {
            return;
        }
        self.vertices.truncate(max);
        let max = max as u32;
        self.batches.retain_mut(|batch| {
            batch.vertices.end = batch.vertices.end.min(max);
            batch.vertices.start < batch.vertices.end
        });
    }
}

/// Triangle count for a circle, growing with the radius.
fn circle_segments(radius: f32) -> u32 {
    ((radius * 0.75).ceil() as u32).clamp(12, 96)
}

/// Immediate-mode 2D renderer for [`DrawList`]s.
///
/// The list is tessellated once per frame, uploaded into a single vertex
/// buffer and drawn batch by batch, switching to the textured pipeline for
/// captured frames.
pub struct Draw2d {
    // Pipelines
    colored_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,

    // Shared resources
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,

    // Per-frame bind groups (cached)
    frame_bind_groups: HashMap<FrameId, wgpu::BindGroup>,

    // Current frame
    batches: Vec<Batch>,
}

impl Draw2d {
    /// Create the renderer for targets of the given format.
    pub fn new(gpu: &GpuContext, format: wgpu::TextureFormat) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Draw2d Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/draw2d.wgsl").into()),
        });

        // Uniform buffer
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw2d Uniforms"),
            size: std::mem::size_of::<Draw2dUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Uniform bind group layout (group 0)
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw2d Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Captured frame bind group layout (group 1)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw2d Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let colored_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Colored Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let textured_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Draw2d Textured Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
                push_constant_ranges: &[],
            });

        // Straight alpha over whatever is already in the target
        let blend_state = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = |label: &str, layout: &wgpu::PipelineLayout, fs: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex2d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend_state),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let colored_pipeline = pipeline(
            "Draw2d Colored Pipeline",
            &colored_pipeline_layout,
            "fs_colored",
        );
        let textured_pipeline = pipeline(
            "Draw2d Textured Pipeline",
            &textured_pipeline_layout,
            "fs_textured",
        );

        let vertex_buffer = create_vertex_buffer(device, INITIAL_VERTICES);

        Self {
            colored_pipeline,
            textured_pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTICES,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group_layout,
            frame_bind_groups: HashMap::new(),
            batches: Vec::new(),
        }
    }

    /// Keep one bind group per captured frame, dropping released ones.
    fn update_frame_bind_groups(&mut self, gpu: &GpuContext, capture: &FrameCapture) {
        self.frame_bind_groups
            .retain(|id, _| capture.texture(*id).is_some());

        for (id, texture) in capture.textures() {
            if self.frame_bind_groups.contains_key(&id) {
                continue;
            }
            let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Captured Frame Bind Group"),
                layout: &self.texture_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            });
            self.frame_bind_groups.insert(id, bind_group);
        }
    }

    /// Tessellate `list` and upload it for [`Draw2d::render`].
    pub fn prepare(&mut self, gpu: &GpuContext, list: &DrawList, capture: &FrameCapture) {
        self.update_frame_bind_groups(gpu, capture);

        let screen = gpu.screen_size();
        let mut tess = Tessellation::build(list, screen);

        let capacity = vertex_capacity(self.vertex_capacity, tess.vertices.len());
        if capacity != self.vertex_capacity {
            debug!(
                from = self.vertex_capacity,
                to = capacity,
                "growing draw2d vertex buffer"
            );
            self.vertex_buffer = create_vertex_buffer(&gpu.device, capacity);
            self.vertex_capacity = capacity;
        }
        if tess.vertices.len() > MAX_VERTICES {
            warn!(
                vertices = tess.vertices.len(),
                max = MAX_VERTICES,
                "draw list too large, dropping the overflow"
            );
            tess.truncate(MAX_VERTICES);
        }

        let uniforms = Draw2dUniforms {
            resolution: screen.to_array(),
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        if !tess.vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&tess.vertices));
        }
        self.batches = tess.batches;
    }

    /// Draw everything uploaded by the last [`Draw2d::prepare`].
    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        for batch in &self.batches {
            match batch.kind {
                BatchKind::Colored => {
                    render_pass.set_pipeline(&self.colored_pipeline);
                }
                BatchKind::Image(frame) => {
                    let Some(bind_group) = self.frame_bind_groups.get(&frame) else {
                        continue;
                    };
                    render_pass.set_pipeline(&self.textured_pipeline);
                    render_pass.set_bind_group(1, bind_group, &[]);
                }
            }
            render_pass.draw(batch.vertices.clone(), 0..1);
        }
    }
}
