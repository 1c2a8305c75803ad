//! Curve and overlay pipelines.
//!
//! Replays a `FramePlan`: every draw call gets its own slot in one uniform
//! buffer and binds it through a dynamic offset. Patches live in vertex
//! buffers of 32-byte records; the curve pipeline steps them per instance,
//! the overlay pipelines read the same bytes as a flat point array.

use std::mem::size_of;

use glyphtess_core::assembler::Patch;
use glyphtess_core::plan::{Geometry, Primitive, Program};
use glyphtess_core::{DrawCall, DrawUniforms, FramePlan, PatchSet};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, BufferUsages, Device, Queue, RenderPass, RenderPipeline, TextureFormat};

use super::shaders::ShaderSources;

pub const PATCH_STRIDE: u64 = size_of::<Patch>() as u64;
const POINT_STRIDE: u64 = size_of::<[f32; 2]>() as u64;
const UNIFORM_SIZE: u64 = size_of::<DrawUniforms>() as u64;

/// Vertices per point marker (two triangles).
const MARKER_VERTICES: u32 = 6;

// ════════════════════════════════════════════════════════════════════
// Uniforms
// ════════════════════════════════════════════════════════════════════

/// Frame-wide values for the overlay program.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _pad: f32,
}

/// Round `size` up to a multiple of `alignment`.
pub fn align_to(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Pack `uniforms` at `stride`-byte intervals, zero-filling the gaps.
pub fn pack_uniforms(uniforms: &[DrawUniforms], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; uniforms.len() * stride];
    for (chunk, u) in bytes.chunks_exact_mut(stride).zip(uniforms) {
        chunk[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(u));
    }
    bytes
}

// ════════════════════════════════════════════════════════════════════
// Vertex Layouts
// ════════════════════════════════════════════════════════════════════

const PATCH_ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x2,
    2 => Float32x2,
    3 => Float32x2
];

const POINT_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

fn patch_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: PATCH_STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &PATCH_ATTRIBS,
    }
}

fn point_layout(step_mode: wgpu::VertexStepMode) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: POINT_STRIDE,
        step_mode,
        attributes: &POINT_ATTRIBS,
    }
}

// ════════════════════════════════════════════════════════════════════
// Patch Buffers
// ════════════════════════════════════════════════════════════════════

/// A patch set uploaded to the GPU.
pub struct PatchBuffer {
    buffer: Buffer,
    patches: u32,
}

impl PatchBuffer {
    /// `None` for an empty set; wgpu cannot bind an empty slice.
    pub fn upload(device: &Device, label: &str, set: &PatchSet) -> Option<Self> {
        if set.is_empty() {
            return None;
        }
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(set.patches()),
            usage: BufferUsages::VERTEX,
        });
        Some(Self {
            buffer,
            patches: set.len() as u32,
        })
    }

    pub fn patches(&self) -> u32 {
        self.patches
    }
}

// ════════════════════════════════════════════════════════════════════
// Pipelines
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Curve,
    Lines,
    Points,
}

pub struct PatchPipelines {
    curve: RenderPipeline,
    lines: RenderPipeline,
    points: RenderPipeline,

    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    uniform_stride: u64,
    uniform_slots: usize,
    globals_buffer: Buffer,

    demo: Option<PatchBuffer>,
    glyphs: Option<PatchBuffer>,
}

impl PatchPipelines {
    const INITIAL_SLOTS: usize = 256;

    pub fn new(
        device: &Device,
        format: TextureFormat,
        shaders: &ShaderSources,
        demo: &PatchSet,
    ) -> Self {
        let patch_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("patch.wgsl"),
            source: wgpu::ShaderSource::Wgsl(shaders.patch.clone()),
        });
        let plain_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plain.wgsl"),
            source: wgpu::ShaderSource::Wgsl(shaders.plain.clone()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("patch-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let uniform_stride = align_to(
            UNIFORM_SIZE,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let uniform_buffer = create_uniform_buffer(device, uniform_stride, Self::INITIAL_SLOTS);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("patch-globals"),
            size: size_of::<Globals>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group =
            create_bind_group(device, &bind_group_layout, &uniform_buffer, &globals_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("patch-pl"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let curve = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineSpec {
                label: "curve-pipeline",
                module: &patch_shader,
                vertex_entry: "vs_main",
                buffer: patch_layout(),
                topology: wgpu::PrimitiveTopology::LineStrip,
            },
        );
        let lines = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineSpec {
                label: "polygon-pipeline",
                module: &plain_shader,
                vertex_entry: "vs_line",
                buffer: point_layout(wgpu::VertexStepMode::Vertex),
                topology: wgpu::PrimitiveTopology::LineStrip,
            },
        );
        let points = create_pipeline(
            device,
            &pipeline_layout,
            format,
            PipelineSpec {
                label: "marker-pipeline",
                module: &plain_shader,
                vertex_entry: "vs_point",
                buffer: point_layout(wgpu::VertexStepMode::Instance),
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        Self {
            curve,
            lines,
            points,
            bind_group_layout,
            bind_group,
            uniform_buffer,
            uniform_stride,
            uniform_slots: Self::INITIAL_SLOTS,
            globals_buffer,
            demo: PatchBuffer::upload(device, "demo-patches", demo),
            glyphs: None,
        }
    }

    /// Swap in a new glyph buffer, releasing the old one.
    pub fn replace_glyphs(&mut self, device: &Device, set: &PatchSet) {
        let fresh = PatchBuffer::upload(device, "glyph-patches", set);
        if let Some(old) = std::mem::replace(&mut self.glyphs, fresh) {
            old.buffer.destroy();
        }
        tracing::debug!(patches = set.len(), "glyph buffer replaced");
    }

    /// Write this frame's uniforms, growing the uniform buffer if needed.
    pub fn prepare(&mut self, device: &Device, queue: &Queue, plan: &FramePlan, globals: Globals) {
        if plan.len() > self.uniform_slots {
            let slots = plan.len().next_power_of_two();
            self.uniform_buffer.destroy();
            self.uniform_buffer = create_uniform_buffer(device, self.uniform_stride, slots);
            self.bind_group = create_bind_group(
                device,
                &self.bind_group_layout,
                &self.uniform_buffer,
                &self.globals_buffer,
            );
            self.uniform_slots = slots;
            tracing::debug!(slots, "uniform buffer grown");
        }

        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if !plan.is_empty() {
            let bytes = pack_uniforms(&plan.uniforms(), self.uniform_stride);
            queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }
    }

    /// Record every draw of `plan`. `prepare` must have run for the same plan.
    pub fn draw(&self, pass: &mut RenderPass<'_>, plan: &FramePlan) {
        let mut bound: Option<(Bound, Geometry)> = None;

        for (i, call) in plan.iter().enumerate() {
            let buffer = match call.geometry {
                Geometry::Demo => self.demo.as_ref(),
                Geometry::Glyphs => self.glyphs.as_ref(),
            };
            let Some(buffer) = buffer else {
                continue;
            };
            if !call_fits(call, buffer.patches()) {
                tracing::debug!(
                    geometry = ?call.geometry,
                    patches = buffer.patches(),
                    "draw outside patch buffer skipped"
                );
                continue;
            }

            let kind = match (call.program, call.primitive) {
                (Program::Tessellated, _) => Bound::Curve,
                (Program::Plain, Primitive::Points) => Bound::Points,
                (Program::Plain, _) => Bound::Lines,
            };
            if bound != Some((kind, call.geometry)) {
                pass.set_pipeline(match kind {
                    Bound::Curve => &self.curve,
                    Bound::Lines => &self.lines,
                    Bound::Points => &self.points,
                });
                pass.set_vertex_buffer(0, buffer.buffer.slice(..));
                bound = Some((kind, call.geometry));
            }

            let offset = (i as u64 * self.uniform_stride) as u32;
            pass.set_bind_group(0, &self.bind_group, &[offset]);

            match kind {
                Bound::Curve => pass.draw(call.vertices.clone(), call.instances.clone()),
                Bound::Lines => pass.draw(call.vertices.clone(), 0..1),
                // Each selected point becomes one marker instance.
                Bound::Points => pass.draw(0..MARKER_VERTICES, call.vertices.clone()),
            }
        }
    }
}

/// Whether `call` only reads patches a buffer of `patches` patches holds.
/// Curve draws index patches by instance; overlay draws index the four
/// slots of each patch as flat points.
pub fn call_fits(call: &DrawCall, patches: u32) -> bool {
    match call.program {
        Program::Tessellated => call.instances.end <= patches,
        Program::Plain => call.vertices.end <= patches.saturating_mul(4),
    }
}

// ════════════════════════════════════════════════════════════════════
// Construction helpers
// ════════════════════════════════════════════════════════════════════

struct PipelineSpec<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    vertex_entry: &'a str,
    buffer: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
}

fn create_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    format: TextureFormat,
    spec: PipelineSpec<'_>,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: spec.module,
            entry_point: Some(spec.vertex_entry),
            buffers: &[spec.buffer],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        cache: None,
        multiview_mask: None,
    })
}

fn create_uniform_buffer(device: &Device, stride: u64, slots: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw-uniforms"),
        size: stride * slots as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    uniforms: &Buffer,
    globals: &Buffer,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("patch-bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: uniforms,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: globals.as_entire_binding(),
            },
        ],
    })
}
