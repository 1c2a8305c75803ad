//! wgpu device/surface lifecycle and per-frame orchestration.
//!
//! GpuState owns the device, queue, surface, and config. It acquires the
//! swapchain texture each frame and replays the frame plan through the
//! patch pipelines.

use std::sync::Arc;

use glyphtess_core::{FramePlan, GlyphError, PatchSet};
use wgpu::{
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
    TextureViewDescriptor,
};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::patch::{Globals, PatchPipelines, PATCH_STRIDE};
use super::shaders::ShaderSources;
use super::with_validation_scope;

fn init_error(msg: impl std::fmt::Display) -> GlyphError {
    GlyphError::InitializationFailure(msg.to_string())
}

/// Owns all GPU state. Created once per window.
pub struct GpuState {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub format: TextureFormat,

    pub pipelines: PatchPipelines,
}

impl GpuState {
    /// Initialize wgpu for `window` and build both programs. Blocks until
    /// the adapter is ready. Any validation error raised while creating
    /// pipelines or buffers fails startup.
    pub fn new(
        window: Arc<Window>,
        shaders: &ShaderSources,
        demo: &PatchSet,
    ) -> Result<Self, GlyphError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| init_error(format!("cannot create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| init_error(format!("no suitable GPU adapter: {e}")))?;

        tracing::info!(
            "GPU adapter: {} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("glyphtess-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .map_err(|e| init_error(format!("cannot open device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| init_error("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let (pipelines, error) = with_validation_scope(&device, || {
            surface.configure(&device, &config);
            PatchPipelines::new(&device, format, shaders, demo)
        });
        if let Some(e) = error {
            return Err(init_error(format!("graphics setup failed: {e}")));
        }

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: PhysicalSize::new(width, height),
            format,
            pipelines,
        })
    }

    pub fn viewport(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// How many patches one glyph buffer can hold on this device.
    pub fn patch_capacity(&self, configured: usize) -> usize {
        let limit = self.device.limits().max_buffer_size / PATCH_STRIDE;
        configured.min(usize::try_from(limit).unwrap_or(usize::MAX))
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload a new glyph buffer. A validation error leaves the frame loop
    /// running and is reported as `GraphicsState`.
    pub fn upload_glyphs(&mut self, set: &PatchSet) -> Result<(), GlyphError> {
        let device = &self.device;
        let pipelines = &mut self.pipelines;
        let ((), error) = with_validation_scope(device, || pipelines.replace_glyphs(device, set));
        match error {
            Some(e) => Err(GlyphError::GraphicsState(e.to_string())),
            None => Ok(()),
        }
    }

    /// Render a frame. Returns Ok(true) if a frame was presented, Ok(false)
    /// if skipped. Validation errors raised by the frame come back as
    /// `GraphicsState` after the frame is presented.
    pub fn render_frame(
        &mut self,
        clear_color: [f32; 4],
        point_size: f32,
        plan: &FramePlan,
    ) -> Result<bool, GlyphError> {
        let output = match self.surface.get_current_texture() {
            Ok(tex) => tex,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(false);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(GlyphError::GraphicsState("GPU out of memory".to_string()));
            }
            Err(e) => {
                tracing::warn!("Surface error: {:?}", e);
                return Ok(false);
            }
        };

        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());

        let viewport = self.viewport();
        let globals = Globals {
            viewport: [viewport[0] as f32, viewport[1] as f32],
            point_size,
            _pad: 0.0,
        };

        let device = &self.device;
        let queue = &self.queue;
        let pipelines = &mut self.pipelines;
        let ((), error) = with_validation_scope(device, || {
            pipelines.prepare(device, queue, plan, globals);

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("main-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: clear_color[0] as f64,
                                g: clear_color[1] as f64,
                                b: clear_color[2] as f64,
                                a: clear_color[3] as f64,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });

                pipelines.draw(&mut pass, plan);
            }
            queue.submit(std::iter::once(encoder.finish()));
        });

        output.present();

        match error {
            Some(e) => Err(GlyphError::GraphicsState(e.to_string())),
            None => Ok(true),
        }
    }
}
