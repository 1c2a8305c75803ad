//! Application state and winit event loop.
//!
//! The render state machine is the only place selector state lives. Input
//! events mutate its pending state; each redraw commits it, rebuilds the
//! glyph buffer when the font changed, plans the frame and replays it on
//! the GPU.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use glyphtess_core::{
    DemoScene, FontSlot, Glyph, GlyphError, PatchAssembler, PatchRenderer, PatchSet, RenderState,
    RenderStateMachine,
};
use glyphtess_fonts::{FontLibrary, FONT_SLOTS};

use super::events::handle_window_event;
use crate::config::AppConfig;
use crate::gfx::{GpuState, ShaderSources};

// ════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════

pub struct GlyphApp {
    // ── Window + GPU ──
    pub window: Option<Arc<Window>>,
    pub gpu: Option<GpuState>,

    // ── Configuration ──
    pub config: AppConfig,
    pub shaders: ShaderSources,

    // ── Rendering ──
    pub machine: RenderStateMachine,
    pub renderer: PatchRenderer,
    pub demo: DemoScene,
    /// The configured text, extracted once per font slot.
    pub strings: [Vec<Glyph>; FONT_SLOTS],
    pub glyphs: PatchSet,

    // ── Shutdown reason, if startup failed ──
    pub fatal: Option<GlyphError>,
}

impl GlyphApp {
    pub fn new(
        config: AppConfig,
        shaders: ShaderSources,
        strings: [Vec<Glyph>; FONT_SLOTS],
        initial: RenderState,
    ) -> Self {
        Self {
            window: None,
            gpu: None,
            config,
            shaders,
            machine: RenderStateMachine::new(initial),
            renderer: PatchRenderer::new(),
            demo: DemoScene::new(),
            strings,
            glyphs: PatchSet::new(),
            fatal: None,
        }
    }

    /// Request a window redraw.
    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    pub fn title(&self, state: RenderState) -> String {
        format!("{} | {}", self.config.window.title, state)
    }

    /// Stop the loop and remember why.
    pub fn fail(&mut self, event_loop: &ActiveEventLoop, error: GlyphError) {
        tracing::error!("{}", error);
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Re-assemble the glyph string for `slot` and upload it. A string over
    /// capacity, or one the device rejects, is reported and the previous
    /// patch set stays active.
    fn rebuild_glyphs(&mut self, slot: FontSlot) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let capacity = gpu.patch_capacity(self.config.max_patches);
        let glyphs = &self.strings[slot.index()];
        let set = match PatchAssembler::bounded(capacity).assemble(glyphs) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(font = slot.value(), "{}", e);
                return;
            }
        };

        if let Err(e) = gpu.upload_glyphs(&set) {
            tracing::warn!(font = slot.value(), "{}", e);
            return;
        }
        tracing::info!(
            font = slot.value(),
            patches = set.len(),
            "glyph string rebuilt"
        );
        self.glyphs = set;
    }

    /// One frame: commit state, rebuild glyphs if needed, plan, draw.
    pub fn redraw(&mut self) {
        if self.gpu.is_none() {
            return;
        }

        let frame = self.machine.begin_frame();
        if frame.rebuild_glyphs {
            self.rebuild_glyphs(frame.state.font);
        }

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let plan = self.renderer.plan_frame(
            frame.state,
            self.demo.patches(),
            &self.glyphs,
            gpu.viewport(),
        );

        match gpu.render_frame(self.config.clear_color, self.config.point_size, &plan) {
            Ok(true) => {}
            Ok(false) => self.request_redraw(),
            Err(e) => tracing::warn!("{}", e),
        }

        if let Some(window) = &self.window {
            window.set_title(&self.title(frame.state));
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// winit ApplicationHandler
// ════════════════════════════════════════════════════════════════════

impl ApplicationHandler for GlyphApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title(self.machine.current()))
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                let error = GlyphError::InitializationFailure(format!("cannot open window: {e}"));
                self.fail(event_loop, error);
                return;
            }
        };

        match GpuState::new(window.clone(), &self.shaders, self.demo.patches()) {
            Ok(gpu) => {
                tracing::info!(format = ?gpu.format, "GPU ready");
                self.gpu = Some(gpu);
                self.window = Some(window);
                self.request_redraw();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        handle_window_event(self, event_loop, event);
    }
}

// ════════════════════════════════════════════════════════════════════
// Entry point
// ════════════════════════════════════════════════════════════════════

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    // Tracing is initialized once in the binary entry point (src/main.rs).

    let initial = config.initial_state()?;
    let shaders = ShaderSources::load(config.shader_dir.as_deref())?;
    let fonts = FontLibrary::load(&config.fonts);
    if fonts.loaded() == 0 {
        tracing::warn!("no fonts loaded; the glyph scene will be empty");
    }
    let strings = fonts.extract_all(&config.text);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GlyphApp::new(config, shaders, strings, initial);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
