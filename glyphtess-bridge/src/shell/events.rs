//! Winit event handling.
//!
//! Translates WindowEvent into state machine events and frame requests.

use glyphtess_core::state::Transition;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;

use super::app::GlyphApp;
use crate::keyboard::map_physical;

pub fn handle_window_event(app: &mut GlyphApp, event_loop: &ActiveEventLoop, event: WindowEvent) {
    match event {
        // ── Window lifecycle ──────────────────────────────────────
        WindowEvent::CloseRequested => {
            tracing::info!("Window close requested");
            event_loop.exit();
        }

        // ── Resize ───────────────────────────────────────────────
        WindowEvent::Resized(new_size) => {
            if let Some(gpu) = &mut app.gpu {
                gpu.resize(new_size);
            }
            app.request_redraw();
        }

        // ── Keyboard ─────────────────────────────────────────────
        WindowEvent::KeyboardInput { event, .. } => {
            if event.state != ElementState::Pressed || event.repeat {
                return;
            }
            let Some(input) = map_physical(event.physical_key) else {
                return;
            };

            // Rejected values are logged by the state machine.
            match app.machine.apply(input) {
                Ok(Transition::Quit) => {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
                Ok(Transition::Changed) => app.request_redraw(),
                Ok(Transition::Unchanged) | Err(_) => {}
            }
        }

        // ── Frame ────────────────────────────────────────────────
        WindowEvent::RedrawRequested => app.redraw(),

        _ => {}
    }
}
