//! Key bindings.
//!
//!   1 / 2 / 3  → scene
//!   Q / W / E  → style
//!   A / S / D  → font
//!   Escape     → quit
//!
//! Bindings use physical key codes so they stay put across layouts.

use glyphtess_core::{InputEvent, Selector};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Map a pressed key to a state machine event. Unbound keys map to `None`.
pub fn map_key(code: KeyCode) -> Option<InputEvent> {
    let event = match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => InputEvent::Select(Selector::Scene, 1),
        KeyCode::Digit2 | KeyCode::Numpad2 => InputEvent::Select(Selector::Scene, 2),
        KeyCode::Digit3 | KeyCode::Numpad3 => InputEvent::Select(Selector::Scene, 3),

        KeyCode::KeyQ => InputEvent::Select(Selector::Style, 1),
        KeyCode::KeyW => InputEvent::Select(Selector::Style, 2),
        KeyCode::KeyE => InputEvent::Select(Selector::Style, 3),

        KeyCode::KeyA => InputEvent::Select(Selector::Font, 1),
        KeyCode::KeyS => InputEvent::Select(Selector::Font, 2),
        KeyCode::KeyD => InputEvent::Select(Selector::Font, 3),

        KeyCode::Escape => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

pub fn map_physical(key: PhysicalKey) -> Option<InputEvent> {
    match key {
        PhysicalKey::Code(code) => map_key(code),
        PhysicalKey::Unidentified(_) => None,
    }
}
