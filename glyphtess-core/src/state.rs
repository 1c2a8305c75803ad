//! Render mode selectors and the per-frame state machine.
//!
//! Three independent selectors, each a closed set of three values. Input
//! events land in a pending state; `begin_frame` commits it so a change
//! never takes effect halfway through a frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GlyphError, Result};

/// Which selector an input event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Scene,
    Style,
    Font,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Scene => write!(f, "scene"),
            Selector::Style => write!(f, "style"),
            Selector::Font => write!(f, "font"),
        }
    }
}

macro_rules! selector_enum {
    ($(#[$meta:meta])* $name:ident, $selector:expr, [$($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            #[default]
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn value(self) -> u8 {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = GlyphError;

            fn try_from(value: u8) -> Result<Self> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(GlyphError::InvalidSelector {
                        selector: $selector,
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> u8 {
                v.value()
            }
        }
    };
}

selector_enum!(
    /// What the frame shows.
    Scene,
    Selector::Scene,
    [
        /// The quadratic demo curves.
        Quadratic = 1,
        /// The cubic demo curves.
        Cubic = 2,
        /// A single highlighted demo patch plus the glyph string.
        Glyphs = 3,
    ]
);

selector_enum!(
    /// How curves are decorated.
    Style,
    Selector::Style,
    [
        Curve = 1,
        /// Curves plus control polygons and point markers.
        Annotated = 2,
        /// Accepted for parity with the key layout; renders like `Curve`.
        Reserved = 3,
    ]
);

selector_enum!(
    /// Which loaded font feeds the glyph scene.
    FontSlot,
    Selector::Font,
    [Primary = 1, Secondary = 2, Tertiary = 3]
);

impl Style {
    pub fn shows_overlay(self) -> bool {
        self == Style::Annotated
    }
}

impl Scene {
    pub fn shows_glyphs(self) -> bool {
        self == Scene::Glyphs
    }
}

impl FontSlot {
    /// Zero-based slot index.
    pub fn index(self) -> usize {
        self.value() as usize - 1
    }
}

/// The three selectors together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderState {
    pub scene: Scene,
    pub style: Style,
    pub font: FontSlot,
}

impl RenderState {
    /// Build a state from raw selector values, validating each.
    pub fn from_values(scene: u8, style: u8, font: u8) -> Result<Self> {
        Ok(Self {
            scene: Scene::try_from(scene)?,
            style: Style::try_from(style)?,
            font: FontSlot::try_from(font)?,
        })
    }

    /// Set one selector from a raw value. On error nothing changes.
    pub fn set(&mut self, selector: Selector, value: u8) -> Result<()> {
        match selector {
            Selector::Scene => self.scene = Scene::try_from(value)?,
            Selector::Style => self.style = Style::try_from(value)?,
            Selector::Font => self.font = FontSlot::try_from(value)?,
        }
        Ok(())
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scene {} | style {} | font {}",
            self.scene.value(),
            self.style.value(),
            self.font.value()
        )
    }
}

/// Discrete input the state machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Select(Selector, u8),
    Quit,
}

/// What `apply` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A selector changed; visible from the next frame.
    Changed,
    /// The selector already held that value.
    Unchanged,
    Quit,
}

/// Snapshot handed to the renderer at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameState {
    pub state: RenderState,
    /// The active font's glyph buffer must be rebuilt before drawing.
    pub rebuild_glyphs: bool,
}

/// Owns the render state. The input handler is the only writer.
#[derive(Debug, Clone)]
pub struct RenderStateMachine {
    current: RenderState,
    pending: RenderState,
    glyphs_dirty: bool,
    quit: bool,
}

impl Default for RenderStateMachine {
    fn default() -> Self {
        Self::new(RenderState::default())
    }
}

impl RenderStateMachine {
    /// The first frame always builds the glyph buffer.
    pub fn new(initial: RenderState) -> Self {
        Self {
            current: initial,
            pending: initial,
            glyphs_dirty: true,
            quit: false,
        }
    }

    /// State used by the frame in flight.
    pub fn current(&self) -> RenderState {
        self.current
    }

    /// State the next frame will use.
    pub fn pending(&self) -> RenderState {
        self.pending
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Single mutation entry point.
    pub fn apply(&mut self, event: InputEvent) -> Result<Transition> {
        match event {
            InputEvent::Quit => {
                self.quit = true;
                Ok(Transition::Quit)
            }
            InputEvent::Select(selector, value) => {
                let before = self.pending;
                if let Err(e) = self.pending.set(selector, value) {
                    tracing::warn!(%selector, value, "rejected selector value");
                    return Err(e);
                }
                if self.pending == before {
                    return Ok(Transition::Unchanged);
                }
                if self.pending.font != before.font {
                    self.glyphs_dirty = true;
                }
                tracing::debug!(from = %before, to = %self.pending, "render state changed");
                Ok(Transition::Changed)
            }
        }
    }

    /// Commit pending changes and report whether glyphs need rebuilding.
    /// Clears the dirty flag.
    pub fn begin_frame(&mut self) -> FrameState {
        self.current = self.pending;
        let rebuild_glyphs = std::mem::take(&mut self.glyphs_dirty);
        FrameState {
            state: self.current,
            rebuild_glyphs,
        }
    }
}
