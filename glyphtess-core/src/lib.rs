pub mod assembler;
pub mod error;
pub mod outline;
pub mod plan;
pub mod scene;
pub mod state;

// Re-export the main types so users can write `glyphtess_core::PatchAssembler`
pub use assembler::{assemble, Patch, PatchAssembler, PatchSet};
pub use error::{GlyphError, Result};
pub use outline::{Contour, Degree, Glyph, OutlineSource, Point, Segment};
pub use plan::{DrawCall, DrawUniforms, FramePlan, PatchRenderer};
pub use scene::DemoScene;
pub use state::{FontSlot, InputEvent, RenderState, RenderStateMachine, Scene, Selector, Style};
