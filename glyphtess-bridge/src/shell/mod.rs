//! Application Shell: winit lifecycle and event dispatch.
//!
//! The shell owns the winit event loop and the render state machine. It
//! translates platform events into state machine events and drives frames.

pub(crate) mod app;
mod events;

pub use app::{run, GlyphApp};
