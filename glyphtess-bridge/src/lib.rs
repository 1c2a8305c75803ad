//! Glyphtess Bridge library target.
//!
//! The binary entry point is in `main.rs`; this target exposes the window,
//! GPU and configuration layers so `tests/*.rs` can reach them.

pub mod config;
pub mod gfx;
pub mod keyboard;
pub mod shell;
pub mod util;
