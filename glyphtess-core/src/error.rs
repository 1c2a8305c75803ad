use thiserror::Error;

use crate::state::Selector;

/// Everything that can go wrong between outline data and a submitted frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlyphError {
    /// Startup could not complete (shaders, window, GPU, config).
    #[error("initialization failed: {0}")]
    InitializationFailure(String),

    /// The graphics API reported an error while a frame was being drawn.
    #[error("graphics state error: {0}")]
    GraphicsState(String),

    /// The assembler was asked for more patches than it may hold.
    #[error("patch capacity exceeded: {requested} patches requested, capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// A selector value outside `1..=3`.
    #[error("invalid {selector} selector value {value}")]
    InvalidSelector { selector: Selector, value: u8 },

    /// A segment whose point count does not match its degree.
    #[error("segment of degree {degree} cannot carry {points} points")]
    MalformedSegment { degree: u8, points: usize },

    /// A degree code outside `0..=3`.
    #[error("invalid segment degree {0}, expected 0..=3")]
    InvalidDegree(u8),
}

pub type Result<T> = std::result::Result<T, GlyphError>;
