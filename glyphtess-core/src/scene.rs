//! The fixed demonstration curves drawn by scenes 1 and 2.

use std::ops::Range;

use crate::assembler::{assemble, PatchSet};
use crate::outline::{Glyph, Point, Segment};
use crate::state::Scene;

/// Quadratic group: four closed-ish arcs.
pub const QUADRATIC_RANGE: Range<u32> = 0..4;
/// Cubic group: five curves including a loop and a cusp.
pub const CUBIC_RANGE: Range<u32> = 4..9;
/// The patch highlighted next to the glyph string, kept apart from both
/// groups.
pub const HIGHLIGHT_RANGE: Range<u32> = 9..10;

fn quad(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Segment {
    const S: f32 = 2.5;
    Segment::quadratic(
        Point::new(a.0 / S, a.1 / S),
        Point::new(b.0 / S, b.1 / S),
        Point::new(c.0 / S, c.1 / S),
    )
}

fn cubic(a: (f32, f32), b: (f32, f32), c: (f32, f32), d: (f32, f32)) -> Segment {
    const S: f32 = 9.0;
    Segment::cubic(
        Point::new(a.0 / S, a.1 / S),
        Point::new(b.0 / S, b.1 / S),
        Point::new(c.0 / S, c.1 / S),
        Point::new(d.0 / S, d.1 / S),
    )
}

/// The demo patch buffer, assembled once.
#[derive(Debug, Clone)]
pub struct DemoScene {
    patches: PatchSet,
}

impl Default for DemoScene {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoScene {
    pub fn new() -> Self {
        let quadratics = vec![
            quad((1.0, 1.0), (2.0, -1.0), (0.0, -1.0)),
            quad((0.0, -1.0), (-2.0, -1.0), (-1.0, 1.0)),
            quad((-1.0, 1.0), (0.0, 1.0), (1.0, 1.0)),
            quad((1.2, 0.5), (2.5, 1.0), (1.3, -0.4)),
        ];
        let cubics = vec![
            cubic((1.0, 1.0), (4.0, 0.0), (6.0, 2.0), (9.0, 1.0)),
            cubic((8.0, 2.0), (0.0, 8.0), (0.0, -2.0), (8.0, 4.0)),
            cubic((5.0, 3.0), (3.0, 2.0), (3.0, 3.0), (5.0, 2.0)),
            cubic((3.0, 2.2), (3.5, 2.7), (3.5, 3.3), (3.0, 3.8)),
            cubic((2.8, 3.5), (2.4, 3.8), (2.4, 3.2), (2.8, 3.5)),
        ];
        let highlight = vec![quadratics[0]];
        // Zero advances keep every group at its authored coordinates.
        let glyphs = [
            Glyph::new(vec![quadratics], 0.0),
            Glyph::new(vec![cubics], 0.0),
            Glyph::new(vec![highlight], 0.0),
        ];
        Self {
            patches: assemble(&glyphs),
        }
    }

    pub fn patches(&self) -> &PatchSet {
        &self.patches
    }

    /// Patch range drawn for `scene`.
    pub fn range(scene: Scene) -> Range<u32> {
        match scene {
            Scene::Quadratic => QUADRATIC_RANGE,
            Scene::Cubic => CUBIC_RANGE,
            Scene::Glyphs => HIGHLIGHT_RANGE,
        }
    }
}
