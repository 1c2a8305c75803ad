//! Glyph outline → fixed-stride patch assembly.
//!
//! Every segment becomes one 4-slot patch. The first `degree + 1` slots
//! carry the segment's points shifted right by the advance accumulated over
//! the preceding glyphs; the rest are zero. A parallel degree array tells
//! the tessellation stage how to read each patch.

use crate::error::{GlyphError, Result};
use crate::outline::{Degree, Glyph, Point};

/// Control points per patch.
pub const PATCH_SLOTS: usize = 4;

/// One tessellation patch: four (x, y) slots, tightly packed for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Patch {
    pub slots: [[f32; 2]; PATCH_SLOTS],
}

impl Patch {
    pub const ZERO: Patch = Patch {
        slots: [[0.0; 2]; PATCH_SLOTS],
    };

    /// Pack `points` into the leading slots, zero-filling the remainder.
    pub fn from_points(points: &[Point], dx: f32) -> Self {
        let mut patch = Patch::ZERO;
        for (slot, p) in patch.slots.iter_mut().zip(points) {
            *slot = [p.x + dx, p.y];
        }
        patch
    }

    pub fn slot(&self, i: usize) -> Point {
        Point::new(self.slots[i][0], self.slots[i][1])
    }
}

/// Axis-aligned bounds of outline geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }
}

/// Patches plus their degree array. `patches[i]` and `degrees[i]` always
/// describe the same segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
    patches: Vec<Patch>,
    degrees: Vec<Degree>,
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            patches: Vec::with_capacity(n),
            degrees: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, patch: Patch, degree: Degree) {
        self.patches.push(patch);
        self.degrees.push(degree);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn degrees(&self) -> &[Degree] {
        &self.degrees
    }

    /// Degrees as the integers the shaders receive.
    pub fn degree_codes(&self) -> Vec<i32> {
        self.degrees.iter().map(|d| d.code()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Patch, Degree)> {
        self.patches.iter().zip(self.degrees.iter().copied())
    }

    /// Bounds over meaningful slots only; zero padding is ignored.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .iter()
            .flat_map(|(patch, degree)| (0..degree.point_count()).map(move |i| patch.slot(i)));
        let first = points.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }
}

/// Total segments across all contours of all glyphs.
pub fn segment_count(glyphs: &[Glyph]) -> usize {
    glyphs.iter().map(Glyph::segment_count).sum()
}

/// Horizontal offset applied to each glyph, and the total string width.
pub fn advance_offsets(glyphs: &[Glyph]) -> (Vec<f32>, f32) {
    let mut pen = 0.0f32;
    let offsets = glyphs
        .iter()
        .map(|g| {
            let at = pen;
            pen += g.advance;
            at
        })
        .collect();
    (offsets, pen)
}

/// Builds patch sets from glyph sequences, optionally bounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchAssembler {
    capacity: Option<usize>,
}

impl PatchAssembler {
    /// An assembler that grows to whatever the glyphs need.
    pub fn new() -> Self {
        Self { capacity: None }
    }

    /// An assembler that refuses to produce more than `capacity` patches.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Lay the glyphs out left to right and emit one patch per segment.
    ///
    /// The capacity check happens before anything is written.
    pub fn assemble(&self, glyphs: &[Glyph]) -> Result<PatchSet> {
        let requested = segment_count(glyphs);
        if let Some(capacity) = self.capacity {
            if requested > capacity {
                return Err(GlyphError::CapacityExceeded {
                    requested,
                    capacity,
                });
            }
        }

        let (set, width) = lay_out(glyphs, requested);
        tracing::debug!(
            glyphs = glyphs.len(),
            patches = set.len(),
            width,
            "assembled glyph patches"
        );
        Ok(set)
    }
}

/// Unbounded assembly.
pub fn assemble(glyphs: &[Glyph]) -> PatchSet {
    lay_out(glyphs, segment_count(glyphs)).0
}

fn lay_out(glyphs: &[Glyph], expected: usize) -> (PatchSet, f32) {
    let mut set = PatchSet::with_capacity(expected);
    let mut advance = 0.0f32;
    for glyph in glyphs {
        for segment in glyph.segments() {
            set.push(
                Patch::from_points(segment.points(), advance),
                segment.degree(),
            );
        }
        advance += glyph.advance;
    }
    (set, advance)
}
