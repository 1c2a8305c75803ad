//! Outline data model.
//!
//! A glyph is an ordered list of contours, a contour an ordered list of
//! degree-tagged segments. Everything here is immutable once built.

use serde::{Deserialize, Serialize};

use crate::error::{GlyphError, Result};

/// A 2D point in outline space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Same point moved right by `dx`.
    pub fn offset_x(self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Curve degree of a segment, and therefore of the patch built from it.
///
/// The assembler, the degree uniform and the overlay pass selection all
/// read point counts from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Degree {
    /// Move marker: one point, nothing visible.
    Point = 0,
    Line = 1,
    Quadratic = 2,
    Cubic = 3,
}

impl Degree {
    pub const ALL: [Degree; 4] = [Degree::Point, Degree::Line, Degree::Quadratic, Degree::Cubic];

    pub fn from_u8(value: u8) -> Option<Degree> {
        match value {
            0 => Some(Degree::Point),
            1 => Some(Degree::Line),
            2 => Some(Degree::Quadratic),
            3 => Some(Degree::Cubic),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Value written into the per-draw degree uniform.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Number of meaningful control points.
    pub fn point_count(self) -> usize {
        self as usize + 1
    }

    /// Slot of the last on-curve point.
    pub fn end_slot(self) -> usize {
        self as usize
    }

    /// Slots holding off-curve control points (empty for points and lines).
    pub fn control_slots(self) -> std::ops::Range<usize> {
        match self {
            Degree::Point | Degree::Line => 0..0,
            _ => 1..self.end_slot(),
        }
    }

    /// Whether the tessellation stage produces visible geometry.
    pub fn is_drawable(self) -> bool {
        self != Degree::Point
    }

    /// Line segments the tessellation stage emits for this degree.
    ///
    /// Mirrored by `segments_for` in `patch.wgsl`.
    pub fn tessellation_segments(self) -> u32 {
        match self {
            Degree::Point => 1,
            Degree::Line => 1,
            Degree::Quadratic => 16,
            Degree::Cubic => 32,
        }
    }
}

impl TryFrom<u8> for Degree {
    type Error = GlyphError;

    fn try_from(value: u8) -> Result<Self> {
        Degree::from_u8(value).ok_or(GlyphError::InvalidDegree(value))
    }
}

impl From<Degree> for u8 {
    fn from(d: Degree) -> u8 {
        d.as_u8()
    }
}

/// One piece of an outline: a move marker, a line, or a Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    degree: Degree,
    points: [Point; 4],
}

impl Segment {
    /// Build a segment from exactly `degree + 1` points.
    pub fn new(degree: Degree, points: &[Point]) -> Result<Self> {
        if points.len() != degree.point_count() {
            return Err(GlyphError::MalformedSegment {
                degree: degree.as_u8(),
                points: points.len(),
            });
        }
        let mut slots = [Point::ZERO; 4];
        slots[..points.len()].copy_from_slice(points);
        Ok(Self {
            degree,
            points: slots,
        })
    }

    pub fn point(p: Point) -> Self {
        Self {
            degree: Degree::Point,
            points: [p, Point::ZERO, Point::ZERO, Point::ZERO],
        }
    }

    pub fn line(p0: Point, p1: Point) -> Self {
        Self {
            degree: Degree::Line,
            points: [p0, p1, Point::ZERO, Point::ZERO],
        }
    }

    pub fn quadratic(p0: Point, p1: Point, p2: Point) -> Self {
        Self {
            degree: Degree::Quadratic,
            points: [p0, p1, p2, Point::ZERO],
        }
    }

    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            degree: Degree::Cubic,
            points: [p0, p1, p2, p3],
        }
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// The `degree + 1` meaningful points.
    pub fn points(&self) -> &[Point] {
        &self.points[..self.degree.point_count()]
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.degree.end_slot()]
    }
}

/// One loop of a glyph outline, in stroke order.
pub type Contour = Vec<Segment>;

/// The outline of a single character plus its horizontal advance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub contours: Vec<Contour>,
    pub advance: f32,
}

impl Glyph {
    pub fn new(contours: Vec<Contour>, advance: f32) -> Self {
        Self { contours, advance }
    }

    pub fn segment_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.contours.iter().flatten()
    }
}

/// Supplies glyph outlines per character.
///
/// Implementations must be deterministic for a given font and character.
pub trait OutlineSource {
    type Error: std::error::Error;

    fn extract_glyph(&self, ch: char) -> std::result::Result<Glyph, Self::Error>;

    /// One glyph per character of `text`, in order.
    fn extract_text(&self, text: &str) -> std::result::Result<Vec<Glyph>, Self::Error> {
        text.chars().map(|ch| self.extract_glyph(ch)).collect()
    }
}
