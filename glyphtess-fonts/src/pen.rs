use glyphtess_core::{Contour, Point, Segment};
use skrifa::outline::OutlinePen;

/// Pen that records drawing commands as degree-tagged segments.
///
/// Every contour opens with a degree 0 segment at its start point, followed
/// by one segment per line, quadratic or cubic command. Closing a contour
/// whose current point is away from its start adds the closing line.
/// Contours that never draw anything past the start marker are dropped.
#[derive(Debug, Clone)]
pub struct SegmentPen {
    scale: f32,
    contours: Vec<Contour>,
    current: Contour,
    start: Point,
    cursor: Point,
}

impl Default for SegmentPen {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SegmentPen {
    /// `scale` multiplies every incoming coordinate.
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            contours: Vec::new(),
            current: Vec::new(),
            start: Point::ZERO,
            cursor: Point::ZERO,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Contours finished so far, not counting the one in progress.
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Flush the contour in progress and return everything recorded.
    pub fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.contours
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(x * self.scale, y * self.scale)
    }

    fn flush(&mut self) {
        let contour = std::mem::take(&mut self.current);
        if contour.len() > 1 {
            self.contours.push(contour);
        }
    }

    // Drawing without a preceding move starts at the current point.
    fn ensure_started(&mut self) {
        if self.current.is_empty() {
            self.start = self.cursor;
            self.current.push(Segment::point(self.cursor));
        }
    }

    fn push(&mut self, segment: Segment) {
        self.ensure_started();
        self.cursor = segment.end();
        self.current.push(segment);
    }
}

impl OutlinePen for SegmentPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        let p = self.point(x, y);
        self.start = p;
        self.cursor = p;
        self.current.push(Segment::point(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.push(Segment::line(self.cursor, p));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.point(cx0, cy0);
        let p = self.point(x, y);
        self.push(Segment::quadratic(self.cursor, c, p));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        let c1 = self.point(cx1, cy1);
        let p = self.point(x, y);
        self.push(Segment::cubic(self.cursor, c0, c1, p));
    }

    fn close(&mut self) {
        if !self.current.is_empty() && self.cursor != self.start {
            self.current.push(Segment::line(self.cursor, self.start));
            self.cursor = self.start;
        }
        self.flush();
    }
}
