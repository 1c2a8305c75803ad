//! Frame planning: which draws happen, with which program and uniforms.
//!
//! The planner is pure. It turns the committed render state and the two
//! patch sets into an ordered list of draw calls; the GPU layer only
//! replays that list. Curves are drawn one patch per call so each call can
//! carry its own degree uniform.

use std::ops::Range;

use crate::assembler::{Bounds, PatchSet, PATCH_SLOTS};
use crate::outline::Degree;
use crate::scene::DemoScene;
use crate::state::{RenderState, Scene};

/// Blend for control polygons and off-curve markers.
pub const CONTROL_BLEND: f32 = 0.7;
/// Blend for on-curve anchor markers.
pub const ANCHOR_BLEND: f32 = 0.0;

/// Fraction of the viewport the glyph string may cover.
const GLYPH_MARGIN: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    /// Consumes whole patches and tessellates them by degree.
    Tessellated,
    /// Consumes the patch buffer as a flat list of points.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Patches,
    LineStrip,
    Points,
}

/// Which patch buffer a draw reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    Demo,
    Glyphs,
}

/// Per-draw uniform block, laid out to match `DrawUniforms` in the WGSL.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    /// `xy` scale, `zw` offset.
    pub transform: [f32; 4],
    pub scene: i32,
    pub degree: i32,
    pub blend: f32,
    pub _pad: f32,
}

/// Scale then offset, applied in the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl Placement {
    pub const IDENTITY: Placement = Placement {
        scale: [1.0, 1.0],
        offset: [0.0, 0.0],
    };

    pub fn new(scale: [f32; 2], offset: [f32; 2]) -> Self {
        Self { scale, offset }
    }

    /// Fit `bounds` into the viewport, centered, with equal pixel scale on
    /// both axes.
    pub fn fit(bounds: Option<Bounds>, viewport: [u32; 2]) -> Self {
        let Some(b) = bounds else {
            return Self::IDENTITY;
        };
        let aspect = viewport[0].max(1) as f32 / viewport[1].max(1) as f32;
        let w = b.width().max(f32::EPSILON);
        let h = b.height().max(f32::EPSILON);
        let sx = (2.0 * GLYPH_MARGIN / w).min(2.0 * GLYPH_MARGIN / (h * aspect));
        let sy = sx * aspect;
        let c = b.center();
        Self {
            scale: [sx, sy],
            offset: [-c.x * sx, -c.y * sy],
        }
    }

    /// Where the demo curves of `scene` sit.
    pub fn for_demo(scene: Scene) -> Self {
        match scene {
            Scene::Quadratic => Self::IDENTITY,
            // The cubic group is authored in the unit square.
            Scene::Cubic => Self::new([1.8, 1.8], [-0.9, -0.9]),
            Scene::Glyphs => Self::new([0.3, 0.3], [-0.7, 0.7]),
        }
    }

    pub fn to_uniform(self) -> [f32; 4] {
        [self.scale[0], self.scale[1], self.offset[0], self.offset[1]]
    }

    pub fn apply(self, p: [f32; 2]) -> [f32; 2] {
        [
            p[0] * self.scale[0] + self.offset[0],
            p[1] * self.scale[1] + self.offset[1],
        ]
    }
}

/// One draw. `vertices` and `instances` map straight onto the GPU draw:
/// curve draws use the instance range to pick the patch, plain draws use
/// the vertex range to pick slots of the flattened buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: Program,
    pub primitive: Primitive,
    pub geometry: Geometry,
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
    pub uniforms: DrawUniforms,
}

/// Ordered draws for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub calls: Vec<DrawCall>,
}

impl FramePlan {
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCall> {
        self.calls.iter()
    }

    pub fn uniforms(&self) -> Vec<DrawUniforms> {
        self.calls.iter().map(|c| c.uniforms).collect()
    }

    /// Draws reading a given buffer with a given program.
    pub fn count(&self, geometry: Geometry, program: Program) -> usize {
        self.calls
            .iter()
            .filter(|c| c.geometry == geometry && c.program == program)
            .count()
    }
}

/// Builds frame plans. Holds nothing but the pass layout, so one planner
/// serves every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchRenderer;

struct Target<'a> {
    geometry: Geometry,
    set: &'a PatchSet,
    range: Range<u32>,
    placement: Placement,
    scene: i32,
}

impl<'a> Target<'a> {
    fn degrees(&self) -> impl Iterator<Item = (u32, Degree)> + '_ {
        let end = self.range.end.min(self.set.len() as u32);
        let start = self.range.start.min(end);
        (start..end).map(move |i| (i, self.set.degrees()[i as usize]))
    }

    fn uniforms(&self, degree: Degree, blend: f32) -> DrawUniforms {
        DrawUniforms {
            transform: self.placement.to_uniform(),
            scene: self.scene,
            degree: degree.code(),
            blend,
            _pad: 0.0,
        }
    }
}

impl PatchRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Plan the whole frame: demo overlay, demo curves, then glyph curves
    /// and glyph overlay when the glyph scene is active.
    pub fn plan_frame(
        &self,
        state: RenderState,
        demo: &PatchSet,
        glyphs: &PatchSet,
        viewport: [u32; 2],
    ) -> FramePlan {
        let mut plan = FramePlan::default();
        let scene = state.scene.value() as i32;

        let demo_target = Target {
            geometry: Geometry::Demo,
            set: demo,
            range: DemoScene::range(state.scene),
            placement: Placement::for_demo(state.scene),
            scene,
        };
        // The highlight patch in the glyph scene never gets an overlay.
        if state.style.shows_overlay() && !state.scene.shows_glyphs() {
            self.plan_overlay(&mut plan, &demo_target);
        }
        self.plan_curves(&mut plan, &demo_target);

        if state.scene.shows_glyphs() {
            let glyph_target = Target {
                geometry: Geometry::Glyphs,
                set: glyphs,
                range: 0..glyphs.len() as u32,
                placement: Placement::fit(glyphs.bounds(), viewport),
                scene,
            };
            self.plan_curves(&mut plan, &glyph_target);
            if state.style.shows_overlay() {
                self.plan_overlay(&mut plan, &glyph_target);
            }
        }

        tracing::trace!(draws = plan.len(), %state, "planned frame");
        plan
    }

    /// One tessellated draw per patch, each carrying that patch's degree.
    fn plan_curves(&self, plan: &mut FramePlan, target: &Target<'_>) {
        for (i, degree) in target.degrees() {
            plan.calls.push(DrawCall {
                program: Program::Tessellated,
                primitive: Primitive::Patches,
                geometry: target.geometry,
                vertices: 0..degree.tessellation_segments() + 1,
                instances: i..i + 1,
                uniforms: target.uniforms(degree, 0.0),
            });
        }
    }

    /// Control polygons, then off-curve markers, then on-curve markers.
    fn plan_overlay(&self, plan: &mut FramePlan, target: &Target<'_>) {
        let slots = PATCH_SLOTS as u32;
        let plain = |primitive: Primitive, i: u32, slots_range: Range<u32>, degree: Degree, blend: f32| DrawCall {
            program: Program::Plain,
            primitive,
            geometry: target.geometry,
            vertices: i * slots + slots_range.start..i * slots + slots_range.end,
            instances: 0..1,
            uniforms: target.uniforms(degree, blend),
        };

        for (i, degree) in target.degrees().filter(|(_, d)| d.is_drawable()) {
            let n = degree.point_count() as u32;
            plan.calls
                .push(plain(Primitive::LineStrip, i, 0..n, degree, CONTROL_BLEND));
        }

        for (i, degree) in target.degrees() {
            for slot in degree.control_slots() {
                let s = slot as u32;
                plan.calls
                    .push(plain(Primitive::Points, i, s..s + 1, degree, CONTROL_BLEND));
            }
        }

        for (i, degree) in target.degrees().filter(|(_, d)| d.is_drawable()) {
            let last = degree.end_slot() as u32;
            for s in [0, last] {
                plan.calls
                    .push(plain(Primitive::Points, i, s..s + 1, degree, ANCHOR_BLEND));
            }
        }
    }
}
