use glyphtess_core::assembler::{advance_offsets, segment_count, Patch};
use glyphtess_core::plan::{
    Geometry, Placement, Primitive, Program, ANCHOR_BLEND, CONTROL_BLEND,
};
use glyphtess_core::scene::{CUBIC_RANGE, HIGHLIGHT_RANGE, QUADRATIC_RANGE};
use glyphtess_core::state::{FrameState, Transition};
use glyphtess_core::{
    assemble, DemoScene, Degree, FontSlot, Glyph, GlyphError, InputEvent, PatchAssembler,
    PatchRenderer, PatchSet, Point, RenderState, RenderStateMachine, Scene, Segment, Selector,
    Style,
};

// ============================================================================
// Helpers
// ============================================================================

fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

fn unit_line_glyph() -> Glyph {
    Glyph::new(vec![vec![Segment::line(p(0.0, 0.0), p(1.0, 0.0))]], 1.0)
}

/// A glyph exercising every degree in two contours.
fn mixed_glyph(advance: f32) -> Glyph {
    Glyph::new(
        vec![
            vec![
                Segment::point(p(0.1, 0.2)),
                Segment::line(p(0.1, 0.2), p(0.5, 0.2)),
                Segment::quadratic(p(0.5, 0.2), p(0.7, 0.4), p(0.5, 0.6)),
            ],
            vec![Segment::cubic(
                p(0.2, 0.3),
                p(0.3, 0.9),
                p(0.6, 0.9),
                p(0.7, 0.3),
            )],
        ],
        advance,
    )
}

fn zero() -> [f32; 2] {
    [0.0, 0.0]
}

// ============================================================================
// Degree
// ============================================================================

#[test]
fn test_degree_point_counts() {
    assert_eq!(Degree::Point.point_count(), 1);
    assert_eq!(Degree::Line.point_count(), 2);
    assert_eq!(Degree::Quadratic.point_count(), 3);
    assert_eq!(Degree::Cubic.point_count(), 4);
}

#[test]
fn test_degree_codes_match_values() {
    for d in Degree::ALL {
        assert_eq!(d.code(), d.as_u8() as i32);
        assert_eq!(Degree::from_u8(d.as_u8()), Some(d));
    }
    assert_eq!(Degree::from_u8(4), None);
}

#[test]
fn test_degree_control_slots() {
    assert!(Degree::Point.control_slots().is_empty());
    assert!(Degree::Line.control_slots().is_empty());
    assert_eq!(Degree::Quadratic.control_slots(), 1..2);
    assert_eq!(Degree::Cubic.control_slots(), 1..3);
}

#[test]
fn test_degree_serde_uses_integer() {
    let json = serde_json::to_string(&Degree::Cubic).unwrap();
    assert_eq!(json, "3");
    let back: Degree = serde_json::from_str("2").unwrap();
    assert_eq!(back, Degree::Quadratic);
    assert!(serde_json::from_str::<Degree>("9").is_err());
}

#[test]
fn test_degree_out_of_range_has_own_error() {
    assert_eq!(Degree::try_from(3u8).unwrap(), Degree::Cubic);
    let err = Degree::try_from(7u8).unwrap_err();
    assert_eq!(err, GlyphError::InvalidDegree(7));
    assert!(err.to_string().contains("degree 7"));
    assert!(!err.to_string().contains("points"));
}

// ============================================================================
// Segment
// ============================================================================

#[test]
fn test_segment_new_validates_point_count() {
    let ok = Segment::new(Degree::Quadratic, &[p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)]);
    assert!(ok.is_ok());

    let err = Segment::new(Degree::Cubic, &[p(0.0, 0.0), p(1.0, 1.0)]).unwrap_err();
    assert_eq!(
        err,
        GlyphError::MalformedSegment {
            degree: 3,
            points: 2
        }
    );
}

#[test]
fn test_segment_points_are_meaningful_only() {
    let s = Segment::quadratic(p(0.0, 0.0), p(1.0, 2.0), p(3.0, 0.0));
    assert_eq!(s.points().len(), 3);
    assert_eq!(s.start(), p(0.0, 0.0));
    assert_eq!(s.end(), p(3.0, 0.0));
}

#[test]
fn test_point_segment_has_single_point() {
    let s = Segment::point(p(4.0, 5.0));
    assert_eq!(s.degree(), Degree::Point);
    assert_eq!(s.points(), &[p(4.0, 5.0)]);
    assert_eq!(s.end(), p(4.0, 5.0));
}

// ============================================================================
// Patch Assembler: scenarios
// ============================================================================

#[test]
fn test_assemble_two_unit_lines() {
    let set = assemble(&[unit_line_glyph(), unit_line_glyph()]);

    assert_eq!(
        set.patches(),
        &[
            Patch {
                slots: [[0.0, 0.0], [1.0, 0.0], zero(), zero()]
            },
            Patch {
                slots: [[1.0, 0.0], [2.0, 0.0], zero(), zero()]
            },
        ]
    );
    assert_eq!(set.degrees(), &[Degree::Line, Degree::Line]);
    assert_eq!(set.degree_codes(), vec![1, 1]);
}

#[test]
fn test_assemble_empty_input() {
    let set = assemble(&[]);
    assert!(set.is_empty());
    assert!(set.degrees().is_empty());
    assert!(PatchAssembler::bounded(0).assemble(&[]).unwrap().is_empty());
}

#[test]
fn test_assemble_glyph_without_contours_still_advances() {
    let space = Glyph::new(Vec::new(), 0.5);
    let set = assemble(&[space, unit_line_glyph()]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.patches()[0].slots[0], [0.5, 0.0]);
    assert_eq!(set.patches()[0].slots[1], [1.5, 0.0]);
}

#[test]
fn test_degree_zero_at_string_start() {
    let g = Glyph::new(vec![vec![Segment::point(p(0.25, 0.75))]], 1.0);
    let set = assemble(&[g]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.patches()[0].slots, [[0.25, 0.75], zero(), zero(), zero()]);
    assert_eq!(set.degrees(), &[Degree::Point]);
}

#[test]
fn test_cubic_fills_all_slots() {
    let set = assemble(&[mixed_glyph(1.0)]);
    let cubic = set.patches()[3];
    assert_eq!(
        cubic.slots,
        [[0.2, 0.3], [0.3, 0.9], [0.6, 0.9], [0.7, 0.3]]
    );
}

// ============================================================================
// Patch Assembler: properties
// ============================================================================

#[test]
fn test_lengths_match_segment_count() {
    let glyphs = vec![mixed_glyph(1.0), unit_line_glyph(), mixed_glyph(0.8)];
    let set = assemble(&glyphs);
    let total = segment_count(&glyphs);
    assert_eq!(total, 4 + 1 + 4);
    assert_eq!(set.len(), total);
    assert_eq!(set.degrees().len(), total);
}

#[test]
fn test_slots_hold_offset_points_and_zero_padding() {
    let glyphs = vec![mixed_glyph(1.25), mixed_glyph(0.75), mixed_glyph(2.0)];
    let set = assemble(&glyphs);
    let (offsets, _) = advance_offsets(&glyphs);

    let mut i = 0;
    for (glyph, dx) in glyphs.iter().zip(offsets) {
        for segment in glyph.segments() {
            let patch = set.patches()[i];
            assert_eq!(set.degrees()[i], segment.degree());
            let n = segment.degree().point_count();
            for (slot, point) in segment.points().iter().enumerate() {
                assert_eq!(patch.slots[slot], [point.x + dx, point.y]);
            }
            for slot in n..4 {
                assert_eq!(patch.slots[slot], zero(), "slot {} of patch {}", slot, i);
            }
            i += 1;
        }
    }
    assert_eq!(i, set.len());
}

#[test]
fn test_advance_offsets_are_prefix_sums() {
    let glyphs = vec![
        Glyph::new(Vec::new(), 0.5),
        Glyph::new(Vec::new(), 0.25),
        Glyph::new(Vec::new(), 1.0),
        Glyph::new(Vec::new(), 0.125),
    ];
    let (offsets, width) = advance_offsets(&glyphs);
    assert_eq!(offsets, vec![0.0, 0.5, 0.75, 1.75]);
    assert_eq!(width, 1.875);
}

#[test]
fn test_assemble_is_idempotent() {
    let glyphs = vec![mixed_glyph(1.0), unit_line_glyph()];
    let a = assemble(&glyphs);
    let b = assemble(&glyphs);
    assert_eq!(a, b);

    let assembler = PatchAssembler::new();
    assert_eq!(assembler.assemble(&glyphs).unwrap(), a);
}

#[test]
fn test_assemble_preserves_traversal_order() {
    let set = assemble(&[mixed_glyph(1.0)]);
    assert_eq!(
        set.degrees(),
        &[Degree::Point, Degree::Line, Degree::Quadratic, Degree::Cubic]
    );
}

#[test]
fn test_assemble_does_not_touch_input() {
    let glyphs = vec![mixed_glyph(1.0)];
    let before = glyphs.clone();
    let _ = assemble(&glyphs);
    assert_eq!(glyphs, before);
}

// ============================================================================
// Patch Assembler: capacity
// ============================================================================

#[test]
fn test_capacity_exceeded_is_reported() {
    let glyphs = vec![mixed_glyph(1.0), mixed_glyph(1.0)];
    let err = PatchAssembler::bounded(7).assemble(&glyphs).unwrap_err();
    assert_eq!(
        err,
        GlyphError::CapacityExceeded {
            requested: 8,
            capacity: 7
        }
    );
}

#[test]
fn test_capacity_exact_fit_succeeds() {
    let glyphs = vec![mixed_glyph(1.0), mixed_glyph(1.0)];
    let set = PatchAssembler::bounded(8).assemble(&glyphs).unwrap();
    assert_eq!(set.len(), 8);
}

#[test]
fn test_unbounded_assembler_has_no_capacity() {
    assert_eq!(PatchAssembler::new().capacity(), None);
    assert_eq!(PatchAssembler::bounded(512).capacity(), Some(512));
}

// ============================================================================
// PatchSet
// ============================================================================

#[test]
fn test_bounds_ignore_zero_padding() {
    let g = Glyph::new(
        vec![vec![Segment::line(p(2.0, 3.0), p(4.0, 5.0))]],
        1.0,
    );
    let b = assemble(&[g]).bounds().unwrap();
    assert_eq!(b.min, p(2.0, 3.0));
    assert_eq!(b.max, p(4.0, 5.0));
    assert_eq!(b.center(), p(3.0, 4.0));
}

#[test]
fn test_bounds_of_empty_set() {
    assert!(PatchSet::new().bounds().is_none());
}

#[test]
fn test_patch_is_tightly_packed() {
    assert_eq!(std::mem::size_of::<Patch>(), 32);
    let set = assemble(&[unit_line_glyph()]);
    let bytes: &[u8] = bytemuck::cast_slice(set.patches());
    assert_eq!(bytes.len(), 32);
}

// ============================================================================
// Render State: selectors
// ============================================================================

#[test]
fn test_default_state_is_all_ones() {
    let s = RenderState::default();
    assert_eq!(s.scene, Scene::Quadratic);
    assert_eq!(s.style, Style::Curve);
    assert_eq!(s.font, FontSlot::Primary);
}

#[test]
fn test_selector_values_round_trip() {
    for v in 1..=3u8 {
        assert_eq!(Scene::try_from(v).unwrap().value(), v);
        assert_eq!(Style::try_from(v).unwrap().value(), v);
        assert_eq!(FontSlot::try_from(v).unwrap().value(), v);
    }
}

#[test]
fn test_selector_rejects_out_of_set() {
    assert_eq!(
        FontSlot::try_from(4).unwrap_err(),
        GlyphError::InvalidSelector {
            selector: Selector::Font,
            value: 4
        }
    );
    assert!(Scene::try_from(0).is_err());
    assert!(Style::try_from(200).is_err());
}

#[test]
fn test_font_slot_index() {
    assert_eq!(FontSlot::Primary.index(), 0);
    assert_eq!(FontSlot::Tertiary.index(), 2);
}

#[test]
fn test_only_annotated_style_shows_overlay() {
    assert!(!Style::Curve.shows_overlay());
    assert!(Style::Annotated.shows_overlay());
    assert!(!Style::Reserved.shows_overlay());
}

#[test]
fn test_render_state_from_values() {
    let s = RenderState::from_values(3, 2, 1).unwrap();
    assert_eq!(s.scene, Scene::Glyphs);
    assert_eq!(s.style, Style::Annotated);
    assert!(RenderState::from_values(1, 4, 1).is_err());
}

#[test]
fn test_render_state_display() {
    let s = RenderState::from_values(2, 1, 3).unwrap();
    assert_eq!(s.to_string(), "scene 2 | style 1 | font 3");
}

#[test]
fn test_render_state_serde() {
    let s: RenderState = serde_json::from_str(r#"{"scene":3,"style":2,"font":2}"#).unwrap();
    assert_eq!(s, RenderState::from_values(3, 2, 2).unwrap());
    assert!(serde_json::from_str::<RenderState>(r#"{"scene":5,"style":2,"font":2}"#).is_err());
}

// ============================================================================
// Render State Machine
// ============================================================================

#[test]
fn test_invalid_font_keeps_selection() {
    let mut sm = RenderStateMachine::default();
    sm.apply(InputEvent::Select(Selector::Font, 2)).unwrap();

    let err = sm.apply(InputEvent::Select(Selector::Font, 4)).unwrap_err();
    assert!(matches!(
        err,
        GlyphError::InvalidSelector {
            selector: Selector::Font,
            value: 4
        }
    ));
    assert_eq!(sm.pending().font, FontSlot::Secondary);
}

#[test]
fn test_changes_take_effect_next_frame() {
    let mut sm = RenderStateMachine::default();
    sm.begin_frame();

    sm.apply(InputEvent::Select(Selector::Scene, 3)).unwrap();
    assert_eq!(sm.current().scene, Scene::Quadratic);
    assert_eq!(sm.pending().scene, Scene::Glyphs);

    let frame = sm.begin_frame();
    assert_eq!(frame.state.scene, Scene::Glyphs);
    assert_eq!(sm.current().scene, Scene::Glyphs);
}

#[test]
fn test_first_frame_builds_glyphs() {
    let mut sm = RenderStateMachine::default();
    assert!(sm.begin_frame().rebuild_glyphs);
    assert!(!sm.begin_frame().rebuild_glyphs);
}

#[test]
fn test_font_change_sets_dirty_once() {
    let mut sm = RenderStateMachine::default();
    sm.begin_frame();

    sm.apply(InputEvent::Select(Selector::Font, 3)).unwrap();
    let frame = sm.begin_frame();
    assert_eq!(
        frame,
        FrameState {
            state: RenderState::from_values(1, 1, 3).unwrap(),
            rebuild_glyphs: true
        }
    );
    assert!(!sm.begin_frame().rebuild_glyphs);
}

#[test]
fn test_scene_and_style_changes_do_not_rebuild() {
    let mut sm = RenderStateMachine::default();
    sm.begin_frame();
    sm.apply(InputEvent::Select(Selector::Scene, 2)).unwrap();
    sm.apply(InputEvent::Select(Selector::Style, 2)).unwrap();
    assert!(!sm.begin_frame().rebuild_glyphs);
}

#[test]
fn test_transitions_are_memoryless() {
    let mut sm = RenderStateMachine::default();
    assert_eq!(
        sm.apply(InputEvent::Select(Selector::Style, 3)).unwrap(),
        Transition::Changed
    );
    assert_eq!(
        sm.apply(InputEvent::Select(Selector::Style, 3)).unwrap(),
        Transition::Unchanged
    );
    sm.apply(InputEvent::Select(Selector::Style, 1)).unwrap();
    sm.apply(InputEvent::Select(Selector::Style, 3)).unwrap();
    assert_eq!(sm.pending().style, Style::Reserved);
}

#[test]
fn test_reselecting_same_font_is_not_dirty() {
    let mut sm = RenderStateMachine::default();
    sm.begin_frame();
    assert_eq!(
        sm.apply(InputEvent::Select(Selector::Font, 1)).unwrap(),
        Transition::Unchanged
    );
    assert!(!sm.begin_frame().rebuild_glyphs);
}

#[test]
fn test_quit_event() {
    let mut sm = RenderStateMachine::default();
    assert!(!sm.quit_requested());
    assert_eq!(sm.apply(InputEvent::Quit).unwrap(), Transition::Quit);
    assert!(sm.quit_requested());
}

// ============================================================================
// Demo Scene
// ============================================================================

#[test]
fn test_demo_scene_layout() {
    let demo = DemoScene::new();
    let set = demo.patches();
    assert_eq!(set.len(), 10);
    for i in QUADRATIC_RANGE {
        assert_eq!(set.degrees()[i as usize], Degree::Quadratic);
        assert_eq!(set.patches()[i as usize].slots[3], zero());
    }
    for i in CUBIC_RANGE {
        assert_eq!(set.degrees()[i as usize], Degree::Cubic);
    }
    let highlight = HIGHLIGHT_RANGE.start as usize;
    assert_eq!(set.degrees()[highlight], Degree::Quadratic);
    assert_eq!(set.patches()[highlight], set.patches()[0]);
}

#[test]
fn test_demo_ranges_are_disjoint_and_in_bounds() {
    let len = DemoScene::new().patches().len() as u32;
    let ranges = [QUADRATIC_RANGE, CUBIC_RANGE, HIGHLIGHT_RANGE];
    for (i, a) in ranges.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(a.end <= len, "{a:?} outside {len} patches");
        for b in &ranges[i + 1..] {
            assert!(a.end <= b.start || b.end <= a.start, "overlap {a:?} {b:?}");
        }
    }
}

#[test]
fn test_demo_ranges_per_scene() {
    assert_eq!(DemoScene::range(Scene::Quadratic), QUADRATIC_RANGE);
    assert_eq!(DemoScene::range(Scene::Cubic), CUBIC_RANGE);
    assert_eq!(DemoScene::range(Scene::Glyphs), HIGHLIGHT_RANGE);
}

#[test]
fn test_demo_first_patch_coordinates() {
    let demo = DemoScene::new();
    let first = demo.patches().patches()[0];
    assert!((first.slots[0][0] - 0.4).abs() < 1e-6);
    assert!((first.slots[1][0] - 0.8).abs() < 1e-6);
    assert!((first.slots[2][1] + 0.4).abs() < 1e-6);
}

// ============================================================================
// Patch Renderer: frame plans
// ============================================================================

fn plan(scene: u8, style: u8, glyphs: &PatchSet) -> glyphtess_core::FramePlan {
    let demo = DemoScene::new();
    let state = RenderState::from_values(scene, style, 1).unwrap();
    PatchRenderer::new().plan_frame(state, demo.patches(), glyphs, [512, 512])
}

#[test]
fn test_quadratic_scene_draws_quadratic_group() {
    let plan = plan(1, 1, &PatchSet::new());
    assert_eq!(plan.len(), 4);
    for (call, i) in plan.iter().zip(QUADRATIC_RANGE) {
        assert_eq!(call.program, Program::Tessellated);
        assert_eq!(call.primitive, Primitive::Patches);
        assert_eq!(call.geometry, Geometry::Demo);
        assert_eq!(call.instances, i..i + 1);
        assert_eq!(call.uniforms.degree, 2);
        assert_eq!(call.uniforms.scene, 1);
        assert_eq!(call.vertices, 0..Degree::Quadratic.tessellation_segments() + 1);
    }
}

#[test]
fn test_cubic_scene_draws_cubic_group() {
    let plan = plan(2, 1, &PatchSet::new());
    let instances: Vec<u32> = plan.iter().map(|c| c.instances.start).collect();
    assert_eq!(instances, vec![4, 5, 6, 7, 8]);
    assert!(plan.iter().all(|c| c.uniforms.degree == 3));
}

#[test]
fn test_glyph_scene_sets_degree_per_patch() {
    let glyphs = assemble(&[mixed_glyph(1.0), unit_line_glyph()]);
    let plan = plan(3, 1, &glyphs);

    assert_eq!(plan.count(Geometry::Demo, Program::Tessellated), 1);
    let glyph_calls: Vec<_> = plan
        .iter()
        .filter(|c| c.geometry == Geometry::Glyphs)
        .collect();
    assert_eq!(glyph_calls.len(), glyphs.len());
    for (i, call) in glyph_calls.iter().enumerate() {
        assert_eq!(call.instances, i as u32..i as u32 + 1);
        assert_eq!(call.uniforms.degree, glyphs.degree_codes()[i]);
    }
}

#[test]
fn test_glyphs_hidden_outside_glyph_scene() {
    let glyphs = assemble(&[mixed_glyph(1.0)]);
    for scene in [1, 2] {
        let plan = plan(scene, 2, &glyphs);
        assert_eq!(plan.iter().filter(|c| c.geometry == Geometry::Glyphs).count(), 0);
    }
}

#[test]
fn test_glyphs_drawn_once_per_frame() {
    let glyphs = assemble(&[mixed_glyph(1.0)]);
    let plan = plan(3, 1, &glyphs);
    assert_eq!(plan.count(Geometry::Glyphs, Program::Tessellated), glyphs.len());
}

#[test]
fn test_no_overlay_for_curve_and_reserved_styles() {
    let glyphs = assemble(&[mixed_glyph(1.0)]);
    for style in [1, 3] {
        let plan = plan(3, style, &glyphs);
        assert!(plan.iter().all(|c| c.program == Program::Tessellated));
    }
}

#[test]
fn test_quadratic_overlay_passes() {
    let plan = plan(1, 2, &PatchSet::new());
    let plain: Vec<_> = plan.iter().filter(|c| c.program == Program::Plain).collect();

    // 4 polygons, 4 off-curve markers, 8 anchors
    assert_eq!(plain.len(), 16);
    let polygons: Vec<_> = plain
        .iter()
        .filter(|c| c.primitive == Primitive::LineStrip)
        .collect();
    assert_eq!(polygons.len(), 4);
    assert_eq!(polygons[1].vertices, 4..7);
    assert!(polygons.iter().all(|c| c.uniforms.blend == CONTROL_BLEND));

    let off: Vec<_> = plain
        .iter()
        .filter(|c| c.primitive == Primitive::Points && c.uniforms.blend == CONTROL_BLEND)
        .map(|c| c.vertices.clone())
        .collect();
    assert_eq!(off, vec![1..2, 5..6, 9..10, 13..14]);

    let on: Vec<_> = plain
        .iter()
        .filter(|c| c.primitive == Primitive::Points && c.uniforms.blend == ANCHOR_BLEND)
        .map(|c| c.vertices.start)
        .collect();
    assert_eq!(on, vec![0, 2, 4, 6, 8, 10, 12, 14]);
}

#[test]
fn test_cubic_overlay_marks_both_control_points() {
    let plan = plan(2, 2, &PatchSet::new());
    let off: Vec<u32> = plan
        .iter()
        .filter(|c| c.primitive == Primitive::Points && c.uniforms.blend == CONTROL_BLEND)
        .map(|c| c.vertices.start)
        .collect();
    assert_eq!(off[..2], [17, 18]);
    assert_eq!(off.len(), 10);

    let on: Vec<u32> = plan
        .iter()
        .filter(|c| c.primitive == Primitive::Points && c.uniforms.blend == ANCHOR_BLEND)
        .map(|c| c.vertices.start)
        .collect();
    assert_eq!(on[..2], [16, 19]);

    let polygon = plan
        .iter()
        .find(|c| c.primitive == Primitive::LineStrip)
        .unwrap();
    assert_eq!(polygon.vertices, 16..20);
}

#[test]
fn test_overlay_precedes_demo_curves() {
    let plan = plan(1, 2, &PatchSet::new());
    let first_curve = plan
        .iter()
        .position(|c| c.program == Program::Tessellated)
        .unwrap();
    assert!(plan.calls[..first_curve]
        .iter()
        .all(|c| c.program == Program::Plain));
    assert_eq!(first_curve, 16);
}

#[test]
fn test_glyph_overlay_skips_degree_zero() {
    let g = Glyph::new(
        vec![vec![
            Segment::point(p(0.0, 0.0)),
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
        ]],
        1.0,
    );
    let glyphs = assemble(&[g]);
    let plan = plan(3, 2, &glyphs);
    let glyph_plain: Vec<_> = plan
        .iter()
        .filter(|c| c.geometry == Geometry::Glyphs && c.program == Program::Plain)
        .collect();

    // line: one polygon, no off-curve marker, two anchors
    assert_eq!(glyph_plain.len(), 3);
    assert!(glyph_plain.iter().all(|c| c.vertices.start >= 4));
}

#[test]
fn test_glyph_overlay_follows_glyph_curves() {
    let glyphs = assemble(&[mixed_glyph(1.0)]);
    let plan = plan(3, 2, &glyphs);
    let last_glyph_curve = plan
        .iter()
        .rposition(|c| c.geometry == Geometry::Glyphs && c.program == Program::Tessellated)
        .unwrap();
    let first_glyph_plain = plan
        .iter()
        .position(|c| c.geometry == Geometry::Glyphs && c.program == Program::Plain)
        .unwrap();
    assert!(last_glyph_curve < first_glyph_plain);
}

#[test]
fn test_glyph_scene_overlay_skips_highlight_patch() {
    let glyphs = assemble(&[mixed_glyph(1.0)]);
    let plan = plan(3, 2, &glyphs);
    assert_eq!(plan.count(Geometry::Demo, Program::Plain), 0);
    let highlight: Vec<_> = plan
        .iter()
        .filter(|c| c.geometry == Geometry::Demo)
        .collect();
    assert_eq!(highlight.len(), 1);
    assert_eq!(highlight[0].instances, HIGHLIGHT_RANGE);
    assert!(plan.count(Geometry::Glyphs, Program::Plain) > 0);
}

#[test]
fn test_empty_glyph_set_plans_nothing_for_glyphs() {
    let plan = plan(3, 2, &PatchSet::new());
    assert_eq!(plan.iter().filter(|c| c.geometry == Geometry::Glyphs).count(), 0);
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn test_fit_centers_bounds() {
    let g = Glyph::new(
        vec![vec![Segment::line(p(0.0, 0.0), p(4.0, 1.0))]],
        4.0,
    );
    let set = assemble(&[g]);
    let placement = Placement::fit(set.bounds(), [800, 400]);
    let [cx, cy] = placement.apply([2.0, 0.5]);
    assert!(cx.abs() < 1e-5 && cy.abs() < 1e-5);

    let [left, _] = placement.apply([0.0, 0.0]);
    let [right, _] = placement.apply([4.0, 0.0]);
    assert!(left >= -1.0 && right <= 1.0);
    // equal pixel scale on both axes
    assert!((placement.scale[1] / placement.scale[0] - 2.0).abs() < 1e-5);
}

#[test]
fn test_fit_without_bounds_is_identity() {
    assert_eq!(Placement::fit(None, [512, 512]), Placement::IDENTITY);
}

#[test]
fn test_placement_uniform_layout() {
    let pl = Placement::new([2.0, 3.0], [0.5, -0.5]);
    assert_eq!(pl.to_uniform(), [2.0, 3.0, 0.5, -0.5]);
    assert_eq!(std::mem::size_of::<glyphtess_core::DrawUniforms>(), 32);
}
