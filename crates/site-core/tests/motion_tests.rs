// Host-side tests for the slide motion state machine. Pointer input is fed
// as plain coordinates and timestamps; no browser is involved.

use site_core::{
    accel_for_speed, commit_duration, default_duration, Commit, Edge, Geometry, ItemRect,
    MotionConfig, MotionController, Orientation, Phase,
};

fn track(container: f32, widths: &[f32]) -> Geometry {
    let mut left = 0.0;
    let items: Vec<ItemRect> = widths
        .iter()
        .map(|&width| {
            let rect = ItemRect { left, width };
            left += width;
            rect
        })
        .collect();
    Geometry::new(container, left, items)
}

/// 1000px track in a 300px container: limit -700, step 100, threshold 50.
fn standard_slider() -> MotionController {
    let mut c = MotionController::new(MotionConfig::default());
    c.relayout(track(300.0, &[250.0; 4]), Orientation::Portrait);
    c
}

fn per_screen_slider(container: f32, count: usize) -> MotionController {
    let mut c = MotionController::new(MotionConfig {
        per_screen: true,
        ..MotionConfig::default()
    });
    let widths = vec![container; count];
    c.relayout(track(container, &widths), Orientation::Portrait);
    c
}

/// One full gesture: down at a fixed point, a single move by `dx`, release
/// after `elapsed_ms`.
fn drag(c: &mut MotionController, dx: f32, elapsed_ms: f64) -> Option<Commit> {
    c.pointer_down(200.0, 50.0, 0.0);
    c.pointer_move(200.0 + dx, 50.0);
    c.release(elapsed_ms, Orientation::Portrait)
}

#[test]
fn slow_short_drag_commits_one_step() {
    let mut c = standard_slider();
    // 80px in 1s is 0.08 px/ms, well under the first acceleration tier.
    let commit = drag(&mut c, -80.0, 1000.0).unwrap();
    assert!(commit.committed);
    assert_eq!(commit.plan.accel, 1);
    assert_eq!(commit.offset, -100.0);
    assert_eq!(c.offset(), -100.0);
    assert_eq!(c.phase(), Phase::Animating);
}

#[test]
fn fast_long_drag_snaps_whole_steps_then_accelerates() {
    let mut c = standard_slider();
    // 120px in 160ms is 0.75 px/ms: tier 3. One whole step of snap for the
    // overshoot plus one triple-length step.
    let commit = drag(&mut c, -120.0, 160.0).unwrap();
    assert_eq!(commit.plan.accel, 3);
    assert_eq!(commit.offset, -400.0);
    assert_eq!(commit.limit, None);
}

#[test]
fn commit_near_limit_clamps_and_notifies_right_edge() {
    let mut c = standard_slider();
    let setup = c.move_to(-650.0, Orientation::Portrait);
    assert_eq!(setup.limit, None);
    c.transition_end();

    let commit = drag(&mut c, -100.0, 1000.0).unwrap();
    assert_eq!(commit.offset, -700.0);
    assert_eq!(commit.limit, Some(Edge::Right));
}

#[test]
fn drag_past_start_clamps_and_notifies_left_edge() {
    let mut c = standard_slider();
    let commit = drag(&mut c, 80.0, 1000.0).unwrap();
    assert_eq!(commit.offset, 0.0);
    assert_eq!(commit.limit, Some(Edge::Left));
}

#[test]
fn below_threshold_release_reverts_to_committed_offset() {
    let mut c = standard_slider();
    drag(&mut c, -80.0, 1000.0);
    c.transition_end();

    let commit = drag(&mut c, -30.0, 200.0).unwrap();
    assert!(!commit.committed);
    assert_eq!(commit.offset, -100.0);
    assert_eq!(c.offset(), -100.0);
}

#[test]
fn committed_offsets_stay_within_range_across_sequences() {
    let mut c = standard_slider();
    for dx in [-300.0, -300.0, -300.0, -300.0, 500.0, 500.0, -80.0, 120.0] {
        if drag(&mut c, dx, 100.0).is_some() {
            c.transition_end();
        }
        assert!(c.offset() <= 0.0, "offset {} above 0", c.offset());
        assert!(c.offset() >= -700.0, "offset {} below limit", c.offset());
    }
}

#[test]
fn acceleration_tiers_follow_speed_bands() {
    assert_eq!(accel_for_speed(0.0), 1);
    assert_eq!(accel_for_speed(0.29), 1);
    assert_eq!(accel_for_speed(0.3), 2);
    assert_eq!(accel_for_speed(0.59), 2);
    assert_eq!(accel_for_speed(0.6), 3);
    assert_eq!(accel_for_speed(0.99), 3);
    assert_eq!(accel_for_speed(1.0), 4);
    assert_eq!(accel_for_speed(5.0), 4);
}

#[test]
fn duration_table_keys_on_orientation_and_tier() {
    assert_eq!(commit_duration(3, Orientation::Landscape), 0.3);
    assert_eq!(commit_duration(2, Orientation::Landscape), 0.4);
    assert_eq!(commit_duration(4, Orientation::Portrait), 0.2);
    assert_eq!(commit_duration(1, Orientation::Portrait), 0.3);
    assert_eq!(default_duration(Orientation::Landscape), 0.3);
    assert_eq!(default_duration(Orientation::Portrait), 0.2);
}

#[test]
fn rubber_band_damps_live_follow_past_the_start() {
    let mut c = standard_slider();
    c.pointer_down(200.0, 50.0, 0.0);
    let follow = c.pointer_move(230.0, 50.0).unwrap();
    assert_eq!(follow.offset, 10.0);
    assert!(follow.suppress_scroll);

    // The damped displacement never sticks: releasing under the threshold
    // leaves the committed offset untouched.
    let commit = c.release(100.0, Orientation::Portrait).unwrap();
    assert!(!commit.committed);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn live_follow_is_undamped_inside_the_range() {
    let mut c = standard_slider();
    drag(&mut c, -100.0, 1000.0);
    c.transition_end();

    c.pointer_down(200.0, 50.0, 0.0);
    let follow = c.pointer_move(170.0, 50.0).unwrap();
    assert_eq!(follow.offset, -130.0);
}

#[test]
fn vertical_gestures_classify_as_scroll_and_stay_scroll() {
    let mut c = standard_slider();
    c.pointer_down(200.0, 50.0, 0.0);
    assert!(c.pointer_move(200.0, 90.0).is_none());
    // Horizontal movement now dominates, but classification is sticky.
    assert!(c.pointer_move(290.0, 91.0).is_none());
    assert!(c.release(500.0, Orientation::Portrait).is_none());
    assert_eq!(c.offset(), 0.0);
    assert_eq!(c.phase(), Phase::Idle);
}

#[test]
fn sub_classification_movement_stays_undetermined() {
    let mut c = standard_slider();
    c.pointer_down(200.0, 50.0, 0.0);
    assert!(c.pointer_move(203.0, 54.0).is_none());
    assert!(c.release(300.0, Orientation::Portrait).is_none());
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn relayout_is_idempotent_for_unchanged_metrics() {
    let mut c = standard_slider();
    drag(&mut c, -80.0, 1000.0);
    c.transition_end();

    let first = c.relayout(track(300.0, &[250.0; 4]), Orientation::Portrait);
    let p1 = c.params();
    let second = c.relayout(track(300.0, &[250.0; 4]), Orientation::Portrait);
    let p2 = c.params();
    assert_eq!(first, second);
    assert_eq!(p1.current_x, p2.current_x);
    assert_eq!(p1.limit_x, p2.limit_x);
    assert_eq!(p1.step, p2.step);
}

#[test]
fn short_track_disables_sliding_and_pins_offset() {
    let mut c = MotionController::new(MotionConfig::default());
    c.relayout(track(300.0, &[100.0, 100.0]), Orientation::Portrait);
    let params = c.params();
    assert!(!params.active);
    assert_eq!(params.current_x, 0.0);
    assert_eq!(params.limit_x, 0.0);

    // Gestures are ignored entirely while inactive.
    c.pointer_down(200.0, 50.0, 0.0);
    assert!(c.pointer_move(120.0, 50.0).is_none());
    assert!(c.release(100.0, Orientation::Portrait).is_none());
}

#[test]
fn relayout_interrupts_an_inflight_animation() {
    let mut c = standard_slider();
    drag(&mut c, -80.0, 1000.0);
    assert_eq!(c.phase(), Phase::Animating);

    c.relayout(track(300.0, &[250.0; 4]), Orientation::Portrait);
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.offset(), -100.0);
}

#[test]
fn pointer_down_interrupts_an_inflight_animation() {
    let mut c = standard_slider();
    drag(&mut c, -80.0, 1000.0);
    assert_eq!(c.phase(), Phase::Animating);

    // The next gesture starts from the committed target.
    let commit = drag(&mut c, -80.0, 1000.0).unwrap();
    assert_eq!(commit.offset, -200.0);
}

#[test]
fn landscape_relayout_clamps_an_out_of_range_offset() {
    let mut c = standard_slider();
    for _ in 0..4 {
        drag(&mut c, -300.0, 100.0);
        c.transition_end();
    }
    assert_eq!(c.offset(), -700.0);

    // The wider landscape container shrinks the usable range, leaving the
    // old offset stranded past the new limit.
    let offset = c.relayout(track(400.0, &[250.0; 4]), Orientation::Landscape);
    assert_eq!(offset, -600.0);
    assert_eq!(c.params().limit_x, -600.0);
}

#[test]
fn per_screen_commits_move_exactly_one_screen() {
    let mut c = per_screen_slider(300.0, 4);
    assert_eq!(c.params().step, 300.0);
    assert_eq!(c.params().limit_x, -900.0);

    // Acceleration never applies per-screen, whatever the speed.
    let commit = drag(&mut c, -200.0, 50.0).unwrap();
    assert_eq!(commit.plan.accel, 1);
    assert_eq!(commit.offset, -300.0);
    assert_eq!(c.index(), 1);
    c.transition_end();

    for expected_index in [2, 3] {
        drag(&mut c, -200.0, 1000.0);
        c.transition_end();
        assert_eq!(c.index(), expected_index);
        assert_eq!(c.offset(), -300.0 * expected_index as f32);
    }

    // Pushing past the last screen clamps and keeps the index in bounds.
    let commit = drag(&mut c, -200.0, 1000.0).unwrap();
    assert_eq!(commit.limit, Some(Edge::Right));
    assert_eq!(c.index(), 3);
    assert_eq!(c.offset(), -900.0);
}

#[test]
fn per_screen_index_never_drops_below_zero() {
    let mut c = per_screen_slider(300.0, 4);
    let commit = drag(&mut c, 200.0, 1000.0).unwrap();
    assert_eq!(commit.limit, Some(Edge::Left));
    assert_eq!(c.index(), 0);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn per_screen_relayout_recomputes_offset_from_index() {
    let mut c = per_screen_slider(300.0, 4);
    for _ in 0..2 {
        drag(&mut c, -200.0, 1000.0);
        c.transition_end();
    }
    assert_eq!(c.index(), 2);

    // New container width; items are re-measured at the new screen size.
    c.relayout(track(400.0, &[400.0; 4]), Orientation::Portrait);
    assert_eq!(c.params().step, 400.0);
    assert_eq!(c.offset(), -800.0);
    assert_eq!(c.index(), 2);
}

#[test]
fn manual_right_walks_item_edges_until_the_limit() {
    let mut c = standard_slider();
    let commit = c.step_right(Orientation::Portrait).unwrap();
    assert_eq!(commit.offset, -250.0);
    assert_eq!(commit.plan.accel, 1);
    c.transition_end();

    let commit = c.step_right(Orientation::Portrait).unwrap();
    assert_eq!(commit.offset, -500.0);
    c.transition_end();

    let commit = c.step_right(Orientation::Portrait).unwrap();
    assert_eq!(commit.offset, -700.0);
    assert_eq!(commit.limit, Some(Edge::Right));
    c.transition_end();

    assert!(c.step_right(Orientation::Portrait).is_none());
}

#[test]
fn manual_left_aligns_partial_item_before_stepping_back() {
    let mut c = standard_slider();
    drag(&mut c, -100.0, 1000.0);
    c.transition_end();

    // First click squares up the partially scrolled item.
    let commit = c.step_left(Orientation::Portrait).unwrap();
    assert_eq!(commit.offset, 0.0);
    assert_eq!(commit.limit, None);
    c.transition_end();

    assert!(c.step_left(Orientation::Portrait).is_none());
}

#[test]
fn move_to_clamps_inclusively_at_the_right_limit() {
    let mut c = standard_slider();
    let commit = c.move_to(-900.0, Orientation::Portrait);
    assert_eq!(commit.offset, -700.0);
    assert_eq!(commit.limit, Some(Edge::Right));
    c.transition_end();

    let commit = c.move_to(0.0, Orientation::Portrait);
    assert_eq!(commit.offset, 0.0);
    assert_eq!(commit.limit, None);
}

#[test]
fn jump_to_index_places_and_clamps() {
    let mut c = standard_slider();
    assert_eq!(c.jump_to_index(2), -500.0);
    // The last item's left edge lies past the limit.
    assert_eq!(c.jump_to_index(3), -700.0);
    assert_eq!(c.jump_to_index(99), -700.0);
}

#[test]
fn transition_end_outside_animation_is_a_noop() {
    let mut c = standard_slider();
    c.transition_end();
    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.offset(), 0.0);
}
