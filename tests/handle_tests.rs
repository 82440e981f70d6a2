use chainlash::{Bounds, HandleController, Vec2};
use chainlash::vec::Vec as _;

const DT: f32 = 1.0 / 120.0;

fn arena() -> Bounds<f32> {
    Bounds::from_size(1280.0, 720.0)
}

#[test]
fn handle_settles_on_still_pointer() {
    let bounds = arena();
    let mut handle = HandleController::new(Vec2::new(640.0, 360.0));
    handle.sample(500.0, 300.0, 0.0, &bounds);

    for _ in 0..600 {
        handle.update(DT, 1.04, &bounds);
    }
    assert!(handle.position().distance(Vec2::new(500.0, 300.0)) < 1.0);
}

#[test]
fn sharp_reversal_triggers_turn_snap() {
    let bounds = arena();
    let mut handle = HandleController::new(Vec2::new(640.0, 360.0));
    handle.sample(400.0, 300.0, 0.0, &bounds);
    handle.sample(420.0, 300.0, 0.016, &bounds);
    assert_eq!(handle.turn_snap(), 0.0);

    handle.sample(400.0, 300.0, 0.032, &bounds);
    // dot = -1, severity clamps at 0.5
    assert!((handle.turn_snap() - 0.5).abs() < 1e-5);

    let toward_pointer = (Vec2::new(400.0f32, 300.0) - Vec2::new(640.0, 360.0)).normalize();
    assert!(handle.turn_direction().dot(toward_pointer) > 0.999);

    let step = handle.update(DT, 1.04, &bounds);
    let kick = step.snap_kick.expect("snap kick while turn-snap is active");
    assert!(kick.dot(toward_pointer) > 0.0);
}

#[test]
fn gentle_curve_does_not_snap() {
    let bounds = arena();
    let mut handle = HandleController::new(Vec2::new(400.0, 300.0));
    handle.sample(400.0, 300.0, 0.0, &bounds);
    handle.sample(420.0, 300.0, 0.016, &bounds);
    handle.sample(440.0, 305.0, 0.032, &bounds);
    assert_eq!(handle.turn_snap(), 0.0);
    assert!(handle.update(DT, 1.04, &bounds).snap_kick.is_none());
}

#[test]
fn turn_snap_decays_away() {
    let bounds = arena();
    let mut handle = HandleController::new(Vec2::new(400.0, 300.0));
    handle.sample(400.0, 300.0, 0.0, &bounds);
    handle.sample(420.0, 300.0, 0.016, &bounds);
    handle.sample(400.0, 300.0, 0.032, &bounds);

    for _ in 0..120 {
        handle.update(DT, 1.04, &bounds);
    }
    assert!(handle.turn_snap() < 0.01);
}

#[test]
fn handle_stays_inside_inset() {
    let bounds = arena();
    let mut handle = HandleController::new(Vec2::new(640.0, 360.0));
    handle.sample(640.0, 360.0, 0.0, &bounds);
    handle.sample(-500.0, -500.0, 0.05, &bounds);
    assert_eq!(handle.pointer_position(), Vec2::new(0.0, 0.0));

    for _ in 0..600 {
        handle.update(DT, 1.6, &bounds);
        let p = handle.position();
        assert!(p.x >= 12.0 && p.y >= 12.0);
        assert!(p.x <= 1268.0 && p.y <= 708.0);
    }
}

#[test]
fn recoil_push_changes_velocity() {
    let mut handle = HandleController::new(Vec2::new(640.0, 360.0));
    handle.push(Vec2::new(-20.0, 0.0));
    assert_eq!(handle.velocity(), Vec2::new(-20.0, 0.0));
}
