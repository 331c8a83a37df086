//! End-to-end Draggable tests driven by the gesture robot.

use std::cell::RefCell;
use std::rc::Rc;

use pincer_core::{Point, Rect, Size};
use pincer_foundation::{BoundaryPolicy, DropTarget, DropTargetRegistry};
use pincer_testing::{Counter, CountingHaptics, GestureRobot, RecordingRenderer};
use pincer_ui::{ControllerPorts, Draggable, DraggableCallbacks, DraggableConfig};

fn bounded_config() -> DraggableConfig {
    DraggableConfig {
        element_size: Size::new(100.0, 100.0),
        bounds: Some(BoundaryPolicy {
            left: Some(0.0),
            top: Some(0.0),
            right: Some(300.0),
            bottom: Some(300.0),
            resistance: 0.5,
            max_overflow: 40.0,
        }),
        ..DraggableConfig::default()
    }
}

#[test]
fn settled_translation_respects_bounds_for_any_displacement() {
    for target_x in [1_000.0, 10_000.0, -5_000.0] {
        let drag = Draggable::new(bounded_config(), DraggableCallbacks::default());
        let mut robot = GestureRobot::new(drag);
        robot.drag(1, Point::new(50.0, 50.0), Point::new(target_x, 50.0), 10);
        let settled = robot.settle();
        // x range is [left, right - width] = [0, 200].
        assert!(
            (0.0..=200.0).contains(&settled.translate_x),
            "displacement to {target_x} settled out of bounds at {}",
            settled.translate_x
        );
    }
}

#[test]
fn overflow_is_resisted_while_dragging_and_clamped_after() {
    let drag = Draggable::new(bounded_config(), DraggableCallbacks::default());
    let mut robot = GestureRobot::new(drag);
    robot.press(1, Point::new(50.0, 50.0));
    robot.drag_segment(1, Point::new(50.0, 50.0), Point::new(1_000.0, 50.0), 10);
    let live = robot.transform().translate_x;
    assert!(live > 200.0, "live drag should overflow the bound, got {live}");
    assert!(live <= 240.0, "overflow must be capped, got {live}");

    robot.release(1, Point::new(1_000.0, 50.0));
    assert_eq!(robot.settle().translate_x, 200.0);
}

#[test]
fn snap_resolution_is_deterministic() {
    let cases = [
        (40.0, Some(0.0)),
        (60.0, Some(100.0)),
        (200.0, None), // out of threshold: keeps the free position
    ];
    for (release_x, snapped) in cases {
        let config = DraggableConfig {
            element_size: Size::new(10.0, 10.0),
            snap_points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            snap_threshold: 50.0,
            ..DraggableConfig::default()
        };
        let drag = Draggable::new(config, DraggableCallbacks::default());
        let mut robot = GestureRobot::new(drag);
        robot.drag(1, Point::new(0.0, 0.0), Point::new(release_x, 0.0), 8);
        let settled = robot.settle();
        let expected = snapped.unwrap_or(release_x);
        assert!(
            (settled.translate_x - expected).abs() < 0.5,
            "release at {release_x} settled at {}, expected {expected}",
            settled.translate_x
        );
        assert_eq!(settled.translate_y, 0.0);
    }
}

#[test]
fn drop_target_wins_over_snap_and_fires_once() {
    let drops = Counter::new();
    let dropped_payload = Rc::new(RefCell::new(None));
    let registry = Rc::new(RefCell::new(DropTargetRegistry::new()));
    {
        let drops = drops.clone();
        let dropped_payload = dropped_payload.clone();
        registry.borrow_mut().register(
            DropTarget::new(7, Rect::new(150.0, 0.0, 100.0, 100.0))
                .with_snap_on_drop(true)
                .with_on_drop(move |payload| {
                    drops.increment();
                    *dropped_payload.borrow_mut() = Some(*payload);
                }),
        );
    }

    let released = Rc::new(RefCell::new(Vec::new()));
    let callbacks = DraggableCallbacks {
        on_drag_release: Some(Box::new({
            let released = released.clone();
            move |dropped| released.borrow_mut().push(dropped)
        })),
        ..DraggableCallbacks::default()
    };
    let config = DraggableConfig {
        element_size: Size::new(20.0, 20.0),
        // A snap point also in range; the drop target must take precedence.
        snap_points: vec![Point::new(0.0, 0.0)],
        snap_threshold: 1_000.0,
        source_id: 5,
        ..DraggableConfig::default()
    };
    let haptics = CountingHaptics::new();
    let drag = Draggable::new(config, callbacks)
        .with_drop_targets(registry)
        .with_ports(ControllerPorts::default().with_haptics(Rc::new(haptics.clone())));

    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(10.0, 10.0), Point::new(200.0, 10.0), 8);
    let settled = robot.settle();

    // Element center aligned with the target center (200, 50).
    assert!((settled.translate_x - 190.0).abs() < 0.5);
    assert!((settled.translate_y - 40.0).abs() < 0.5);
    assert_eq!(drops.count(), 1);
    assert_eq!(*released.borrow(), vec![true]);
    let payload = dropped_payload.borrow().unwrap();
    assert_eq!(payload.source, 5);
    // One pulse entering the target, one for the drop itself.
    assert_eq!(haptics.pulses(), 2);
}

#[test]
fn target_enter_haptic_fires_once_per_entry_not_per_move() {
    let registry = Rc::new(RefCell::new(DropTargetRegistry::new()));
    registry
        .borrow_mut()
        .register(DropTarget::new(1, Rect::new(100.0, 0.0, 200.0, 200.0)));

    let haptics = CountingHaptics::new();
    let drag = Draggable::new(
        DraggableConfig {
            element_size: Size::new(20.0, 20.0),
            ..DraggableConfig::default()
        },
        DraggableCallbacks::default(),
    )
    .with_drop_targets(registry)
    .with_ports(ControllerPorts::default().with_haptics(Rc::new(haptics.clone())));

    let mut robot = GestureRobot::new(drag);
    robot.press(1, Point::new(10.0, 10.0));
    // Wander inside the target across many samples.
    robot.drag_segment(1, Point::new(10.0, 10.0), Point::new(150.0, 100.0), 6);
    robot.drag_segment(1, Point::new(150.0, 100.0), Point::new(250.0, 100.0), 6);
    assert_eq!(haptics.pulses(), 1);

    // Leave and re-enter: exactly one more pulse.
    robot.drag_segment(1, Point::new(250.0, 100.0), Point::new(10.0, 10.0), 6);
    robot.drag_segment(1, Point::new(10.0, 10.0), Point::new(150.0, 100.0), 6);
    robot.release(1, Point::new(150.0, 100.0));
    assert_eq!(haptics.pulses(), 3); // second entry + the drop pulse
}

#[test]
fn gravity_drifts_to_the_bottom_bound_after_the_delay() {
    let config = DraggableConfig {
        apply_gravity: true,
        gravity_delay_ms: 500,
        ..bounded_config()
    };
    let drag = Draggable::new(config, DraggableCallbacks::default());
    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(10.0, 10.0), Point::new(60.0, 60.0), 5);
    let rested = robot.settle();
    assert_eq!(rested.translate_y, 50.0);

    // Let the gravity delay lapse, then settle the drift.
    robot.advance_frames(40);
    let settled = robot.settle();
    assert_eq!(settled.translate_x, 50.0);
    // y floor is bottom - height = 200.
    assert_eq!(settled.translate_y, 200.0);
}

#[test]
fn new_grant_cancels_pending_gravity() {
    let config = DraggableConfig {
        apply_gravity: true,
        gravity_delay_ms: 500,
        ..bounded_config()
    };
    let drag = Draggable::new(config, DraggableCallbacks::default());
    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(10.0, 10.0), Point::new(60.0, 60.0), 5);
    robot.settle();

    // Grab the element again before the delay lapses and hold it.
    robot.press(1, Point::new(60.0, 60.0));
    robot.advance_frames(60);
    assert_eq!(robot.transform().translate_y, 50.0);
    robot.release(1, Point::new(60.0, 60.0));
}

#[test]
fn double_release_does_not_double_fire() {
    let releases = Counter::new();
    let callbacks = DraggableCallbacks {
        on_drag_release: Some(Box::new({
            let mut hook = releases.hook();
            move |_| hook()
        })),
        ..DraggableCallbacks::default()
    };
    let drag = Draggable::new(bounded_config(), callbacks);
    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(50.0, 50.0), Point::new(150.0, 50.0), 5);
    // Defensive double release.
    robot.release(1, Point::new(150.0, 50.0));
    robot.settle();
    assert_eq!(releases.count(), 1);
}

#[test]
fn panicking_callback_leaves_the_controller_usable() {
    let callbacks = DraggableCallbacks {
        on_drag_release: Some(Box::new(|_| panic!("host bug"))),
        ..DraggableCallbacks::default()
    };
    let drag = Draggable::new(bounded_config(), callbacks);
    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(50.0, 50.0), Point::new(150.0, 50.0), 5);
    robot.settle();
    assert!(!robot.controller().is_dragging());

    // The next gesture still works.
    robot.drag(1, Point::new(50.0, 50.0), Point::new(90.0, 50.0), 5);
    let settled = robot.settle();
    assert!(settled.translate_x > 100.0);
}

#[test]
fn renderer_port_sees_every_mutation() {
    let renderer = RecordingRenderer::new();
    let drag = Draggable::new(
        DraggableConfig::default(),
        DraggableCallbacks::default(),
    )
    .with_ports(ControllerPorts::default().with_renderer(renderer.clone()));
    let mut robot = GestureRobot::new(drag);
    robot.drag(1, Point::new(0.0, 0.0), Point::new(80.0, 0.0), 8);
    let settled = robot.settle();
    assert!(!renderer.applied().is_empty());
    assert_eq!(renderer.last().unwrap(), settled);
}
