//! End-to-end SwipeAction tests driven by the gesture robot.

use std::rc::Rc;

use pincer_core::Point;
use pincer_testing::{Counter, CountingHaptics, GestureRobot};
use pincer_ui::{
    ControllerPorts, SwipeAction, SwipeActionConfig, SwipeActionItem, SwipeSide,
};

fn one_right_action(counter: &Counter) -> SwipeAction {
    SwipeAction::new(
        SwipeActionConfig {
            action_width: 80.0,
            friction: 0.8,
            ..SwipeActionConfig::default()
        },
        Vec::new(),
        vec![SwipeActionItem::new(counter.hook())],
    )
}

#[test]
fn release_past_half_width_triggers_the_action_exactly_once() {
    let presses = Counter::new();
    let haptics = CountingHaptics::new();
    let row = one_right_action(&presses)
        .with_ports(ControllerPorts::default().with_haptics(Rc::new(haptics.clone())));
    let mut robot = GestureRobot::new(row);

    robot.drag(1, Point::new(200.0, 100.0), Point::new(110.0, 100.0), 5);
    let settled = robot.settle();

    assert_eq!(presses.count(), 1);
    assert_eq!(haptics.pulses(), 1);
    // reset_after_action snaps the row shut again.
    assert_eq!(settled.translate_x, 0.0);
    assert!(!robot.controller().is_open());
}

#[test]
fn short_slow_release_springs_back_without_firing() {
    let presses = Counter::new();
    let row = one_right_action(&presses);
    let mut robot = GestureRobot::new(row);

    // 30px over 10 frames is well under the velocity threshold.
    robot.drag(1, Point::new(200.0, 100.0), Point::new(170.0, 100.0), 10);
    let settled = robot.settle();

    assert_eq!(presses.count(), 0);
    assert_eq!(settled.translate_x, 0.0);
}

#[test]
fn fast_flick_reveals_the_first_action_group_without_firing() {
    let presses = Counter::new();
    let row = one_right_action(&presses);
    let mut robot = GestureRobot::new(row);

    // Same 30px but in two frames: ~940 px/s.
    robot.drag(1, Point::new(200.0, 100.0), Point::new(170.0, 100.0), 2);
    let settled = robot.settle();

    assert_eq!(presses.count(), 0);
    assert_eq!(settled.translate_x, -80.0);
    assert!(robot.controller().is_open());
}

#[test]
fn furthest_activated_action_fires_and_row_holds_open() {
    let near = Counter::new();
    let far = Counter::new();
    let row = SwipeAction::new(
        SwipeActionConfig {
            action_width: 80.0,
            reset_after_action: false,
            ..SwipeActionConfig::default()
        },
        Vec::new(),
        vec![SwipeActionItem::new(near.hook()), SwipeActionItem::new(far.hook())],
    );
    let mut robot = GestureRobot::new(row);

    robot.drag(1, Point::new(300.0, 100.0), Point::new(100.0, 100.0), 6);
    let settled = robot.settle();

    assert_eq!(near.count(), 0, "only the furthest action fires");
    assert_eq!(far.count(), 1);
    // Held open at the full two-action extent.
    assert_eq!(settled.translate_x, -160.0);
    assert!(robot.controller().is_open());
}

#[test]
fn tapping_a_revealed_button_fires_it_directly() {
    let presses = Counter::new();
    let row = SwipeAction::new(
        SwipeActionConfig {
            reset_after_action: false,
            ..SwipeActionConfig::default()
        },
        Vec::new(),
        vec![SwipeActionItem::new(presses.hook())],
    );
    let mut robot = GestureRobot::new(row);
    // Reveal without activating (fast flick).
    robot.drag(1, Point::new(200.0, 100.0), Point::new(170.0, 100.0), 2);
    robot.settle();
    assert_eq!(presses.count(), 0);

    robot.controller_mut().press_action(SwipeSide::Right, 0);
    assert_eq!(presses.count(), 1);
}

#[test]
fn vertical_motion_never_moves_the_row() {
    let presses = Counter::new();
    let row = one_right_action(&presses);
    let mut robot = GestureRobot::new(row);

    robot.drag(1, Point::new(100.0, 100.0), Point::new(95.0, 300.0), 8);
    let settled = robot.settle();
    assert_eq!(settled.translate_x, 0.0);
    assert_eq!(presses.count(), 0);
}

#[test]
fn reveal_travel_is_clamped_with_friction_beyond_the_extent() {
    let presses = Counter::new();
    let row = one_right_action(&presses);
    let mut robot = GestureRobot::new(row);

    robot.press(1, Point::new(400.0, 100.0));
    robot.drag_segment(1, Point::new(400.0, 100.0), Point::new(0.0, 100.0), 8);
    let live = robot.transform().translate_x;
    // Extent is one action (80); friction 0.8 dampens the remaining 320px of
    // travel, capped at half an action width.
    assert!(live < -80.0 && live >= -120.0, "live offset {live}");
    robot.release(1, Point::new(0.0, 100.0));
    robot.settle();
    assert_eq!(presses.count(), 1);
}

#[test]
fn double_release_does_not_double_fire() {
    let presses = Counter::new();
    let row = one_right_action(&presses);
    let mut robot = GestureRobot::new(row);
    robot.drag(1, Point::new(200.0, 100.0), Point::new(110.0, 100.0), 5);
    robot.release(1, Point::new(110.0, 100.0));
    robot.settle();
    assert_eq!(presses.count(), 1);
}
