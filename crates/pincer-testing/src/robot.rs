//! The gesture robot: scripted input against a controller.

use pincer_core::{Point, Transform};
use pincer_ui::GestureTarget;

/// Frame cadence used by the robot, ~60fps.
pub const FRAME_MS: u64 = 16;

/// Number of identical consecutive frames after which the robot considers
/// the transform settled.
const SETTLE_FRAMES: usize = 3;

/// Drives a gesture controller with synthetic pointer sequences and frames.
///
/// The robot owns a virtual clock that only advances when asked to, so every
/// run is reproducible. All interactions record the transform after each
/// frame for later inspection.
///
/// # Example
///
/// ```ignore
/// let mut robot = GestureRobot::new(draggable);
/// robot.drag(1, Point::new(10.0, 10.0), Point::new(200.0, 10.0), 8);
/// let settled = robot.settle();
/// assert!(settled.translate_x <= 220.0);
/// ```
pub struct GestureRobot<C: GestureTarget> {
    controller: C,
    now_ms: u64,
    frames: Vec<Transform>,
}

impl<C: GestureTarget> GestureRobot<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            now_ms: 0,
            frames: Vec::new(),
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn transform(&self) -> Transform {
        self.controller.current_transform()
    }

    /// Every transform recorded so far, one per pumped frame.
    pub fn recorded_frames(&self) -> &[Transform] {
        &self.frames
    }

    /// Advance the clock one frame and let the controller animate.
    pub fn tick(&mut self) {
        self.now_ms += FRAME_MS;
        self.controller.frame(self.now_ms);
        self.frames.push(self.controller.current_transform());
    }

    pub fn advance_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Advance the clock without pumping frames (e.g. to let a double-tap
    /// window lapse).
    pub fn advance_time(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn press(&mut self, id: u64, position: Point) {
        self.controller.pointer_down(id, position, self.now_ms);
    }

    pub fn move_to(&mut self, id: u64, position: Point) {
        self.now_ms += FRAME_MS;
        self.controller.pointer_move(id, position, self.now_ms);
        self.controller.frame(self.now_ms);
        self.frames.push(self.controller.current_transform());
    }

    pub fn release(&mut self, id: u64, position: Point) {
        self.controller.pointer_up(id, position, self.now_ms);
    }

    pub fn cancel_pointer(&mut self, id: u64, position: Point) {
        self.controller.pointer_cancel(id, position, self.now_ms);
    }

    /// Press, quick release: a tap.
    pub fn tap(&mut self, id: u64, position: Point) {
        self.press(id, position);
        self.now_ms += 40;
        self.release(id, position);
    }

    /// Full drag: press at `from`, interpolated moves, release at `to`.
    pub fn drag(&mut self, id: u64, from: Point, to: Point, steps: usize) {
        self.press(id, from);
        self.drag_segment(id, from, to, steps);
        self.release(id, to);
    }

    /// The move portion of a drag, without press/release. Useful for
    /// composing multi-segment or multi-finger interactions.
    pub fn drag_segment(&mut self, id: u64, from: Point, to: Point, steps: usize) {
        let steps = steps.max(1);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            let position = Point::new(
                from.x + (to.x - from.x) * fraction,
                from.y + (to.y - from.y) * fraction,
            );
            self.move_to(id, position);
        }
    }

    /// Two-finger pinch: both fingers press, travel to their end positions,
    /// then lift.
    #[allow(clippy::too_many_arguments)]
    pub fn pinch(
        &mut self,
        id_a: u64,
        id_b: u64,
        from_a: Point,
        from_b: Point,
        to_a: Point,
        to_b: Point,
        steps: usize,
    ) {
        self.press(id_a, from_a);
        self.press(id_b, from_b);
        let steps = steps.max(1);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            let a = Point::new(
                from_a.x + (to_a.x - from_a.x) * fraction,
                from_a.y + (to_a.y - from_a.y) * fraction,
            );
            let b = Point::new(
                from_b.x + (to_b.x - from_b.x) * fraction,
                from_b.y + (to_b.y - from_b.y) * fraction,
            );
            self.now_ms += FRAME_MS;
            self.controller.pointer_move(id_a, a, self.now_ms);
            self.controller.pointer_move(id_b, b, self.now_ms);
            self.controller.frame(self.now_ms);
            self.frames.push(self.controller.current_transform());
        }
        self.release(id_a, to_a);
        self.release(id_b, to_b);
    }

    /// Pump frames until the transform stops changing (or a frame budget is
    /// exhausted) and return it.
    pub fn settle(&mut self) -> Transform {
        let mut stable = 0;
        let mut last = self.controller.current_transform();
        for _ in 0..512 {
            self.tick();
            let current = self.controller.current_transform();
            if current == last {
                stable += 1;
                if stable >= SETTLE_FRAMES {
                    return current;
                }
            } else {
                stable = 0;
                last = current;
            }
        }
        log::warn!("robot settle budget exhausted");
        last
    }
}
