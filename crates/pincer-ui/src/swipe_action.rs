//! Swipe-to-reveal row actions.

use pincer_animation::{MotionSpec, SpringAnimator};
use pincer_core::{guard_callback, Point, Transform};
use pincer_foundation::{
    gesture_constants::{
        MAX_RELEASE_VELOCITY, SWIPE_DISPLACEMENT_THRESHOLD, SWIPE_VELOCITY_THRESHOLD,
    },
    resist_scalar, GestureClassifier, GestureKind, GestureSession, PointerSampleStream,
    VelocityTracker1D,
};

use crate::{ControllerPorts, GestureTarget};

/// Which edge of the row an action list lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeSide {
    Left,
    Right,
}

/// One revealable action button.
pub struct SwipeActionItem {
    on_press: Box<dyn FnMut()>,
}

impl SwipeActionItem {
    pub fn new(on_press: impl FnMut() + 'static) -> Self {
        Self {
            on_press: Box::new(on_press),
        }
    }
}

pub struct SwipeActionConfig {
    /// Uniform width of one action button; activation thresholds are
    /// `(index + 0.5) * action_width`.
    pub action_width: f32,
    /// Damping for travel past the revealed extent, in [0, 1].
    pub friction: f32,
    /// Snap back to closed after an action fires; otherwise hold open.
    pub reset_after_action: bool,
    /// Cap on total reveal travel; infinite means the action count decides.
    pub max_swipe_distance: f32,
    pub motion: MotionSpec,
}

impl Default for SwipeActionConfig {
    fn default() -> Self {
        Self {
            action_width: 80.0,
            friction: 0.8,
            reset_after_action: true,
            max_swipe_distance: f32::INFINITY,
            motion: MotionSpec::default(),
        }
    }
}

impl SwipeActionConfig {
    fn sanitize(mut self) -> Self {
        if self.action_width <= 0.0 || !self.action_width.is_finite() {
            log::warn!("action_width {} invalid, using default", self.action_width);
            self.action_width = 80.0;
        }
        if !(0.0..=1.0).contains(&self.friction) {
            log::warn!("swipe friction {} out of [0,1], clamping", self.friction);
            self.friction = self.friction.clamp(0.0, 1.0);
        }
        if self.max_swipe_distance < 0.0 {
            self.max_swipe_distance = 0.0;
        }
        self
    }
}

/// Swipe-to-reveal controller for one row.
///
/// Horizontal drag reveals the action lists; on release the furthest
/// activated action fires exactly once, or a fast flick reveals the first
/// action group without firing anything.
pub struct SwipeAction {
    config: SwipeActionConfig,
    ports: ControllerPorts,
    left_actions: Vec<SwipeActionItem>,
    right_actions: Vec<SwipeActionItem>,
    stream: PointerSampleStream,
    classifier: GestureClassifier,
    session: Option<GestureSession>,
    session_counter: u64,
    /// Row offset committed by previous gestures (0 when closed).
    committed_x: f32,
    transform: Transform,
    animator: SpringAnimator,
    velocity_x: VelocityTracker1D,
}

impl SwipeAction {
    pub fn new(
        config: SwipeActionConfig,
        left_actions: Vec<SwipeActionItem>,
        right_actions: Vec<SwipeActionItem>,
    ) -> Self {
        Self {
            config: config.sanitize(),
            ports: ControllerPorts::default(),
            left_actions,
            right_actions,
            stream: PointerSampleStream::new(),
            classifier: GestureClassifier::new(),
            session: None,
            session_counter: 0,
            committed_x: 0.0,
            transform: Transform::IDENTITY,
            animator: SpringAnimator::new(),
            velocity_x: VelocityTracker1D::new(),
        }
    }

    pub fn with_ports(mut self, ports: ControllerPorts) -> Self {
        self.ports = ports;
        self
    }

    /// Current horizontal offset of the row.
    pub fn offset(&self) -> f32 {
        self.transform.translate_x
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_open(&self) -> bool {
        self.committed_x != 0.0
    }

    pub fn on_pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let sample = self.stream.on_down(id, position, timestamp_ms);
        if self.session.is_some() {
            log::debug!("swipe grant rejected, session already active");
            return;
        }
        self.animator.cancel();
        self.committed_x = self.transform.translate_x;
        self.velocity_x.reset();
        self.velocity_x.add_sample(timestamp_ms, position.x);
        self.session_counter += 1;
        self.session = Some(GestureSession::new(self.session_counter, sample));
    }

    pub fn on_pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_move(id, position, timestamp_ms) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            log::debug!("swipe move without session dropped");
            return;
        };
        if sample.id != session.start().id {
            return;
        }
        session.observe(sample);
        self.velocity_x.add_sample(timestamp_ms, position.x);

        if session.committed_kind().is_none() && self.classifier.past_slop(session) {
            let kind = self.classifier.classify(session);
            session.commit(kind);
        }
        // Vertical motion belongs to the list scroll, not this row.
        if session.committed_kind() != Some(GestureKind::HorizontalPan) {
            return;
        }

        let (dx, _) = session.displacement();
        let raw = self.committed_x + dx;
        self.transform.translate_x = resist_scalar(
            raw,
            Some(-self.extent(SwipeSide::Right)),
            Some(self.extent(SwipeSide::Left)),
            self.config.friction,
            self.config.action_width * 0.5,
        );
        self.ports.apply(&self.transform);
    }

    pub fn on_pointer_up(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        if self.stream.on_up(id, position, timestamp_ms).is_none() {
            return;
        }
        if self.session.as_ref().is_some_and(|s| s.start().id != id) {
            return;
        }
        self.resolve_release(false);
    }

    pub fn on_pointer_cancel(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        if self.stream.on_cancel(id, position, timestamp_ms).is_none() {
            return;
        }
        if self.session.as_ref().is_some_and(|s| s.start().id != id) {
            return;
        }
        self.resolve_release(true);
    }

    /// Advance the settle animation.
    pub fn on_frame(&mut self, now_ms: u64) {
        if let Some(frame) = self.animator.on_frame(now_ms) {
            self.transform = frame.transform;
            self.ports.apply(&self.transform);
        }
    }

    /// Teardown: cancel the animation and any live session.
    pub fn cancel(&mut self) {
        self.animator.cancel();
        self.session = None;
    }

    /// Directly trigger a revealed action button (the host wires button taps
    /// here); fires regardless of swipe thresholds.
    pub fn press_action(&mut self, side: SwipeSide, index: usize) {
        let actions = match side {
            SwipeSide::Left => &mut self.left_actions,
            SwipeSide::Right => &mut self.right_actions,
        };
        let Some(action) = actions.get_mut(index) else {
            log::debug!("press on unknown {side:?} action {index} ignored");
            return;
        };
        let on_press = &mut action.on_press;
        guard_callback("on_press", || on_press());
        self.ports.pulse();
        if self.config.reset_after_action {
            self.settle_to(0.0);
            self.committed_x = 0.0;
        }
    }

    /// Total reveal extent for one side.
    fn extent(&self, side: SwipeSide) -> f32 {
        let count = match side {
            SwipeSide::Left => self.left_actions.len(),
            SwipeSide::Right => self.right_actions.len(),
        };
        (count as f32 * self.config.action_width).min(self.config.max_swipe_distance)
    }

    fn resolve_release(&mut self, cancelled: bool) {
        let Some(mut session) = self.session.take() else {
            log::debug!("swipe release without session dropped");
            return;
        };
        if !session.begin_release() {
            return;
        }

        if cancelled {
            self.settle_to(self.committed_x);
            return;
        }

        let displacement = self.transform.translate_x;
        let side = if displacement > 0.0 {
            SwipeSide::Left
        } else {
            SwipeSide::Right
        };
        let magnitude = displacement.abs();
        let width = self.config.action_width;
        let available = match side {
            SwipeSide::Left => self.left_actions.len(),
            SwipeSide::Right => self.right_actions.len(),
        };

        // Count of actions whose (index + 0.5) * width threshold is exceeded.
        let mut activated = 0;
        for index in 0..available {
            if magnitude > (index as f32 + 0.5) * width {
                activated = index + 1;
            } else {
                break;
            }
        }

        if activated > 0 {
            let sign = displacement.signum();
            let rest = if self.config.reset_after_action {
                0.0
            } else {
                sign * activated as f32 * width
            };
            // Terminal offset is committed before the action can observe it.
            self.committed_x = rest;
            self.settle_to(rest);
            self.fire_action(side, activated - 1);
            return;
        }

        let velocity = self
            .velocity_x
            .calculate_velocity_with_max(MAX_RELEASE_VELOCITY);
        let velocity_assisted = available > 0
            && magnitude > SWIPE_DISPLACEMENT_THRESHOLD
            && velocity.abs() > SWIPE_VELOCITY_THRESHOLD
            && velocity.signum() == displacement.signum();

        if velocity_assisted {
            let sign = displacement.signum();
            self.committed_x = sign * width;
            self.settle_to(self.committed_x);
        } else {
            self.committed_x = 0.0;
            self.settle_to(0.0);
        }
    }

    /// Fire the furthest activated action exactly once.
    fn fire_action(&mut self, side: SwipeSide, index: usize) {
        let actions = match side {
            SwipeSide::Left => &mut self.left_actions,
            SwipeSide::Right => &mut self.right_actions,
        };
        if let Some(action) = actions.get_mut(index) {
            let on_press = &mut action.on_press;
            guard_callback("on_press", || on_press());
            self.ports.pulse();
        }
    }

    fn settle_to(&mut self, offset: f32) {
        self.animator.animate_to(
            self.transform,
            Transform::translation(offset, 0.0),
            self.config.motion,
        );
    }
}

impl GestureTarget for SwipeAction {
    fn pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        self.on_pointer_down(id, position, timestamp_ms);
    }

    fn pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        self.on_pointer_move(id, position, timestamp_ms);
    }

    fn pointer_up(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        self.on_pointer_up(id, position, timestamp_ms);
    }

    fn pointer_cancel(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        self.on_pointer_cancel(id, position, timestamp_ms);
    }

    fn frame(&mut self, now_ms: u64) {
        self.on_frame(now_ms);
    }

    fn current_transform(&self) -> Transform {
        self.transform()
    }
}
