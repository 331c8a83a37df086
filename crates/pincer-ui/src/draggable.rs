//! Drag-and-drop controller with boundaries, snapping, and drop targets.

use std::cell::RefCell;
use std::rc::Rc;

use pincer_animation::{MotionSpec, SpringAnimator};
use pincer_core::{guard_callback, Point, Size, Transform};
use pincer_foundation::{
    gesture_constants::MAX_RELEASE_VELOCITY, BoundaryPolicy, DropPayload, DropTargetId,
    DropTargetRegistry, GestureClassifier, GestureSession, PointerSampleStream, SnapResolver,
    VelocityTracker1D,
};

use crate::{ControllerPorts, GestureTarget};

/// Static configuration for a [`Draggable`]. Every option is enumerated and
/// defaulted; out-of-range values are clamped at construction.
pub struct DraggableConfig {
    /// Size of the dragged element, used for boundary and center math.
    pub element_size: Size,
    /// Rest position of the element's top-left corner in container
    /// coordinates. The transform's translation is relative to this.
    pub origin: Point,
    /// Optional translation limits.
    pub bounds: Option<BoundaryPolicy>,
    /// Element positions (top-left, container coordinates) to snap to on
    /// release.
    pub snap_points: Vec<Point>,
    pub snap_threshold: f32,
    /// Global movement damping in [0, 1]: 0 tracks the finger exactly.
    pub resistance: f32,
    /// After a free release, drift the element to the bottom bound.
    pub apply_gravity: bool,
    pub gravity_delay_ms: u64,
    /// Identity passed to drop targets in the [`DropPayload`].
    pub source_id: u64,
    /// Settle animation used for snap/drop/bounds resolution.
    pub motion: MotionSpec,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            element_size: Size::new(1.0, 1.0),
            origin: Point::ZERO,
            bounds: None,
            snap_points: Vec::new(),
            snap_threshold: 0.0,
            resistance: 0.0,
            apply_gravity: false,
            gravity_delay_ms: 500,
            source_id: 0,
            motion: MotionSpec::default(),
        }
    }
}

impl DraggableConfig {
    fn sanitize(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.resistance) {
            log::warn!("drag resistance {} out of [0,1], clamping", self.resistance);
            self.resistance = self.resistance.clamp(0.0, 1.0);
        }
        if self.snap_threshold < 0.0 || !self.snap_threshold.is_finite() {
            self.snap_threshold = 0.0;
        }
        self.bounds = self.bounds.map(BoundaryPolicy::sanitize);
        self
    }
}

/// Caller-supplied hooks. All of them are optional; panics inside a hook are
/// contained at the controller boundary.
#[derive(Default)]
pub struct DraggableCallbacks {
    pub on_drag_start: Option<Box<dyn FnMut()>>,
    pub on_drag_move: Option<Box<dyn FnMut(Transform)>>,
    /// Pointer lifted, before release resolution.
    pub on_drag_end: Option<Box<dyn FnMut()>>,
    /// Release resolved; `true` when the element landed on a drop target.
    pub on_drag_release: Option<Box<dyn FnMut(bool)>>,
}

/// Drag-and-drop gesture controller.
///
/// Owns its transform exclusively; the renderer receives it through the
/// one-way port after every mutation. One gesture session may be live at a
/// time; a pointer down while one is active is ignored.
pub struct Draggable {
    config: DraggableConfig,
    callbacks: DraggableCallbacks,
    ports: ControllerPorts,
    snap: SnapResolver,
    drop_targets: Option<Rc<RefCell<DropTargetRegistry>>>,
    stream: PointerSampleStream,
    classifier: GestureClassifier,
    session: Option<GestureSession>,
    session_counter: u64,
    /// Translation committed by previous gestures; the live delta is added
    /// on top of this.
    committed: Point,
    transform: Transform,
    animator: SpringAnimator,
    velocity_x: VelocityTracker1D,
    velocity_y: VelocityTracker1D,
    /// Target currently under the element center, for enter-edge haptics.
    current_target: Option<DropTargetId>,
    gravity_deadline_ms: Option<u64>,
}

impl Draggable {
    pub fn new(config: DraggableConfig, callbacks: DraggableCallbacks) -> Self {
        let config = config.sanitize();
        let snap = SnapResolver::new(config.snap_points.clone(), config.snap_threshold);
        Self {
            config,
            callbacks,
            ports: ControllerPorts::default(),
            snap,
            drop_targets: None,
            stream: PointerSampleStream::new(),
            classifier: GestureClassifier::new(),
            session: None,
            session_counter: 0,
            committed: Point::ZERO,
            transform: Transform::IDENTITY,
            animator: SpringAnimator::new(),
            velocity_x: VelocityTracker1D::new(),
            velocity_y: VelocityTracker1D::new(),
            current_target: None,
            gravity_deadline_ms: None,
        }
    }

    pub fn with_ports(mut self, ports: ControllerPorts) -> Self {
        self.ports = ports;
        self
    }

    /// Attach the externally owned drop target registry.
    pub fn with_drop_targets(mut self, registry: Rc<RefCell<DropTargetRegistry>>) -> Self {
        self.drop_targets = Some(registry);
        self
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Element center in container coordinates at the current transform.
    pub fn element_center(&self) -> Point {
        Point::new(
            self.config.origin.x + self.config.element_size.width * 0.5 + self.transform.translate_x,
            self.config.origin.y + self.config.element_size.height * 0.5 + self.transform.translate_y,
        )
    }

    pub fn on_pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let sample = self.stream.on_down(id, position, timestamp_ms);
        if self.session.is_some() {
            log::debug!("drag grant rejected, session already active");
            return;
        }
        // A fresh grant interrupts any pending settle or gravity drift.
        self.animator.cancel();
        self.gravity_deadline_ms = None;
        self.committed = Point::new(self.transform.translate_x, self.transform.translate_y);
        self.velocity_x.reset();
        self.velocity_y.reset();
        self.velocity_x.add_sample(timestamp_ms, position.x);
        self.velocity_y.add_sample(timestamp_ms, position.y);
        self.session_counter += 1;
        self.session = Some(GestureSession::new(self.session_counter, sample));
        self.current_target = self.hit_test_center();
        if let Some(on_drag_start) = self.callbacks.on_drag_start.as_mut() {
            guard_callback("on_drag_start", || on_drag_start());
        }
    }

    pub fn on_pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_move(id, position, timestamp_ms) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            log::debug!("drag move without session dropped");
            return;
        };
        if sample.id != session.start().id {
            // Only the granting pointer drives a drag.
            return;
        }
        session.observe(sample);
        self.velocity_x.add_sample(timestamp_ms, position.x);
        self.velocity_y.add_sample(timestamp_ms, position.y);

        if session.committed_kind().is_none() && self.classifier.past_slop(session) {
            let kind = self.classifier.classify(session);
            session.commit(kind);
        }

        let (dx, dy) = session.displacement();
        let damping = 1.0 - self.config.resistance;
        let candidate = Point::new(
            self.committed.x + dx * damping,
            self.committed.y + dy * damping,
        );
        self.set_translation(self.constrain_live(candidate));

        self.track_drop_target();
        let transform = self.transform;
        if let Some(on_drag_move) = self.callbacks.on_drag_move.as_mut() {
            guard_callback("on_drag_move", || on_drag_move(transform));
        }
    }

    pub fn on_pointer_up(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        if self.stream.on_up(id, position, timestamp_ms).is_none() {
            return;
        }
        if self.session.as_ref().is_some_and(|s| s.start().id != id) {
            return;
        }
        self.resolve_release(timestamp_ms, false);
    }

    /// A cancelled pointer resolves the gesture without firing drop logic,
    /// settling back into bounds so the element is never left stuck.
    pub fn on_pointer_cancel(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        if self.stream.on_cancel(id, position, timestamp_ms).is_none() {
            return;
        }
        if self.session.as_ref().is_some_and(|s| s.start().id != id) {
            return;
        }
        self.resolve_release(timestamp_ms, true);
    }

    /// Advance settle animations and the gravity timer.
    pub fn on_frame(&mut self, now_ms: u64) {
        if let Some(frame) = self.animator.on_frame(now_ms) {
            self.transform = frame.transform;
            self.ports.apply(&self.transform);
        }
        if let Some(deadline) = self.gravity_deadline_ms {
            if now_ms >= deadline && self.session.is_none() && !self.animator.is_running() {
                self.gravity_deadline_ms = None;
                self.start_gravity_settle();
            }
        }
    }

    /// Cancel timers, animations, and any live session (teardown path).
    pub fn cancel(&mut self) {
        self.animator.cancel();
        self.gravity_deadline_ms = None;
        self.session = None;
        self.classifier.reset();
    }

    fn resolve_release(&mut self, now_ms: u64, cancelled: bool) {
        let Some(mut session) = self.session.take() else {
            log::debug!("drag release without session dropped");
            return;
        };
        if !session.begin_release() {
            return;
        }

        let dropped = if cancelled { false } else { self.try_drop() };
        self.current_target = None;

        if !dropped {
            self.resolve_free_release(now_ms, cancelled);
        }

        // Terminal state is committed before the caller hears about it.
        if let Some(on_drag_end) = self.callbacks.on_drag_end.as_mut() {
            guard_callback("on_drag_end", || on_drag_end());
        }
        if let Some(on_drag_release) = self.callbacks.on_drag_release.as_mut() {
            guard_callback("on_drag_release", || on_drag_release(dropped));
        }
    }

    /// Drop-target resolution. Precedes the snap-point check by design of the
    /// release pipeline.
    fn try_drop(&mut self) -> bool {
        let center = self.element_center();
        let Some(registry) = self.drop_targets.clone() else {
            return false;
        };
        let Some(hit) = registry.borrow().hit_test(center) else {
            return false;
        };

        if hit.snap_on_drop {
            let target_center = hit.rect.center();
            let translation = Point::new(
                target_center.x - self.config.origin.x - self.config.element_size.width * 0.5,
                target_center.y - self.config.origin.y - self.config.element_size.height * 0.5,
            );
            self.settle_to(translation);
        }
        self.ports.pulse();
        registry.borrow_mut().notify_drop(
            hit.id,
            &DropPayload {
                source: self.config.source_id,
                position: center,
            },
        );
        true
    }

    fn resolve_free_release(&mut self, now_ms: u64, cancelled: bool) {
        let position = Point::new(
            self.config.origin.x + self.transform.translate_x,
            self.config.origin.y + self.transform.translate_y,
        );

        if !cancelled && !self.snap.is_empty() {
            if let Some(snap_position) = self.snap.resolve(position) {
                let translation = Point::new(
                    snap_position.x - self.config.origin.x,
                    snap_position.y - self.config.origin.y,
                );
                self.settle_to(translation);
                return;
            }
        }

        // Free position: settle back inside the hard bounds if the live
        // resistance let the element overflow them.
        let clamped = self.clamp_translation(Point::new(
            self.transform.translate_x,
            self.transform.translate_y,
        ));
        let current = Point::new(self.transform.translate_x, self.transform.translate_y);
        if clamped != current {
            self.settle_to(clamped);
        } else if self.config.apply_gravity && !cancelled {
            self.gravity_deadline_ms = Some(now_ms + self.config.gravity_delay_ms);
        }
    }

    /// Pointer velocity (px/sec per axis) over the most recent samples,
    /// capped at the engine maximum. Useful to hosts that want fling-style
    /// follow-ups; the drag release itself does not depend on it.
    pub fn release_velocity(&self) -> (f32, f32) {
        (
            self.velocity_x.calculate_velocity_with_max(MAX_RELEASE_VELOCITY),
            self.velocity_y.calculate_velocity_with_max(MAX_RELEASE_VELOCITY),
        )
    }

    fn start_gravity_settle(&mut self) {
        let Some(bounds) = self.config.bounds.as_ref() else {
            return;
        };
        let Some(floor) = bounds.gravity_floor(self.config.element_size) else {
            return;
        };
        let target = Point::new(self.transform.translate_x, floor - self.config.origin.y);
        self.settle_to(target);
    }

    fn settle_to(&mut self, translation: Point) {
        let target = Transform::translation(translation.x, translation.y);
        self.animator
            .animate_to(self.transform, target, self.config.motion);
    }

    fn set_translation(&mut self, translation: Point) {
        self.transform.translate_x = translation.x;
        self.transform.translate_y = translation.y;
        self.ports.apply(&self.transform);
    }

    /// Soft constraint while the finger is down: resistance past the bounds.
    fn constrain_live(&self, candidate: Point) -> Point {
        let Some(bounds) = self.config.bounds.as_ref() else {
            return candidate;
        };
        let position = Point::new(
            self.config.origin.x + candidate.x,
            self.config.origin.y + candidate.y,
        );
        let (x, y) = bounds.resist(position.x, position.y, self.config.element_size);
        Point::new(x - self.config.origin.x, y - self.config.origin.y)
    }

    /// Hard clamp used at release; identity when no bounds are configured.
    fn clamp_translation(&self, translation: Point) -> Point {
        let Some(bounds) = self.config.bounds.as_ref() else {
            return translation;
        };
        let position = Point::new(
            self.config.origin.x + translation.x,
            self.config.origin.y + translation.y,
        );
        let (x, y) = bounds.clamp(position.x, position.y, self.config.element_size);
        Point::new(x - self.config.origin.x, y - self.config.origin.y)
    }

    fn hit_test_center(&self) -> Option<DropTargetId> {
        let registry = self.drop_targets.as_ref()?;
        registry.borrow().hit_test(self.element_center()).map(|hit| hit.id)
    }

    /// Track which target the element center is over; pulse the haptic port
    /// exactly once per target entry, not per move sample.
    fn track_drop_target(&mut self) {
        let hit = self.hit_test_center();
        if hit != self.current_target {
            if hit.is_some() {
                self.ports.pulse();
            }
            self.current_target = hit;
        }
    }
}

impl GestureTarget for Draggable {
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
