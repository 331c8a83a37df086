//! Pull-to-refresh controller.

use std::cell::Cell;
use std::rc::Rc;

use pincer_animation::{MotionSpec, SpringAnimator};
use pincer_core::{guard_callback, Point, Transform};
use pincer_foundation::{GestureSession, PointerSampleStream};

use crate::{ControllerPorts, GestureTarget};

/// Finger travel is halved before it moves the indicator.
const PULL_DRAG_FACTOR: f32 = 0.5;

/// Minimum downward travel before a grant becomes a pull.
const PULL_START_EPSILON: f32 = 1.0;

/// Pull-to-refresh lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullState {
    Idle,
    Pulling,
    /// Finger released past the threshold; indicator settling into place.
    Releasing,
    Refreshing,
}

/// Completion handle passed to the `on_refresh` callback.
///
/// Success and failure are both completion: call [`RefreshToken::complete`]
/// either way and the indicator returns to idle. Completing twice is
/// harmless.
#[derive(Clone)]
pub struct RefreshToken {
    completed: Rc<Cell<bool>>,
}

impl RefreshToken {
    pub fn complete(&self) {
        self.completed.set(true);
    }
}

pub struct PullToRefreshConfig {
    /// Pulled distance that arms a refresh on release.
    pub pull_distance: f32,
    /// Hard cap on the pulled distance; progress is reported against this.
    pub max_pull_distance: f32,
    /// Indicator offset held while refreshing.
    pub refreshing_offset: f32,
    pub motion: MotionSpec,
}

impl Default for PullToRefreshConfig {
    fn default() -> Self {
        Self {
            pull_distance: 100.0,
            max_pull_distance: 150.0,
            refreshing_offset: 60.0,
            motion: MotionSpec::default(),
        }
    }
}

impl PullToRefreshConfig {
    fn sanitize(mut self) -> Self {
        if self.pull_distance <= 0.0 || !self.pull_distance.is_finite() {
            log::warn!("pull_distance {} invalid, using default", self.pull_distance);
            self.pull_distance = 100.0;
        }
        if self.max_pull_distance < self.pull_distance {
            log::warn!(
                "max_pull_distance {} below pull_distance, clamping",
                self.max_pull_distance
            );
            self.max_pull_distance = self.pull_distance;
        }
        if self.refreshing_offset < 0.0 {
            self.refreshing_offset = 0.0;
        }
        self
    }
}

#[derive(Default)]
pub struct PullToRefreshCallbacks {
    /// Progress in [0, 1] relative to `max_pull_distance`.
    pub on_pull_progress: Option<Box<dyn FnMut(f32)>>,
    /// The externally supplied refresh operation; complete the token when it
    /// finishes (successfully or not).
    pub on_refresh: Option<Box<dyn FnMut(RefreshToken)>>,
    pub on_state_change: Option<Box<dyn FnMut(PullState)>>,
    /// Entry guard: the scrollable container is at its top edge. Pulls never
    /// start mid-scroll. Defaults to always-true when absent.
    pub at_scroll_top: Option<Box<dyn Fn() -> bool>>,
}

/// Pull-to-refresh gesture controller for a scrollable container's edge
/// indicator.
pub struct PullToRefresh {
    config: PullToRefreshConfig,
    callbacks: PullToRefreshCallbacks,
    ports: ControllerPorts,
    stream: PointerSampleStream,
    session: Option<GestureSession>,
    session_counter: u64,
    state: PullState,
    transform: Transform,
    animator: SpringAnimator,
    /// Set when the current settle animation ends in the refreshing state.
    settle_into_refresh: bool,
    /// Completion flag of the in-flight refresh.
    refresh_done: Option<Rc<Cell<bool>>>,
    /// Threshold-crossing haptic fired for this pull.
    armed: bool,
}

impl PullToRefresh {
    pub fn new(config: PullToRefreshConfig, callbacks: PullToRefreshCallbacks) -> Self {
        Self {
            config: config.sanitize(),
            callbacks,
            ports: ControllerPorts::default(),
            stream: PointerSampleStream::new(),
            session: None,
            session_counter: 0,
            state: PullState::Idle,
            transform: Transform::IDENTITY,
            animator: SpringAnimator::new(),
            settle_into_refresh: false,
            refresh_done: None,
            armed: false,
        }
    }

    pub fn with_ports(mut self, ports: ControllerPorts) -> Self {
        self.ports = ports;
        self
    }

    pub fn state(&self) -> PullState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self.state, PullState::Releasing | PullState::Refreshing)
    }

    /// Current indicator offset.
    pub fn pulled(&self) -> f32 {
        self.transform.translate_y
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn on_pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let sample = self.stream.on_down(id, position, timestamp_ms);
        if self.session.is_some() {
            log::debug!("pull grant rejected, session already active");
            return;
        }
        // A refresh in flight swallows new pulls entirely.
        if self.is_refreshing() {
            return;
        }
        let at_top = self
            .callbacks
            .at_scroll_top
            .as_ref()
            .map(|probe| probe())
            .unwrap_or(true);
        if !at_top {
            return;
        }
        self.animator.cancel();
        self.session_counter += 1;
        self.session = Some(GestureSession::new(self.session_counter, sample));
        self.armed = false;
    }

    pub fn on_pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_move(id, position, timestamp_ms) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if sample.id != session.start().id {
            return;
        }
        session.observe(sample);
        let (_, dy) = session.displacement();

        if self.state == PullState::Idle && dy > PULL_START_EPSILON {
            self.set_state(PullState::Pulling);
        }
        if self.state != PullState::Pulling {
            return;
        }

        let pulled = (dy * PULL_DRAG_FACTOR).clamp(0.0, self.config.max_pull_distance);
        self.transform.translate_y = pulled;
        self.ports.apply(&self.transform);

        if !self.armed && pulled >= self.config.pull_distance {
            self.armed = true;
            self.ports.pulse();
        }

        let progress = pulled / self.config.max_pull_distance;
        if let Some(on_pull_progress) = self.callbacks.on_pull_progress.as_mut() {
            guard_callback("on_pull_progress", || on_pull_progress(progress));
        }
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

    /// Advance the settle animation and observe refresh completion.
    pub fn on_frame(&mut self, now_ms: u64) {
        if let Some(frame) = self.animator.on_frame(now_ms) {
            self.transform = frame.transform;
            self.ports.apply(&self.transform);
            if frame.done && self.settle_into_refresh {
                self.settle_into_refresh = false;
                self.enter_refreshing();
            }
        }

        if self.state == PullState::Refreshing {
            let done = self
                .refresh_done
                .as_ref()
                .is_some_and(|flag| flag.get());
            if done {
                self.refresh_done = None;
                self.set_state(PullState::Idle);
                self.settle_to(0.0);
            }
        }
    }

    /// Teardown: cancel timers and animations; a pending refresh token is
    /// forgotten.
    pub fn cancel(&mut self) {
        self.animator.cancel();
        self.session = None;
        self.settle_into_refresh = false;
        self.refresh_done = None;
        if self.state != PullState::Idle {
            self.set_state(PullState::Idle);
        }
    }

    fn resolve_release(&mut self, cancelled: bool) {
        let Some(mut session) = self.session.take() else {
            log::debug!("pull release without session dropped");
            return;
        };
        if !session.begin_release() {
            return;
        }
        if self.state != PullState::Pulling {
            return;
        }

        let pulled = self.transform.translate_y;
        if !cancelled && pulled >= self.config.pull_distance {
            self.set_state(PullState::Releasing);
            self.settle_into_refresh = true;
            self.settle_to(self.config.refreshing_offset);
        } else {
            self.set_state(PullState::Idle);
            self.settle_to(0.0);
        }
    }

    fn enter_refreshing(&mut self) {
        self.set_state(PullState::Refreshing);
        let flag = Rc::new(Cell::new(false));
        self.refresh_done = Some(flag.clone());
        let token = RefreshToken { completed: flag };
        if let Some(on_refresh) = self.callbacks.on_refresh.as_mut() {
            guard_callback("on_refresh", || on_refresh(token));
        } else {
            // No refresh operation supplied; nothing to wait for.
            self.refresh_done = None;
            self.set_state(PullState::Idle);
            self.settle_to(0.0);
        }
    }

    fn set_state(&mut self, state: PullState) {
        if self.state == state {
            return;
        }
        self.state = state;
        if let Some(on_state_change) = self.callbacks.on_state_change.as_mut() {
            guard_callback("on_state_change", || on_state_change(state));
        }
    }

    fn settle_to(&mut self, offset: f32) {
        self.animator.animate_to(
            self.transform,
            Transform::translation(0.0, offset),
            self.config.motion,
        );
    }
}

impl GestureTarget for PullToRefresh {
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
