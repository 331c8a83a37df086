//! Pinch-to-zoom controller with optional rotation and panning.

use pincer_animation::{MotionSpec, SpringAnimator};
use pincer_core::{guard_callback, pinch_angle, pinch_distance, Point, Size, Transform};
use pincer_foundation::{
    gesture_constants, GestureClassifier, GestureKind, GestureSession, PointerSampleStream,
};

use crate::{ControllerPorts, GestureTarget};

/// Scales closer than this are treated as equal.
const SCALE_EPSILON: f32 = 1e-3;

pub struct PinchZoomConfig {
    /// Size of the zoomed element at scale 1.0.
    pub element_size: Size,
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
    /// Scale toggled in by a double tap.
    pub double_tap_scale: f32,
    pub rotation_enabled: bool,
    pub enable_panning: bool,
    /// Keep the translation inside the zoomed element's overflow area and
    /// settle back into range on release.
    pub enforce_boundaries: bool,
    /// Extra travel allowed past the pan limit while the finger is down.
    pub max_overflow: f32,
    /// Window in which a second tap counts as a double tap.
    pub double_tap_timeout_ms: u64,
    pub motion: MotionSpec,
}

impl Default for PinchZoomConfig {
    fn default() -> Self {
        Self {
            element_size: Size::new(1.0, 1.0),
            min_scale: 1.0,
            max_scale: 4.0,
            initial_scale: 1.0,
            double_tap_scale: 2.0,
            rotation_enabled: false,
            enable_panning: true,
            enforce_boundaries: true,
            max_overflow: 32.0,
            double_tap_timeout_ms: gesture_constants::DOUBLE_TAP_TIMEOUT_MS,
            motion: MotionSpec::default(),
        }
    }
}

impl PinchZoomConfig {
    fn sanitize(mut self) -> Self {
        if self.min_scale <= 0.0 || !self.min_scale.is_finite() {
            log::warn!("min_scale {} invalid, clamping", self.min_scale);
            self.min_scale = 0.01;
        }
        if self.max_scale < self.min_scale {
            log::warn!(
                "max_scale {} below min_scale {}, clamping",
                self.max_scale,
                self.min_scale
            );
            self.max_scale = self.min_scale;
        }
        self.initial_scale = self.initial_scale.clamp(self.min_scale, self.max_scale);
        self.double_tap_scale = self.double_tap_scale.clamp(self.min_scale, self.max_scale);
        if self.max_overflow < 0.0 || !self.max_overflow.is_finite() {
            self.max_overflow = 0.0;
        }
        self
    }
}

#[derive(Default)]
pub struct PinchZoomCallbacks {
    pub on_zoom_start: Option<Box<dyn FnMut()>>,
    pub on_zoom_change: Option<Box<dyn FnMut(f32)>>,
    pub on_zoom_end: Option<Box<dyn FnMut(f32)>>,
    pub on_tap: Option<Box<dyn FnMut()>>,
    pub on_double_tap: Option<Box<dyn FnMut()>>,
}

/// Geometry captured at the moment the second finger lands.
struct PinchOrigin {
    initial_distance: f32,
    initial_angle: f32,
    start_scale: f32,
    start_rotation: f32,
}

/// Pinch-to-zoom gesture controller.
///
/// Two-finger distance drives scale multiplicatively from the gesture-start
/// scale, clamped to `[min_scale, max_scale]` at every intermediate sample.
/// A double tap toggles between `min_scale` and `double_tap_scale`.
pub struct PinchZoom {
    config: PinchZoomConfig,
    callbacks: PinchZoomCallbacks,
    ports: ControllerPorts,
    stream: PointerSampleStream,
    classifier: GestureClassifier,
    session: Option<GestureSession>,
    session_counter: u64,
    transform: Transform,
    animator: SpringAnimator,
    pinch: Option<PinchOrigin>,
    /// Last position of the finger while exactly one pointer is down; pans
    /// are integrated incrementally from it.
    last_single_pos: Option<Point>,
    zooming: bool,
}

impl PinchZoom {
    pub fn new(config: PinchZoomConfig, callbacks: PinchZoomCallbacks) -> Self {
        let config = config.sanitize();
        let transform = Transform::IDENTITY.with_scale(config.initial_scale);
        let classifier = GestureClassifier::with_thresholds(
            gesture_constants::TAP_SLOP,
            config.double_tap_timeout_ms,
            gesture_constants::AXIS_LOCK_RATIO,
        );
        Self {
            config,
            callbacks,
            ports: ControllerPorts::default(),
            stream: PointerSampleStream::new(),
            classifier,
            session: None,
            session_counter: 0,
            transform,
            animator: SpringAnimator::new(),
            pinch: None,
            last_single_pos: None,
            zooming: false,
        }
    }

    pub fn with_ports(mut self, ports: ControllerPorts) -> Self {
        self.ports = ports;
        self
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn on_pointer_down(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let sample = self.stream.on_down(id, position, timestamp_ms);
        match self.session.as_mut() {
            None => {
                self.animator.cancel();
                self.session_counter += 1;
                self.session = Some(GestureSession::new(self.session_counter, sample));
                self.last_single_pos = Some(position);
            }
            Some(session) if sample.active_count == 2 => {
                session.observe(sample);
                session.commit(GestureKind::Pinch);
                self.last_single_pos = None;
                self.capture_pinch_origin();
                if !self.zooming {
                    self.zooming = true;
                    if let Some(on_zoom_start) = self.callbacks.on_zoom_start.as_mut() {
                        guard_callback("on_zoom_start", || on_zoom_start());
                    }
                }
            }
            // Third and later fingers don't change the pinch pair.
            Some(session) => session.observe(sample),
        }
    }

    pub fn on_pointer_move(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_move(id, position, timestamp_ms) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            log::debug!("pinch move without session dropped");
            return;
        };
        session.observe(sample);

        if session.committed_kind() == Some(GestureKind::Pinch) {
            if let Some((a, b)) = self.stream.touch_pair() {
                self.update_pinch(a, b);
            }
            return;
        }

        if session.committed_kind().is_none() && self.classifier.past_slop(session) {
            let kind = self.classifier.classify(session);
            session.commit(kind);
        }
        self.update_pan(position);
    }

    pub fn on_pointer_up(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_up(id, position, timestamp_ms) else {
            return;
        };
        self.handle_release(sample.active_count, position, timestamp_ms, false);
    }

    pub fn on_pointer_cancel(&mut self, id: u64, position: Point, timestamp_ms: u64) {
        let Some(sample) = self.stream.on_cancel(id, position, timestamp_ms) else {
            return;
        };
        self.handle_release(sample.active_count, position, timestamp_ms, true);
    }

    /// Advance the settle animation.
    pub fn on_frame(&mut self, now_ms: u64) {
        if let Some(frame) = self.animator.on_frame(now_ms) {
            self.transform = frame.transform;
            self.ports.apply(&self.transform);
        }
    }

    /// Teardown: cancel animation and forget the live session and tap
    /// history.
    pub fn cancel(&mut self) {
        self.animator.cancel();
        self.session = None;
        self.pinch = None;
        self.zooming = false;
        self.last_single_pos = None;
        self.classifier.reset();
    }

    fn capture_pinch_origin(&mut self) {
        let Some((a, b)) = self.stream.touch_pair() else {
            return;
        };
        // A degenerate pair (fingers effectively on one spot) keeps the scale
        // unchanged; the origin is re-captured once they separate.
        self.pinch = pinch_distance(a, b).map(|initial_distance| PinchOrigin {
            initial_distance,
            initial_angle: pinch_angle(a, b),
            start_scale: self.transform.scale,
            start_rotation: self.transform.rotation,
        });
    }

    fn update_pinch(&mut self, a: Point, b: Point) {
        if self.pinch.is_none() {
            self.capture_pinch_origin();
        }
        let Some(origin) = self.pinch.as_ref() else {
            return;
        };
        let Some(distance) = pinch_distance(a, b) else {
            return;
        };

        let raw_scale = origin.start_scale * (distance / origin.initial_distance);
        self.transform.scale = raw_scale.clamp(self.config.min_scale, self.config.max_scale);
        if self.config.rotation_enabled {
            self.transform.rotation =
                origin.start_rotation + (origin.initial_angle - pinch_angle(a, b));
        }
        self.ports.apply(&self.transform);
        let scale = self.transform.scale;
        if let Some(on_zoom_change) = self.callbacks.on_zoom_change.as_mut() {
            guard_callback("on_zoom_change", || on_zoom_change(scale));
        }
    }

    fn update_pan(&mut self, position: Point) {
        let Some(last) = self.last_single_pos else {
            self.last_single_pos = Some(position);
            return;
        };
        self.last_single_pos = Some(position);

        if !self.config.enable_panning || self.transform.scale <= self.config.min_scale + SCALE_EPSILON
        {
            return;
        }

        let mut x = self.transform.translate_x + (position.x - last.x);
        let mut y = self.transform.translate_y + (position.y - last.y);
        if self.config.enforce_boundaries {
            let (limit_x, limit_y) = self.pan_limits();
            let slack = self.config.max_overflow;
            x = x.clamp(-limit_x - slack, limit_x + slack);
            y = y.clamp(-limit_y - slack, limit_y + slack);
        }
        self.transform.translate_x = x;
        self.transform.translate_y = y;
        self.ports.apply(&self.transform);
    }

    /// Strict pan limit at the current scale: half the overflow the zoomed
    /// element has over its viewport.
    fn pan_limits(&self) -> (f32, f32) {
        let size = self.config.element_size;
        let scale = self.transform.scale;
        (
            ((size.width * scale - size.width) * 0.5).max(0.0),
            ((size.height * scale - size.height) * 0.5).max(0.0),
        )
    }

    fn handle_release(
        &mut self,
        remaining: usize,
        position: Point,
        timestamp_ms: u64,
        cancelled: bool,
    ) {
        let Some(session) = self.session.as_mut() else {
            log::debug!("pinch release without session dropped");
            return;
        };

        if remaining >= 2 {
            // Still two or more fingers down; the pair composition may have
            // changed, so re-anchor the pinch geometry.
            self.pinch = None;
            self.capture_pinch_origin();
            return;
        }
        if remaining == 1 {
            // The pinch pair broke; the remaining finger may keep panning.
            if session.committed_kind() == Some(GestureKind::Pinch) {
                self.pinch = None;
                self.end_zoom();
            }
            self.last_single_pos = self
                .stream
                .positions()
                .first()
                .map(|(_, position)| *position);
            return;
        }

        let was_tap =
            session.committed_kind().is_none() && !self.classifier.past_slop(session);
        if !session.begin_release() {
            return;
        }
        self.session = None;
        self.last_single_pos = None;
        self.pinch = None;
        self.end_zoom();

        if was_tap && !cancelled {
            self.handle_tap(position, timestamp_ms);
        } else {
            self.settle_into_range();
        }
    }

    fn end_zoom(&mut self) {
        if !self.zooming {
            return;
        }
        self.zooming = false;
        let scale = self.transform.scale;
        if let Some(on_zoom_end) = self.callbacks.on_zoom_end.as_mut() {
            guard_callback("on_zoom_end", || on_zoom_end(scale));
        }
    }

    fn handle_tap(&mut self, position: Point, timestamp_ms: u64) {
        if self.classifier.register_tap(timestamp_ms, position) {
            if let Some(on_double_tap) = self.callbacks.on_double_tap.as_mut() {
                guard_callback("on_double_tap", || on_double_tap());
            }
            let zoomed_in = self.transform.scale > self.config.min_scale + SCALE_EPSILON;
            let target_scale = if zoomed_in {
                self.config.min_scale
            } else {
                self.config.double_tap_scale
            };
            // The toggle resets pan and rotation in the same settle.
            self.animator.animate_to(
                self.transform,
                Transform::IDENTITY.with_scale(target_scale),
                self.config.motion,
            );
        } else if let Some(on_tap) = self.callbacks.on_tap.as_mut() {
            guard_callback("on_tap", || on_tap());
        }
    }

    /// Release settling: out-of-range transforms animate back into range; at
    /// minimum scale the pan and rotation reset fully to zero.
    fn settle_into_range(&mut self) {
        let mut target = self.transform;
        target.scale = target
            .scale
            .clamp(self.config.min_scale, self.config.max_scale);

        if target.scale <= self.config.min_scale + SCALE_EPSILON {
            target = Transform::IDENTITY.with_scale(self.config.min_scale);
        } else if self.config.enforce_boundaries {
            let (limit_x, limit_y) = self.pan_limits();
            target.translate_x = target.translate_x.clamp(-limit_x, limit_x);
            target.translate_y = target.translate_y.clamp(-limit_y, limit_y);
        }

        if !self.transform.approx_eq(&target, SCALE_EPSILON) {
            self.animator
                .animate_to(self.transform, target, self.config.motion);
        }
    }
}

impl GestureTarget for PinchZoom {
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
