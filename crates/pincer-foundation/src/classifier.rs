//! Gesture family classification from session deltas.

use pincer_core::Point;

use crate::gesture_constants::{AXIS_LOCK_RATIO, DOUBLE_TAP_TIMEOUT_MS, TAP_SLOP};
use crate::{GestureKind, GestureSession};

/// Classifies a live session into a gesture family and tracks the tap
/// history needed for double-tap detection.
///
/// Classification itself is pure; callers commit the result on the session
/// (via [`GestureSession::commit`]) once movement passes the slop, which
/// locks the kind for the rest of the session.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    tap_slop: f32,
    double_tap_timeout_ms: u64,
    axis_lock_ratio: f32,
    last_tap: Option<(u64, Point)>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            tap_slop: TAP_SLOP,
            double_tap_timeout_ms: DOUBLE_TAP_TIMEOUT_MS,
            axis_lock_ratio: AXIS_LOCK_RATIO,
            last_tap: None,
        }
    }

    /// Override thresholds. Out-of-range values are clamped to the nearest
    /// sane bound rather than rejected.
    pub fn with_thresholds(tap_slop: f32, double_tap_timeout_ms: u64, axis_lock_ratio: f32) -> Self {
        let mut classifier = Self::new();
        if !(0.0..=256.0).contains(&tap_slop) {
            log::warn!("tap slop {tap_slop} out of range, clamping");
        }
        classifier.tap_slop = tap_slop.clamp(0.0, 256.0);
        classifier.double_tap_timeout_ms = double_tap_timeout_ms.min(2_000);
        classifier.axis_lock_ratio = axis_lock_ratio.clamp(1.0, 10.0);
        classifier
    }

    pub fn tap_slop(&self) -> f32 {
        self.tap_slop
    }

    /// Whether the session has moved past the tap slop.
    pub fn past_slop(&self, session: &GestureSession) -> bool {
        let (dx, dy) = session.displacement();
        dx.abs() > self.tap_slop || dy.abs() > self.tap_slop
    }

    /// Classify the session's current samples into a gesture family.
    ///
    /// A committed session keeps its kind; otherwise: two or more active
    /// pointers mean pinch, motion past the slop locks an axis, and anything
    /// still inside the slop is a (potential) tap.
    pub fn classify(&self, session: &GestureSession) -> GestureKind {
        if let Some(kind) = session.committed_kind() {
            return kind;
        }
        if session.last().active_count >= 2 {
            return GestureKind::Pinch;
        }
        let (dx, dy) = session.displacement();
        if !self.past_slop(session) {
            if let Some((last_ms, last_pos)) = self.last_tap {
                let in_window = session.last().timestamp_ms.saturating_sub(last_ms)
                    < self.double_tap_timeout_ms;
                let in_slop = session.start().position.distance_to(last_pos) <= self.tap_slop;
                if in_window && in_slop {
                    return GestureKind::DoubleTap;
                }
            }
            return GestureKind::Tap;
        }
        if dx.abs() > dy.abs() * self.axis_lock_ratio {
            GestureKind::HorizontalPan
        } else {
            GestureKind::VerticalPan
        }
    }

    /// Record a completed tap and report whether it closes a double tap.
    ///
    /// A second tap within the timeout window and within tap slop of the
    /// first is a double tap; the history is consumed so a third tap starts
    /// fresh. A tap outside the window is always a fresh single tap.
    pub fn register_tap(&mut self, timestamp_ms: u64, position: Point) -> bool {
        if let Some((last_ms, last_pos)) = self.last_tap {
            let in_window = timestamp_ms.saturating_sub(last_ms) < self.double_tap_timeout_ms;
            let in_slop = position.distance_to(last_pos) <= self.tap_slop;
            if in_window && in_slop {
                self.last_tap = None;
                return true;
            }
        }
        self.last_tap = Some((timestamp_ms, position));
        false
    }

    /// Forget tap history (teardown, cancel).
    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincer_core::{PointerPhase, PointerSample};

    fn session_with_move(dx: f32, dy: f32, active_count: usize) -> GestureSession {
        let start = PointerSample::new(1, Point::new(100.0, 100.0), 0, 1, PointerPhase::Down);
        let mut session = GestureSession::new(1, start);
        session.observe(PointerSample::new(
            1,
            Point::new(100.0 + dx, 100.0 + dy),
            32,
            active_count,
            PointerPhase::Move,
        ));
        session
    }

    #[test]
    fn two_pointers_classify_as_pinch() {
        let classifier = GestureClassifier::new();
        let session = session_with_move(1.0, 1.0, 2);
        assert_eq!(classifier.classify(&session), GestureKind::Pinch);
    }

    #[test]
    fn inside_slop_is_a_tap() {
        let classifier = GestureClassifier::new();
        let session = session_with_move(3.0, -2.0, 1);
        assert_eq!(classifier.classify(&session), GestureKind::Tap);
    }

    #[test]
    fn dominant_horizontal_axis_locks_horizontal() {
        let classifier = GestureClassifier::new();
        let session = session_with_move(50.0, 10.0, 1);
        assert_eq!(classifier.classify(&session), GestureKind::HorizontalPan);
    }

    #[test]
    fn weakly_horizontal_motion_stays_vertical() {
        let classifier = GestureClassifier::new();
        // |dx| > |dy| but not by the 2x axis-lock ratio.
        let session = session_with_move(30.0, 20.0, 1);
        assert_eq!(classifier.classify(&session), GestureKind::VerticalPan);
    }

    #[test]
    fn committed_session_keeps_its_kind() {
        let classifier = GestureClassifier::new();
        let mut session = session_with_move(50.0, 5.0, 1);
        session.commit(GestureKind::HorizontalPan);
        session.observe(PointerSample::new(
            1,
            Point::new(100.0, 200.0),
            64,
            1,
            PointerPhase::Move,
        ));
        // Raw deltas now look vertical, but the commit is monotonic.
        assert_eq!(classifier.classify(&session), GestureKind::HorizontalPan);
    }

    #[test]
    fn second_press_in_the_tap_window_classifies_as_double_tap() {
        let mut classifier = GestureClassifier::new();
        assert!(!classifier.register_tap(0, Point::new(100.0, 100.0)));

        let start = PointerSample::new(1, Point::new(101.0, 100.0), 150, 1, PointerPhase::Down);
        let session = GestureSession::new(2, start);
        assert_eq!(classifier.classify(&session), GestureKind::DoubleTap);
    }

    #[test]
    fn double_tap_closes_within_window_and_slop() {
        let mut classifier = GestureClassifier::new();
        let pos = Point::new(50.0, 50.0);
        assert!(!classifier.register_tap(0, pos));
        assert!(classifier.register_tap(200, Point::new(52.0, 50.0)));
        // History was consumed; the next tap starts a fresh pair.
        assert!(!classifier.register_tap(250, pos));
    }

    #[test]
    fn stale_tap_is_a_fresh_single_tap() {
        let mut classifier = GestureClassifier::new();
        let pos = Point::new(50.0, 50.0);
        assert!(!classifier.register_tap(0, pos));
        assert!(!classifier.register_tap(1_000, pos));
        // But the stale tap re-armed the window.
        assert!(classifier.register_tap(1_100, pos));
    }

    #[test]
    fn distant_second_tap_is_not_a_double_tap() {
        let mut classifier = GestureClassifier::new();
        assert!(!classifier.register_tap(0, Point::new(10.0, 10.0)));
        assert!(!classifier.register_tap(100, Point::new(200.0, 10.0)));
    }
}
