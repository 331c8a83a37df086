//! Interruptible settle animation driving a transform toward a target.

use pincer_core::Transform;

use crate::{MotionSpec, SpringSpec, TweenSpec};

/// Hard upper bound on any settle animation. Past this the transform is set
/// to the target directly, so a mis-tuned spring can never leave an element
/// drifting forever.
pub const MAX_SETTLE_MS: u64 = 2_000;

/// Fixed sub-step for spring integration, ~60fps for stability.
const SPRING_TIMESTEP: f32 = 0.016;

/// Transforms are considered equal below this per-component delta.
const SETTLE_EPSILON: f32 = 1e-4;

/// Result of advancing the animator by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettleFrame {
    pub transform: Transform,
    /// True exactly once, on the frame the animation reached its target.
    pub done: bool,
}

struct ActiveSettle {
    start: Transform,
    target: Transform,
    current: Transform,
    spec: MotionSpec,
    start_time_ms: Option<u64>,
    last_time_ms: Option<u64>,
    /// Progress from 0 (start) toward 1 (target); springs may overshoot.
    progress: f32,
    /// Progress-space velocity for spring physics.
    velocity: f32,
    /// Start and target coincide; settle on the first frame.
    degenerate: bool,
}

/// Drives an interruptible settle animation from a current transform to a
/// target transform.
///
/// The animator is advanced cooperatively: the controller calls
/// [`SpringAnimator::on_frame`] once per host frame and applies the returned
/// transform. Starting a new animation or calling [`SpringAnimator::cancel`]
/// drops the in-flight one without ever reporting it as done, so two settle
/// handlers cannot fight over the same transform.
#[derive(Default)]
pub struct SpringAnimator {
    active: Option<ActiveSettle>,
}

impl SpringAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin animating from `from` to `target`, replacing (and silently
    /// cancelling) any in-flight animation.
    pub fn animate_to(&mut self, from: Transform, target: Transform, spec: MotionSpec) {
        let degenerate = from.approx_eq(&target, SETTLE_EPSILON);
        self.active = Some(ActiveSettle {
            start: from,
            target,
            current: from,
            spec,
            start_time_ms: None,
            last_time_ms: None,
            progress: 0.0,
            velocity: 0.0,
            degenerate,
        });
    }

    /// Drop the in-flight animation without reporting completion.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<Transform> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Advance the animation to `now_ms`.
    ///
    /// Returns the transform to apply this frame, or `None` when idle. The
    /// frame with `done == true` is the last one; the animator is idle
    /// afterwards.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<SettleFrame> {
        let active = self.active.as_mut()?;

        let start_time = *active.start_time_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start_time);

        if active.degenerate || elapsed >= MAX_SETTLE_MS {
            // Fallback to a hard set; springs with pathological tuning stop here.
            let target = active.target;
            self.active = None;
            return Some(SettleFrame {
                transform: target,
                done: true,
            });
        }

        let (transform, done) = match active.spec {
            MotionSpec::Tween(spec) => Self::step_tween(active, spec, elapsed),
            MotionSpec::Spring(spec) => Self::step_spring(active, spec, now_ms),
        };
        active.last_time_ms = Some(now_ms);

        if done {
            self.active = None;
        }
        Some(SettleFrame { transform, done })
    }

    fn step_tween(active: &mut ActiveSettle, spec: TweenSpec, elapsed_ms: u64) -> (Transform, bool) {
        if elapsed_ms < spec.delay_ms {
            return (active.current, false);
        }
        let animating_ms = elapsed_ms - spec.delay_ms;
        let duration_ms = spec.duration_ms.max(1);
        let linear = (animating_ms as f32 / duration_ms as f32).clamp(0.0, 1.0);
        let eased = spec.easing.transform(linear);

        active.current = active.start.lerp(&active.target, eased);
        if linear >= 1.0 {
            active.current = active.target;
            (active.target, true)
        } else {
            (active.current, false)
        }
    }

    fn step_spring(active: &mut ActiveSettle, spec: SpringSpec, now_ms: u64) -> (Transform, bool) {
        let last = match active.last_time_ms {
            Some(last) => last,
            // First frame establishes the time base; nothing to integrate yet.
            None => return (active.current, false),
        };
        let dt = now_ms.saturating_sub(last) as f32 / 1_000.0;
        if dt <= 0.0 {
            return (active.current, false);
        }

        // Semi-implicit Euler over fixed sub-steps. Position is modeled as
        // progress along the start -> target segment with the target at 1.0.
        let stiffness = spec.stiffness;
        let damping = 2.0 * spec.damping_ratio * stiffness.sqrt();

        let mut integrated = 0.0f32;
        while integrated < dt {
            let step = SPRING_TIMESTEP.min(dt - integrated);
            let displacement = active.progress - 1.0;
            let force = -stiffness * displacement - damping * active.velocity;
            active.velocity += force * step;
            active.progress += active.velocity * step;
            integrated += step;
        }

        active.current = active
            .start
            .lerp(&active.target, active.progress.clamp(0.0, 2.0));

        let at_rest = active.velocity.abs() < spec.velocity_threshold;
        let near_target = (active.progress - 1.0).abs() < spec.position_threshold;
        if at_rest && near_target {
            active.current = active.target;
            (active.target, true)
        } else {
            (active.current, false)
        }
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
