//! Shared gesture constants for consistent touch/pointer handling.
//!
//! Thresholds are intentionally shared between the classifier and the
//! controllers to avoid "dead zones" where gestures behave inconsistently.
//! Values are in logical pixels.

/// Tap slop in logical pixels.
///
/// Movement past this distance from the initial press commits the session to
/// a pan/swipe kind and disqualifies it as a tap. 8.0 is large enough to
/// ignore finger jitter on touch screens, small enough to feel responsive,
/// and matches common platform conventions (Android uses ~8dp).
pub const TAP_SLOP: f32 = 8.0;

/// Second tap within this window (and within tap slop of the first) counts
/// as a double tap.
pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// A pan commits to the horizontal axis when |dx| exceeds |dy| by this
/// factor; anything else is treated as vertical motion.
pub const AXIS_LOCK_RATIO: f32 = 2.0;

/// Maximum release velocity in logical pixels per second, matching Android's
/// default maximum fling velocity on a baseline density.
pub const MAX_RELEASE_VELOCITY: f32 = 8_000.0;

/// Release velocity above this assists a swipe reveal even when the
/// displacement threshold was not reached.
pub const SWIPE_VELOCITY_THRESHOLD: f32 = 300.0;

/// Minimum displacement for a velocity-assisted swipe reveal.
pub const SWIPE_DISPLACEMENT_THRESHOLD: f32 = 10.0;
