//! Boundary clamping with resistance.

use pincer_core::Size;

/// Rectangular translation limits for a gesture controller.
///
/// Each side is optional; a missing side leaves that direction unbounded.
/// The usable range on an axis is `[min_bound, max_bound - element_size]`,
/// computed from the configured container edges and the element size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPolicy {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    /// Damping applied to movement past a bound: 0.0 = none, 1.0 = rigid.
    pub resistance: f32,
    /// Hard cap on how far past a bound the element may visually travel.
    pub max_overflow: f32,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self {
            left: None,
            top: None,
            right: None,
            bottom: None,
            resistance: 0.5,
            max_overflow: 64.0,
        }
    }
}

impl BoundaryPolicy {
    /// Clamp out-of-range configuration to the nearest valid value.
    pub fn sanitize(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.resistance) {
            log::warn!("boundary resistance {} out of [0,1], clamping", self.resistance);
            self.resistance = self.resistance.clamp(0.0, 1.0);
        }
        if self.max_overflow < 0.0 || !self.max_overflow.is_finite() {
            log::warn!("max_overflow {} invalid, clamping to 0", self.max_overflow);
            self.max_overflow = 0.0;
        }
        self
    }

    fn x_range(&self, size: Size) -> (Option<f32>, Option<f32>) {
        normalize_range(self.left, self.right.map(|r| r - size.width))
    }

    fn y_range(&self, size: Size) -> (Option<f32>, Option<f32>) {
        normalize_range(self.top, self.bottom.map(|b| b - size.height))
    }

    /// Hard clamp of a candidate translation. Idempotent:
    /// `clamp(clamp(p)) == clamp(p)`.
    pub fn clamp(&self, x: f32, y: f32, size: Size) -> (f32, f32) {
        let (lo_x, hi_x) = self.x_range(size);
        let (lo_y, hi_y) = self.y_range(size);
        (clamp_axis(x, lo_x, hi_x), clamp_axis(y, lo_y, hi_y))
    }

    /// Soft clamp used while the gesture is live: movement past a bound is
    /// damped by the resistance factor and capped at `max_overflow`.
    pub fn resist(&self, x: f32, y: f32, size: Size) -> (f32, f32) {
        let (lo_x, hi_x) = self.x_range(size);
        let (lo_y, hi_y) = self.y_range(size);
        (
            resist_scalar(x, lo_x, hi_x, self.resistance, self.max_overflow),
            resist_scalar(y, lo_y, hi_y, self.resistance, self.max_overflow),
        )
    }

    /// Whether a translation lies within the hard limits.
    pub fn is_within(&self, x: f32, y: f32, size: Size, epsilon: f32) -> bool {
        let (cx, cy) = self.clamp(x, y, size);
        (cx - x).abs() <= epsilon && (cy - y).abs() <= epsilon
    }

    /// Lowest in-bounds y translation, used as the gravity rest position.
    pub fn gravity_floor(&self, size: Size) -> Option<f32> {
        self.y_range(size).1
    }
}

fn normalize_range(lo: Option<f32>, hi: Option<f32>) -> (Option<f32>, Option<f32>) {
    match (lo, hi) {
        // An element larger than its container collapses to the low edge.
        (Some(lo), Some(hi)) if hi < lo => (Some(lo), Some(lo)),
        other => other,
    }
}

fn clamp_axis(value: f32, lo: Option<f32>, hi: Option<f32>) -> f32 {
    let mut value = value;
    if let Some(lo) = lo {
        value = value.max(lo);
    }
    if let Some(hi) = hi {
        value = value.min(hi);
    }
    value
}

/// Scalar resistance: values past `[lo, hi]` are damped by `resistance` and
/// capped at `max_overflow` past the bound. Shared by the drag boundary
/// model and the swipe friction model so both feel identical.
pub fn resist_scalar(
    value: f32,
    lo: Option<f32>,
    hi: Option<f32>,
    resistance: f32,
    max_overflow: f32,
) -> f32 {
    if let Some(lo) = lo {
        if value < lo {
            let overflow = ((lo - value) * (1.0 - resistance)).min(max_overflow);
            return lo - overflow;
        }
    }
    if let Some(hi) = hi {
        if value > hi {
            let overflow = ((value - hi) * (1.0 - resistance)).min(max_overflow);
            return hi + overflow;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BoundaryPolicy {
        BoundaryPolicy {
            left: Some(0.0),
            top: Some(0.0),
            right: Some(300.0),
            bottom: Some(300.0),
            resistance: 0.5,
            max_overflow: 40.0,
        }
    }

    const SIZE: Size = Size::new(100.0, 100.0);

    #[test]
    fn in_range_translation_is_untouched() {
        assert_eq!(policy().clamp(50.0, 120.0, SIZE), (50.0, 120.0));
    }

    #[test]
    fn clamp_accounts_for_element_size() {
        // x range is [0, 300 - 100].
        assert_eq!(policy().clamp(250.0, 0.0, SIZE), (200.0, 0.0));
        assert_eq!(policy().clamp(-10.0, 0.0, SIZE), (0.0, 0.0));
    }

    #[test]
    fn clamp_is_idempotent() {
        let p = policy();
        for candidate in [(-500.0, 900.0), (150.0, 150.0), (1e6, -1e6)] {
            let once = p.clamp(candidate.0, candidate.1, SIZE);
            assert_eq!(p.clamp(once.0, once.1, SIZE), once);
        }
    }

    #[test]
    fn resistance_dampens_overflow() {
        let p = policy();
        // 20px past the left bound at 0.5 resistance shows as 10px.
        let (x, _) = p.resist(-20.0, 0.0, SIZE);
        assert_eq!(x, -10.0);
    }

    #[test]
    fn overflow_is_capped() {
        let p = policy();
        let (x, _) = p.resist(-10_000.0, 0.0, SIZE);
        assert_eq!(x, -40.0);
    }

    #[test]
    fn unbounded_axis_passes_through() {
        let p = BoundaryPolicy::default();
        assert_eq!(p.clamp(-999.0, 999.0, SIZE), (-999.0, 999.0));
        assert_eq!(p.resist(-999.0, 999.0, SIZE), (-999.0, 999.0));
    }

    #[test]
    fn oversized_element_collapses_to_low_edge() {
        let p = policy();
        let big = Size::new(500.0, 100.0);
        assert_eq!(p.clamp(200.0, 0.0, big).0, 0.0);
    }

    #[test]
    fn sanitize_clamps_bad_config() {
        let p = BoundaryPolicy {
            resistance: 1.7,
            max_overflow: -5.0,
            ..BoundaryPolicy::default()
        }
        .sanitize();
        assert_eq!(p.resistance, 1.0);
        assert_eq!(p.max_overflow, 0.0);
    }
}
