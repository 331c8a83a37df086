//! Snap point resolution.

use pincer_core::Point;

/// Finds the Euclidean-nearest snap point within a threshold.
///
/// The point set is static per controller instance; mutate it only between
/// gestures.
#[derive(Debug, Clone)]
pub struct SnapResolver {
    points: Vec<Point>,
    threshold: f32,
}

impl SnapResolver {
    pub fn new(points: Vec<Point>, threshold: f32) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            log::warn!("snap threshold {threshold} invalid, clamping to 0");
            0.0
        };
        Self { points, threshold }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Nearest snap point within the threshold, or `None` when nothing is in
    /// range. On an exact distance tie the earlier point in the set wins.
    pub fn resolve(&self, position: Point) -> Option<Point> {
        let mut best: Option<(f32, Point)> = None;
        for &point in &self.points {
            let distance = position.distance_to(point);
            if distance > self.threshold {
                continue;
            }
            match best {
                Some((best_distance, _)) if best_distance <= distance => {}
                _ => best = Some((distance, point)),
            }
        }
        best.map(|(_, point)| point)
    }
}
