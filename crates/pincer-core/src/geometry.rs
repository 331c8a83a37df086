//! Geometric primitives: Point, Size, Rect, and two-finger helpers.

/// Minimum pointer separation (logical px) below which pinch geometry is
/// considered degenerate and must not feed a scale ratio.
pub const MIN_PINCH_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width * 0.5,
            y: self.y + self.height * 0.5,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}

/// Distance between two touch points, or `None` when the separation is too
/// small to produce a stable scale ratio.
pub fn pinch_distance(a: Point, b: Point) -> Option<f32> {
    let dist = a.distance_to(b);
    if dist < MIN_PINCH_DISTANCE {
        None
    } else {
        Some(dist)
    }
}

/// Angle of the segment between two touch points, in radians.
pub fn pinch_angle(a: Point, b: Point) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_inclusive_of_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 30.0)));
        assert!(!rect.contains(Point::new(30.1, 30.0)));
    }

    #[test]
    fn rect_center() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn degenerate_pinch_distance_is_rejected() {
        let a = Point::new(5.0, 5.0);
        let b = Point::new(5.0, 5.5);
        assert_eq!(pinch_distance(a, b), None);
        assert!(pinch_distance(a, Point::new(25.0, 5.0)).is_some());
    }

    #[test]
    fn pinch_angle_follows_segment() {
        let a = Point::ZERO;
        assert!((pinch_angle(a, Point::new(10.0, 0.0))).abs() < 1e-6);
        let quarter = pinch_angle(a, Point::new(0.0, 10.0));
        assert!((quarter - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
