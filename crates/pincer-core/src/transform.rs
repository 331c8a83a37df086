//! The visual transform owned by a gesture controller.

/// Composed translation/scale/rotation applied to one visual element.
///
/// Each controller instance owns exactly one `Transform`; it is mutated only
/// inside that controller's sample handlers or by its settle animation, and
/// read by the renderer every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Rotation in radians.
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    pub const fn translation(x: f32, y: f32) -> Self {
        Transform {
            translate_x: x,
            translate_y: y,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Component-wise linear interpolation toward `target`.
    pub fn lerp(&self, target: &Transform, fraction: f32) -> Transform {
        Transform {
            translate_x: self.translate_x + (target.translate_x - self.translate_x) * fraction,
            translate_y: self.translate_y + (target.translate_y - self.translate_y) * fraction,
            scale: self.scale + (target.scale - self.scale) * fraction,
            rotation: self.rotation + (target.rotation - self.rotation) * fraction,
        }
    }

    /// Whether every component is within `epsilon` of `other`.
    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        (self.translate_x - other.translate_x).abs() <= epsilon
            && (self.translate_y - other.translate_y).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
            && (self.rotation - other.rotation).abs() <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
