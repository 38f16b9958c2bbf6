//! Animatable value types

use folio_core::Transform;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

/// The animated visual properties of one segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rotate: f32,
    pub scale: f32,
}

impl VisualState {
    /// Fully visible, no offset
    pub const REST: VisualState = VisualState {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        rotate: 0.0,
        scale: 1.0,
    };

    /// Hidden and pushed down by `offset_y` pixels
    pub fn hidden(offset_y: f32) -> Self {
        Self {
            opacity: 0.0,
            y: offset_y,
            ..Self::REST
        }
    }

    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::translate(self.x, self.y)
            .with_rotate(self.rotate)
            .with_scale(self.scale)
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::REST
    }
}

impl Interpolate for VisualState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity.lerp(&other.opacity, t),
            x: self.x.lerp(&other.x, t),
            y: self.y.lerp(&other.y, t),
            rotate: self.rotate.lerp(&other.rotate, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.opacity.approx_eq(&other.opacity, epsilon)
            && self.x.approx_eq(&other.x, epsilon)
            && self.y.approx_eq(&other.y, epsilon)
            && self.rotate.approx_eq(&other.rotate, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
    }
}
