//! Easing functions
//!
//! Maps linear progress `t` in `[0, 1]` to eased progress. Names accepted by
//! [`Easing::from_str`] follow the familiar tweening vocabulary
//! (`"power3.out"`, `"expo.out"`, `"back.out"`, `"none"`).

use folio_core::FolioError;
use std::str::FromStr;

/// An easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutQuart,
    EaseOutQuint,
    EaseOutExpo,
    /// Overshoots slightly before settling
    EaseOutBack,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing to `t` (clamped to `[0, 1]`)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::EaseOutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_component(a: f32, b: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
}

fn bezier_slope(a: f32, b: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // Solve x(s) = t with Newton-Raphson, falling back to bisection
    let mut s = t;
    for _ in 0..8 {
        let x = bezier_component(x1, x2, s) - t;
        if x.abs() < 1e-5 {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= x / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = bezier_component(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_component(y1, y2, s)
}

impl FromStr for Easing {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.trim().to_ascii_lowercase().as_str() {
            "none" | "linear" => Easing::Linear,
            "power1.in" | "ease-in" => Easing::EaseIn,
            "power1.out" | "ease-out" => Easing::EaseOut,
            "power1.inout" | "ease-in-out" => Easing::EaseInOut,
            "power2.in" => Easing::EaseInCubic,
            "power2.out" => Easing::EaseOutCubic,
            "power2.inout" => Easing::EaseInOutCubic,
            "power3.out" => Easing::EaseOutQuart,
            "power4.out" => Easing::EaseOutQuint,
            "expo.out" => Easing::EaseOutExpo,
            "back.out" => Easing::EaseOutBack,
            "ease" => Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
            other => {
                return Err(FolioError::InvalidOption {
                    name: "easing",
                    reason: format!("unknown easing '{}'", other),
                })
            }
        };
        Ok(easing)
    }
}
