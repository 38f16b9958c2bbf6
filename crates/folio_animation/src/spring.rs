//! Spring smoothing for pointer-driven offsets
//!
//! [`PointSpring`] chases a moving 2D target. It is tuned by angular
//! frequency and damping ratio rather than stiffness and mass, so a preset
//! reads directly as "how fast" and "how much overshoot". Integration is
//! semi-implicit Euler over fixed sub-steps, which keeps long or irregular
//! frames stable.

use folio_core::Point;

/// Longest integration sub-step (s)
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Distance (px) and speed (px/s) under which the spring is at rest
const REST_DISTANCE: f32 = 0.05;
const REST_SPEED: f32 = 1.0;

/// Spring tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Undamped angular frequency (rad/s)
    pub frequency: f32,
    /// 1.0 is critically damped; below 1.0 overshoots
    pub damping_ratio: f32,
}

impl SpringConfig {
    pub fn new(frequency: f32, damping_ratio: f32) -> Self {
        Self {
            frequency: frequency.max(0.0),
            damping_ratio: damping_ratio.max(0.0),
        }
    }

    /// Loose pull with a visible overshoot
    pub fn magnetic() -> Self {
        Self::new(12.0, 0.55)
    }

    /// Fast approach without overshoot
    pub fn settle() -> Self {
        Self::new(18.0, 1.0)
    }

    pub fn overshoots(&self) -> bool {
        self.damping_ratio < 1.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::settle()
    }
}

/// A point following its target on a damped spring
#[derive(Clone, Copy, Debug)]
pub struct PointSpring {
    config: SpringConfig,
    position: Point,
    velocity: Point,
    target: Point,
}

impl PointSpring {
    pub fn new(config: SpringConfig, at: Point) -> Self {
        Self {
            config,
            position: at,
            velocity: Point::ZERO,
            target: at,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn set_target(&mut self, target: Point) {
        self.target = target;
    }

    /// Place the point at `at` and stop it there
    pub fn jump_to(&mut self, at: Point) {
        self.position = at;
        self.target = at;
        self.velocity = Point::ZERO;
    }

    pub fn is_at_rest(&self) -> bool {
        self.position.distance(self.target) < REST_DISTANCE
            && Point::ZERO.distance(self.velocity) < REST_SPEED
    }

    /// Advance by `dt` seconds; snaps onto the target once at rest
    pub fn step(&mut self, dt: f32) {
        if dt > 0.0 {
            let steps = (dt / MAX_SUBSTEP).ceil().max(1.0);
            let h = dt / steps;
            for _ in 0..steps as u32 {
                self.substep(h);
            }
        }
        if self.is_at_rest() {
            self.jump_to(self.target);
        }
    }

    fn substep(&mut self, h: f32) {
        let omega = self.config.frequency;
        let pull = omega * omega;
        let drag = 2.0 * self.config.damping_ratio * omega;

        let ax = pull * (self.target.x - self.position.x) - drag * self.velocity.x;
        let ay = pull * (self.target.y - self.position.y) - drag * self.velocity.y;
        self.velocity.x += ax * h;
        self.velocity.y += ay * h;
        self.position.x += self.velocity.x * h;
        self.position.y += self.velocity.y * h;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut PointSpring, frames: usize) {
        for _ in 0..frames {
            spring.step(1.0 / 60.0);
        }
    }

    #[test]
    fn test_reaches_target_and_rests() {
        let mut spring = PointSpring::new(SpringConfig::settle(), Point::ZERO);
        spring.set_target(Point::new(40.0, -12.0));
        run(&mut spring, 120);
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), Point::new(40.0, -12.0));
        assert_eq!(spring.velocity(), Point::ZERO);
    }

    #[test]
    fn test_magnetic_preset_overshoots() {
        assert!(SpringConfig::magnetic().overshoots());
        assert!(!SpringConfig::settle().overshoots());

        let mut spring = PointSpring::new(SpringConfig::magnetic(), Point::ZERO);
        spring.set_target(Point::new(10.0, 0.0));
        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            spring.step(1.0 / 60.0);
            peak = peak.max(spring.position().x);
        }
        assert!(peak > 10.0);
        assert!(spring.is_at_rest());
    }

    #[test]
    fn test_long_frame_stays_stable() {
        let mut spring = PointSpring::new(SpringConfig::settle(), Point::ZERO);
        spring.set_target(Point::new(100.0, 0.0));
        spring.step(0.5);
        assert!(spring.position().x.is_finite());
        assert!(spring.position().x <= 100.5);
    }

    #[test]
    fn test_jump_to_stops_motion() {
        let mut spring = PointSpring::new(SpringConfig::default(), Point::ZERO);
        spring.set_target(Point::new(5.0, 5.0));
        spring.step(1.0 / 60.0);
        assert!(!spring.is_at_rest());
        spring.jump_to(Point::ZERO);
        assert!(spring.is_at_rest());
    }
}
