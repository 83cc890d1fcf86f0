use glam::Vec2;

use crate::extensions::easing::approach;

/// Per-step ease factor for hover / pin scale feedback.
pub const SCALE_EASE: f32 = 0.05;

/// Circular orbit around the owner's origin. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    pub angle: f32,
    /// Degrees per simulation step (sign gives the direction).
    pub speed: f32,
}

impl Orbit {
    pub fn new(radius: f32, angle: f32, speed: f32) -> Self {
        Self { radius, angle, speed }
    }

    /// Advance the angle by one step, kept in [0, 360).
    pub fn step(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(360.0);
    }

    /// Cartesian position relative to the orbit center.
    pub fn position(&self) -> Vec2 {
        Vec2::from_angle(self.angle.to_radians()) * self.radius
    }
}

/// Visual scale smoothly following a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEase {
    pub current: f32,
    pub target: f32,
}

impl ScaleEase {
    pub fn new() -> Self {
        Self {
            current: 1.0,
            target: 1.0,
        }
    }

    pub fn step(&mut self) {
        self.current = approach(self.current, self.target, SCALE_EASE);
    }
}

impl Default for ScaleEase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_follows_angle() {
        let mut orbit = Orbit::new(100.0, 0.0, 90.0);
        assert!((orbit.position() - Vec2::new(100.0, 0.0)).length() < 1e-3);
        orbit.step();
        assert!((orbit.position() - Vec2::new(0.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn negative_speed_wraps() {
        let mut orbit = Orbit::new(10.0, 1.0, -2.0);
        orbit.step();
        assert!((orbit.angle - 359.0).abs() < 1e-4);
    }

    #[test]
    fn scale_eases_toward_target() {
        let mut s = ScaleEase::new();
        s.target = 1.1;
        s.step();
        assert!(s.current > 1.0 && s.current < 1.1);
    }
}
