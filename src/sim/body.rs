//! Verlet-integrated point mass
//!
//! Velocity is never stored. It is the displacement since the previous step,
//! `position - last_position`, so every velocity change goes through
//! `last_position`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BALL_RADIUS;

/// A circular point mass advanced with position Verlet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionBody {
    pub position: Vec2,
    /// Position before the last integration step
    pub last_position: Vec2,
    /// Accumulated for the next step, cleared by `integrate`
    pub acceleration: Vec2,
    pub radius: f32,
}

impl MotionBody {
    /// Create a body at rest with the default radius
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
            acceleration: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }

    /// Advance one step of `dt`
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        let velocity = self.position - self.last_position;
        self.last_position = self.position;
        self.position = self.position + velocity + self.acceleration * (dt * dt);
        self.acceleration = Vec2::ZERO;
    }

    /// Add to the acceleration applied by the next `integrate`
    #[inline]
    pub fn accelerate(&mut self, a: Vec2) {
        self.acceleration += a;
    }

    /// Inject an instantaneous velocity change (per-step displacement units)
    #[inline]
    pub fn add_velocity(&mut self, v: Vec2) {
        self.last_position -= v;
    }

    /// Replace the implicit velocity, keeping the current position
    #[inline]
    pub fn set_velocity(&mut self, v: Vec2) {
        self.last_position = self.position - v;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.last_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_at_rest_stays_put() {
        let mut body = MotionBody::new(Vec2::new(3.0, 4.0));
        body.integrate(1.0 / 60.0);
        assert_eq!(body.position, Vec2::new(3.0, 4.0));
        assert_eq!(body.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_add_velocity_moves_last_position() {
        let mut body = MotionBody::new(Vec2::new(3.0, 4.0));
        body.add_velocity(Vec2::new(0.5, -0.25));
        assert_eq!(body.position, Vec2::new(3.0, 4.0));
        assert_eq!(body.last_position, Vec2::new(2.5, 4.25));
        assert_eq!(body.velocity(), Vec2::new(0.5, -0.25));
    }

    #[test]
    fn test_integrate_carries_velocity() {
        let mut body = MotionBody::new(Vec2::new(0.0, 0.0));
        body.add_velocity(Vec2::new(1.0, 0.0));
        body.integrate(0.1);
        assert_eq!(body.position, Vec2::new(1.0, 0.0));
        assert_eq!(body.last_position, Vec2::ZERO);
        body.integrate(0.1);
        assert_eq!(body.position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_integrate_applies_and_clears_acceleration() {
        let mut body = MotionBody::new(Vec2::ZERO);
        body.accelerate(Vec2::new(0.0, 100.0));
        body.integrate(0.5);
        // a * dt^2 = 100 * 0.25
        assert!((body.position.y - 25.0).abs() < 1e-5);
        assert_eq!(body.acceleration, Vec2::ZERO);
        assert!((body.velocity().y - 25.0).abs() < 1e-5);
    }

    #[test]
    fn test_set_velocity() {
        let mut body = MotionBody::new(Vec2::new(5.0, 5.0));
        body.add_velocity(Vec2::new(1.0, 1.0));
        body.set_velocity(Vec2::new(-0.5, 0.0));
        assert_eq!(body.velocity(), Vec2::new(-0.5, 0.0));
        assert_eq!(body.position, Vec2::new(5.0, 5.0));
    }
}
