//! Ball entity: a motion body with an identity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::MotionBody;
use super::error::SolverError;

/// Ball category. Classification only, both kinds share the same physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallKind {
    /// Cannot be shot by the cue
    #[default]
    Regular,
    /// Can be shot by the cue
    Cue,
}

/// Stable handle to a ball owned by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallHandle(pub u32);

impl BallHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub body: MotionBody,
    /// Ball number or name
    pub label: String,
    pub kind: BallKind,
    /// Display colour (RGB), not used by the physics
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

impl Ball {
    pub fn new(position: Vec2, label: impl Into<String>, kind: BallKind) -> Self {
        Self {
            body: MotionBody::new(position),
            label: label.into(),
            kind,
            color: default_color(),
        }
    }

    /// Override the radius. Fails unless `radius` is finite and positive.
    pub fn with_radius(mut self, radius: f32) -> Result<Self, SolverError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SolverError::InvalidRadius { radius });
        }
        self.body.radius = radius;
        Ok(self)
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    /// Whether the cue may strike this ball
    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_RADIUS;

    #[test]
    fn test_ball_defaults() {
        let ball = Ball::new(Vec2::new(2.0, 3.0), "8", BallKind::Regular);
        assert_eq!(ball.label, "8");
        assert_eq!(ball.radius(), BALL_RADIUS);
        assert_eq!(ball.velocity(), Vec2::ZERO);
        assert_eq!(ball.color, [255, 255, 255]);
        assert!(!ball.is_cue());
    }

    #[test]
    fn test_with_radius_rejects_bad_values() {
        let ball = Ball::new(Vec2::ZERO, "0", BallKind::Cue);
        assert!(ball.clone().with_radius(0.0).is_err());
        assert!(ball.clone().with_radius(-1.0).is_err());
        assert!(ball.clone().with_radius(f32::NAN).is_err());
        let big = ball.with_radius(2.5).unwrap();
        assert_eq!(big.radius(), 2.5);
        assert!(big.is_cue());
    }

    #[test]
    fn test_label_survives_json() {
        let ball = Ball::new(Vec2::new(1.5, 2.5), "15", BallKind::Regular).with_color([1, 2, 3]);
        let json = serde_json::to_string(&ball).unwrap();
        let back: Ball = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ball);
    }
}
