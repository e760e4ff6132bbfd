//! Verlet Pool - a sub-stepped ball solver
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collision grid, solver, scenarios)
//! - `settings`: JSON configuration for the solver and the host loop

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Ball, BallHandle, BallKind, CollisionGrid, MotionBody, PhysicsSolver, SolverConfig, SolverError};

/// Solver configuration constants
pub mod consts {
    /// Sub-steps per rendered frame
    pub const SUB_STEPS: u32 = 8;
    /// Default ball radius, shared by every ball unless overridden
    pub const BALL_RADIUS: f32 = 1.0;
    /// Slots per collision grid cell
    pub const CELL_CAPACITY: u32 = 8;
    /// Upper bound on `width * height * capacity` grid slots (1 GiB of indices)
    pub const MAX_GRID_SLOTS: usize = 1 << 28;
    /// Squared distance under which two centers count as coincident
    pub const CONTACT_EPS: f32 = 0.0001;
    /// Fraction of the overlap corrected per contact
    pub const RESPONSE_COEF: f32 = 1.0;
    /// Host frame-rate cap
    pub const FPS_CAP: u32 = 60;
    /// World size used by the driver when no settings file is given
    pub const WORLD_SIZE: (i32, i32) = (100, 100);
}

/// Rainbow colour for a scalar parameter, cycling every 2π.
///
/// Each channel is a squared sine shifted by a third of a turn, so
/// consecutive integers give well separated hues.
#[inline]
pub fn rainbow(t: f32) -> [u8; 3] {
    use std::f32::consts::TAU;
    let channel = |phase: f32| {
        let s = (t + phase * TAU).sin();
        (255.0 * s * s) as u8
    };
    [channel(0.0), channel(0.33), channel(0.66)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_zero_is_not_red() {
        let [r, g, b] = rainbow(0.0);
        assert_eq!(r, 0);
        assert!(g > 0);
        assert!(b > 0);
    }

    #[test]
    fn test_rainbow_distinct_for_neighbours() {
        let a = rainbow(1.0);
        let b = rainbow(2.0);
        assert_ne!(a, b);
    }
}
