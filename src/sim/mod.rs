//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt`, fixed sub-step count
//! - Seeded RNG only (scenarios)
//! - Stable iteration order (by ball handle, then grid cell)
//! - No rendering or platform dependencies

pub mod ball;
pub mod body;
pub mod error;
pub mod grid;
pub mod scenario;
pub mod solver;

pub use ball::{Ball, BallHandle, BallKind};
pub use body::MotionBody;
pub use error::SolverError;
pub use grid::CollisionGrid;
pub use scenario::{RACK_SIZE, diagonal_rack, random_scatter};
pub use solver::{PhysicsSolver, SolverConfig, StepStats};
