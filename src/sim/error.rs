//! Solver construction errors
//!
//! The per-frame path never fails; only building a solver or a ball does.

use std::fmt;

/// Invalid solver or ball configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverError {
    /// Both world dimensions must be positive
    InvalidWorldSize {
        width: i32,
        height: i32,
    },
    /// At least one sub-step per frame is required
    InvalidSubSteps {
        sub_steps: u32,
    },
    /// Grid cells need room for at least one body
    InvalidCellCapacity {
        capacity: u32,
    },
    /// Gravity must be finite
    InvalidGravity {
        x: f32,
        y: f32,
    },
    /// Radius must be finite and positive
    InvalidRadius {
        radius: f32,
    },
    /// Grid storage for this world would exceed `MAX_GRID_SLOTS`
    GridTooLarge {
        width: i32,
        height: i32,
        capacity: u32,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWorldSize { width, height } => {
                write!(f, "Invalid world size {width}x{height}: both dimensions must be positive")
            }
            Self::InvalidSubSteps { sub_steps } => {
                write!(f, "Invalid sub-step count {sub_steps}: must be at least 1")
            }
            Self::InvalidCellCapacity { capacity } => {
                write!(f, "Invalid cell capacity {capacity}: must be at least 1")
            }
            Self::InvalidGravity { x, y } => write!(f, "Invalid gravity ({x}, {y}): must be finite"),
            Self::InvalidRadius { radius } => {
                write!(f, "Invalid radius {radius}: must be finite and positive")
            }
            Self::GridTooLarge { width, height, capacity } => {
                write!(f, "Collision grid {width}x{height} with {capacity} slots per cell is too large")
            }
        }
    }
}

impl std::error::Error for SolverError {}
