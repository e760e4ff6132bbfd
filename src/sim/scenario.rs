//! Initial populations
//!
//! Builders append balls to a solver before the first frame. They never
//! touch solver settings.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::{Ball, BallHandle, BallKind};
use super::error::SolverError;
use super::solver::PhysicsSolver;
use crate::rainbow;

/// Number of balls in a full set
pub const RACK_SIZE: u32 = 16;

/// Initial velocity given to every rack ball (per-step displacement)
pub const RACK_KICK: Vec2 = Vec2::new(0.0, 0.1);

/// Attempts to find a free spot before accepting an overlap
const PLACEMENT_ATTEMPTS: u32 = 32;

/// Sixteen balls on a diagonal, each with a small downward kick.
///
/// Ball `i` sits at `(2r + r*i, 2r + 2.1r*i)`, is labelled with its number
/// and coloured along the rainbow. Ball `0` is the cue ball.
pub fn diagonal_rack(solver: &mut PhysicsSolver, radius: f32) -> Result<Vec<BallHandle>, SolverError> {
    (0..RACK_SIZE)
        .map(|i| {
            let step = i as f32;
            let position = Vec2::new(radius * 2.0 + radius * step, radius * 2.0 + 2.1 * radius * step);
            let kind = if i == 0 { BallKind::Cue } else { BallKind::Regular };
            let mut ball = Ball::new(position, i.to_string(), kind)
                .with_radius(radius)?
                .with_color(rainbow(step));
            ball.body.add_velocity(RACK_KICK);
            solver.add_ball(ball)
        })
        .collect()
}

/// `count` balls at seeded random positions with random velocities up to
/// `max_speed` per axis. Placement avoids overlaps when a free spot turns
/// up within a bounded number of tries.
pub fn random_scatter(
    solver: &mut PhysicsSolver,
    seed: u64,
    count: u32,
    radius: f32,
    max_speed: f32,
) -> Result<Vec<BallHandle>, SolverError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let size = solver.world_size();
    let (lo_x, hi_x) = (radius, (size.x - radius).max(radius));
    let (lo_y, hi_y) = (radius, (size.y - radius).max(radius));
    let speed = max_speed.abs();
    let min_gap2 = (2.0 * radius) * (2.0 * radius);

    let mut handles = Vec::with_capacity(count as usize);
    for i in 0..count {
        let mut position = Vec2::ZERO;
        for _ in 0..PLACEMENT_ATTEMPTS {
            position = Vec2::new(rng.random_range(lo_x..=hi_x), rng.random_range(lo_y..=hi_y));
            let free = solver
                .balls()
                .iter()
                .all(|b| b.position().distance_squared(position) >= min_gap2);
            if free {
                break;
            }
        }

        let velocity = Vec2::new(rng.random_range(-speed..=speed), rng.random_range(-speed..=speed));
        let kind = if i == 0 { BallKind::Cue } else { BallKind::Regular };
        let mut ball = Ball::new(position, i.to_string(), kind)
            .with_radius(radius)?
            .with_color(rainbow(i as f32));
        ball.body.add_velocity(velocity);
        handles.push(solver.add_ball(ball)?);
    }

    log::info!("Scattered {} balls (seed {})", count, seed);
    Ok(handles)
}
