//! Sub-stepped Verlet solver
//!
//! Each frame is split into `sub_steps` equal slices. Every slice runs, in
//! this order: grid rebuild, collision resolution, integration with boundary
//! handling. Resolving contacts before integrating on every slice is what
//! keeps dense piles from exploding.
//!
//! Bodies moving more than one cell per sub-step can pass through each other
//! undetected. Raise `sub_steps` or lower `dt` if that matters.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallHandle, BallKind};
use super::body::MotionBody;
use super::error::SolverError;
use super::grid::CollisionGrid;
use crate::consts::*;

/// Construction parameters for a solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// World rectangle `[0, x] x [0, y]`, also the grid size in cells
    pub world_size: IVec2,
    pub sub_steps: u32,
    /// Constant acceleration applied to every body
    pub gravity: Vec2,
    /// Body slots per grid cell
    pub cell_capacity: u32,
}

impl SolverConfig {
    pub fn new(world_size: IVec2) -> Self {
        Self {
            world_size,
            sub_steps: SUB_STEPS,
            gravity: Vec2::ZERO,
            cell_capacity: CELL_CAPACITY,
        }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if self.world_size.x <= 0 || self.world_size.y <= 0 {
            return Err(SolverError::InvalidWorldSize {
                width: self.world_size.x,
                height: self.world_size.y,
            });
        }
        if self.sub_steps == 0 {
            return Err(SolverError::InvalidSubSteps { sub_steps: self.sub_steps });
        }
        if self.cell_capacity == 0 {
            return Err(SolverError::InvalidCellCapacity {
                capacity: self.cell_capacity,
            });
        }
        if !self.gravity.is_finite() {
            return Err(SolverError::InvalidGravity {
                x: self.gravity.x,
                y: self.gravity.y,
            });
        }
        let slots = (self.world_size.x as usize)
            .checked_mul(self.world_size.y as usize)
            .and_then(|cells| cells.checked_mul(self.cell_capacity as usize));
        if !slots.is_some_and(|n| n <= MAX_GRID_SLOTS) {
            return Err(SolverError::GridTooLarge {
                width: self.world_size.x,
                height: self.world_size.y,
                capacity: self.cell_capacity,
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(IVec2::new(WORLD_SIZE.0, WORLD_SIZE.1))
    }
}

/// Diagnostics for the most recent `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub sub_steps: u32,
    /// Narrow-phase pair tests, self pairs and repeats included
    pub contact_checks: u64,
    /// Pairs that overlapped and were pushed apart
    pub contacts_resolved: u64,
    /// Coincident-pair checks skipped, repeats included
    pub degenerate: u64,
    /// Grid inserts lost to full or out-of-range cells
    pub dropped_inserts: u64,
}

/// Owns the balls and the collision grid
#[derive(Debug, Clone)]
pub struct PhysicsSolver {
    balls: Vec<Ball>,
    grid: CollisionGrid,
    world_size: Vec2,
    gravity: Vec2,
    sub_steps: u32,
    stats: StepStats,
    frames: u64,
    overflow_warned: bool,
}

impl PhysicsSolver {
    /// Solver with default sub-steps, zero gravity and default cell capacity
    pub fn new(world_size: IVec2) -> Result<Self, SolverError> {
        Self::with_config(SolverConfig::new(world_size))
    }

    pub fn with_config(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let size = config.world_size;
        log::info!(
            "Solver world {}x{}, {} sub-steps, gravity ({}, {}), {} slots per cell",
            size.x,
            size.y,
            config.sub_steps,
            config.gravity.x,
            config.gravity.y,
            config.cell_capacity
        );
        Ok(Self {
            balls: Vec::new(),
            grid: CollisionGrid::new(size.x as u32, size.y as u32, config.cell_capacity),
            world_size: size.as_vec2(),
            gravity: config.gravity,
            sub_steps: config.sub_steps,
            stats: StepStats::default(),
            frames: 0,
            overflow_warned: false,
        })
    }

    // === Population ===

    /// Append a regular ball at rest and return its handle
    pub fn create_ball(&mut self, position: Vec2, label: impl Into<String>) -> BallHandle {
        self.create_ball_with(position, label, BallKind::Regular)
    }

    pub fn create_ball_with(
        &mut self,
        position: Vec2,
        label: impl Into<String>,
        kind: BallKind,
    ) -> BallHandle {
        self.push(Ball::new(position, label, kind))
    }

    /// Append a prepared ball. Fails if its radius is not finite and positive.
    pub fn add_ball(&mut self, ball: Ball) -> Result<BallHandle, SolverError> {
        let radius = ball.radius();
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SolverError::InvalidRadius { radius });
        }
        Ok(self.push(ball))
    }

    fn push(&mut self, ball: Ball) -> BallHandle {
        let handle = BallHandle(self.balls.len() as u32);
        log::debug!("Ball {} '{}' at ({}, {})", handle.0, ball.label, ball.position().x, ball.position().y);
        self.balls.push(ball);
        handle
    }

    // === Access ===

    /// Balls in handle order
    #[inline]
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Mutable view; the slice keeps handles stable
    #[inline]
    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn ball(&self, handle: BallHandle) -> Option<&Ball> {
        self.balls.get(handle.index())
    }

    pub fn ball_mut(&mut self, handle: BallHandle) -> Option<&mut Ball> {
        self.balls.get_mut(handle.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    #[inline]
    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    #[inline]
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<(), SolverError> {
        if !gravity.is_finite() {
            return Err(SolverError::InvalidGravity {
                x: gravity.x,
                y: gravity.y,
            });
        }
        self.gravity = gravity;
        Ok(())
    }

    #[inline]
    pub fn sub_steps(&self) -> u32 {
        self.sub_steps
    }

    pub fn set_sub_steps(&mut self, sub_steps: u32) -> Result<(), SolverError> {
        if sub_steps == 0 {
            return Err(SolverError::InvalidSubSteps { sub_steps });
        }
        self.sub_steps = sub_steps;
        Ok(())
    }

    /// Broad-phase grid as built by the last sub-step
    #[inline]
    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    #[inline]
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Frames advanced so far
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    // === Stepping ===

    /// Advance the simulation by `dt`, split into `sub_steps` slices.
    ///
    /// A negative or non-finite `dt` skips the frame and leaves every body as is.
    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt >= 0.0) {
            log::warn!("Skipping frame {} with invalid dt {}", self.frames + 1, dt);
            self.stats = StepStats::default();
            return;
        }
        self.stats = StepStats {
            sub_steps: self.sub_steps,
            ..Default::default()
        };
        let sub_dt = dt / self.sub_steps as f32;
        for _ in 0..self.sub_steps {
            self.rebuild_grid();
            self.solve_collisions();
            self.update_bodies(sub_dt);
        }
        self.frames += 1;

        if self.stats.dropped_inserts > 0 {
            if self.overflow_warned {
                log::debug!("Frame {}: {} grid inserts dropped", self.frames, self.stats.dropped_inserts);
            } else {
                log::warn!(
                    "Collision grid overflow at frame {}: {} inserts dropped (capacity {} per cell)",
                    self.frames,
                    self.stats.dropped_inserts,
                    self.grid.capacity()
                );
                self.overflow_warned = true;
            }
        }
    }

    /// Re-index every ball into the cells its bounding box touches
    pub fn rebuild_grid(&mut self) {
        self.grid.clear();
        let last_x = self.grid.width() as i32 - 1;
        let last_y = self.grid.height() as i32 - 1;

        for (i, ball) in self.balls.iter().enumerate() {
            let MotionBody { position: p, radius: r, .. } = ball.body;
            let min_x = ((p.x - r) as i32).max(0);
            let max_x = ((p.x + r) as i32).min(last_x);
            let min_y = ((p.y - r) as i32).max(0);
            let max_y = ((p.y + r) as i32).min(last_y);

            for x in min_x..=max_x {
                for y in min_y..=max_y {
                    self.grid.insert(x, y, i as u32);
                }
            }
        }
        self.stats.dropped_inserts += self.grid.dropped() as u64;
    }

    /// Test every ball against everything in its cell's 3x3 neighbourhood.
    ///
    /// Self pairs and pairs sharing several cells are visited more than once;
    /// repeats after the first correction find the pair already separated.
    pub fn solve_collisions(&mut self) {
        let grid = &self.grid;
        let balls = &mut self.balls;
        let stats = &mut self.stats;

        for cell in 0..grid.len() {
            for &i in grid.cell(cell) {
                for neighbor in grid.neighbors(cell) {
                    for &j in grid.cell(neighbor) {
                        resolve_contact(balls, i as usize, j as usize, stats);
                    }
                }
            }
        }
    }

    /// Push balls `a` and `b` apart if they overlap. Unknown handles are ignored.
    pub fn solve_contact(&mut self, a: BallHandle, b: BallHandle) {
        let (i, j) = (a.index(), b.index());
        if i >= self.balls.len() || j >= self.balls.len() {
            return;
        }
        resolve_contact(&mut self.balls, i, j, &mut self.stats);
    }

    /// Gravity, integration and wall contact for every ball
    pub fn update_bodies(&mut self, dt: f32) {
        let gravity = self.gravity;
        let size = self.world_size;
        for ball in &mut self.balls {
            let body = &mut ball.body;
            body.accelerate(gravity);
            body.integrate(dt);
            contain(body, size);
        }
    }

    // === Diagnostics ===

    /// Deepest overlap over all pairs, by brute force
    pub fn max_penetration(&self) -> f32 {
        let mut deepest = 0.0f32;
        for (i, a) in self.balls.iter().enumerate() {
            for b in &self.balls[i + 1..] {
                let overlap = a.radius() + b.radius() - a.position().distance(b.position());
                deepest = deepest.max(overlap);
            }
        }
        deepest
    }

    /// Sum of `|v|^2 / 2` with unit masses, velocity in per-step units
    pub fn kinetic_energy(&self) -> f32 {
        self.balls.iter().map(|b| 0.5 * b.velocity().length_squared()).sum()
    }
}

/// Equal and opposite positional correction for one pair
#[inline]
fn resolve_contact(balls: &mut [Ball], i: usize, j: usize, stats: &mut StepStats) {
    stats.contact_checks += 1;

    let (a, b) = (&balls[i].body, &balls[j].body);
    let delta = a.position - b.position;
    let dist2 = delta.length_squared();
    let radius_sum = a.radius + b.radius;

    if dist2 >= radius_sum * radius_sum {
        return;
    }
    if dist2 <= CONTACT_EPS {
        if i != j {
            stats.degenerate += 1;
        }
        return;
    }

    let dist = dist2.sqrt();
    let correction = delta / dist * (RESPONSE_COEF * 0.5 * (radius_sum - dist));
    balls[i].body.position += correction;
    balls[j].body.position -= correction;
    stats.contacts_resolved += 1;
}

/// Snap to the padded world rectangle, reflecting only the crossed axis
#[inline]
fn contain(body: &mut MotionBody, size: Vec2) {
    let margin = body.radius;

    if body.position.x > size.x - margin {
        let v = body.velocity();
        body.position.x = size.x - margin;
        body.set_velocity(Vec2::new(-v.x, v.y));
    } else if body.position.x < margin {
        let v = body.velocity();
        body.position.x = margin;
        body.set_velocity(Vec2::new(-v.x, v.y));
    }

    if body.position.y > size.y - margin {
        let v = body.velocity();
        body.position.y = size.y - margin;
        body.set_velocity(Vec2::new(v.x, -v.y));
    } else if body.position.y < margin {
        let v = body.velocity();
        body.position.y = margin;
        body.set_velocity(Vec2::new(v.x, -v.y));
    }
}
