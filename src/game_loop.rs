//! Fixed-timestep driver
//!
//! Accumulates real frame time and runs the update callback in fixed
//! increments, so simulation speed is independent of display rate. The
//! substep cap keeps a long stall from snowballing into a death spiral.

use std::time::{Duration, Instant};

use crate::consts::MAX_SUBSTEPS;

pub struct GameLoop {
    last_update: Instant,
    accumulator: Duration,
    fixed_timestep: Duration,
}

impl GameLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            last_update: Instant::now(),
            accumulator: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / fps as f64),
        }
    }

    /// Run `update_fn(dt)` once per elapsed fixed step (at most MAX_SUBSTEPS)
    pub fn tick<F>(&mut self, mut update_fn: F)
    where
        F: FnMut(f32),
    {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_update);
        self.last_update = now;

        self.accumulator += frame_time;

        let dt = self.fixed_timestep.as_secs_f32();
        let mut substeps = 0;
        while self.accumulator >= self.fixed_timestep && substeps < MAX_SUBSTEPS {
            update_fn(dt);
            self.accumulator -= self.fixed_timestep;
            substeps += 1;
        }
        // Drop backlog we are not going to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = Duration::ZERO;
        }
    }

    pub fn delta_time(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}
