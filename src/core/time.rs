use crate::api::context::PhysicsContext;

/// Fixed timestep accumulator.
/// Ensures the simulation advances at a consistent rate regardless of how
/// uneven the host's frame deltas are.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Couples a [`PhysicsContext`] to a fixed timestep so hosts with a variable
/// frame clock can drive the simulation with a single `tick` call.
pub struct PhysicsRunner {
    timestep: FixedTimestep,
    pub ctx: PhysicsContext,
}

impl PhysicsRunner {
    pub fn new(ctx: PhysicsContext, fixed_dt: f32) -> Self {
        Self {
            timestep: FixedTimestep::new(fixed_dt),
            ctx,
        }
    }

    /// Feed one frame's delta; runs zero or more fixed steps on the context.
    /// Returns the number of steps taken.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.ctx.step(self.timestep.dt());
        }
        steps
    }

    /// Interpolation alpha for rendering between ticks.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}
