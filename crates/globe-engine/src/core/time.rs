/// Fixed timestep accumulator for the frame driver.
/// Host frames arrive at whatever rate the browser schedules them; the
/// globe simulation always advances in `dt`-sized steps so per-tick damping
/// (burst particles) behaves the same at 30 Hz and 144 Hz.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on steps per host frame.
    max_steps: u32,
}

impl FixedTimestep {
    /// Steps allowed per host frame before time is dropped.
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt: dt.max(1e-4),
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add host frame time. Returns the number of fixed steps to run.
    /// A tab that was in the background for seconds does not replay them all:
    /// the backlog is capped at `max_steps`.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
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
