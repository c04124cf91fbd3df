use serde::{Deserialize, Serialize};

use crate::world::{Impact, PhysicsWorld};

/// Tolerance absorbing float drift when the accumulator sits right at one step.
const ACCUMULATOR_EPSILON: f64 = 1e-9;

/// Fixed-timestep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Internal fixed timestep in seconds.
    pub fixed_dt: f64,
    /// Maximum fixed steps per `step` call.
    pub max_substeps: u32,
    /// Largest frame delta accepted; larger deltas are clamped to this.
    pub max_delta: f64,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_substeps: 3,
            max_delta: 0.1,
        }
    }
}

/// Outcome of one `Stepper::step` call.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Delta actually fed to the accumulator, after clamping.
    pub delta: f64,
    pub substeps: u32,
    /// Collisions started during the substeps, in order.
    pub impacts: Vec<Impact>,
}

/// Advances a [`PhysicsWorld`] from wall-clock elapsed time.
///
/// Frame deltas are clamped to `max_delta` so a suspended tab or a frame hitch
/// cannot push a huge step into the solver, then consumed in fixed steps of
/// `fixed_dt`, at most `max_substeps` per call. Time left over after the cap
/// is dropped down to a fraction of one step.
#[derive(Debug, Clone)]
pub struct Stepper {
    config: StepperConfig,
    last_elapsed: f64,
    accumulator: f64,
    total_substeps: u64,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(StepperConfig::default())
    }
}

impl Stepper {
    pub fn new(config: StepperConfig) -> Self {
        Self {
            config,
            last_elapsed: 0.0,
            accumulator: 0.0,
            total_substeps: 0,
        }
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Elapsed time seen by the last accepted `step` call.
    pub fn last_elapsed(&self) -> f64 {
        self.last_elapsed
    }

    /// Fixed steps run since creation.
    pub fn total_substeps(&self) -> u64 {
        self.total_substeps
    }

    /// Advance `world` to `elapsed` seconds.
    ///
    /// Non-finite or non-increasing elapsed values run nothing. A negative
    /// delta means the clock was reset, so the reference point moves back.
    pub fn step(&mut self, elapsed: f64, world: &mut PhysicsWorld) -> StepReport {
        if !elapsed.is_finite() {
            tracing::warn!(elapsed, "non-finite elapsed time, frame skipped");
            return StepReport::default();
        }
        let raw = elapsed - self.last_elapsed;
        if raw <= 0.0 {
            if raw < 0.0 {
                tracing::debug!(elapsed, last = self.last_elapsed, "clock went backwards, rebasing");
                self.last_elapsed = elapsed;
            }
            return StepReport::default();
        }
        self.last_elapsed = elapsed;

        let delta = raw.min(self.config.max_delta);
        if delta < raw {
            tracing::debug!(raw, clamped = delta, "frame delta clamped");
        }

        let fixed = self.config.fixed_dt;
        self.accumulator += delta;
        let mut report = StepReport {
            delta,
            ..StepReport::default()
        };
        while self.accumulator + ACCUMULATOR_EPSILON >= fixed
            && report.substeps < self.config.max_substeps
        {
            report.impacts.extend(world.step_fixed(fixed as f32));
            self.accumulator = (self.accumulator - fixed).max(0.0);
            report.substeps += 1;
        }
        if self.accumulator >= fixed {
            self.accumulator %= fixed;
        }
        self.total_substeps += u64::from(report.substeps);

        tracing::trace!(
            delta,
            substeps = report.substeps,
            impacts = report.impacts.len(),
            "physics stepped"
        );
        report
    }
}
