//! Fixed-timestep driver
//!
//! Hosts feed wall-clock frame times; the stepper turns them into whole
//! physics ticks of a constant size and reports how far the next tick has
//! progressed so rendering can interpolate.

use tracing::debug;

use crate::simulation::PhysicsWorld;

/// Default tick length in seconds
pub const DEFAULT_DT: f32 = 1.0 / 60.0;
/// Default catch-up limit per frame
pub const DEFAULT_MAX_STEPS: u32 = 8;

/// Accumulator-based fixed-timestep stepper.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedStepper {
    dt: f32,
    /// Simulation time per wall-clock second
    pub speed: f32,
    /// Most ticks run by a single [`FixedStepper::advance`]
    pub max_steps: u32,
    accumulator: f32,
}

/// What a call to [`FixedStepper::advance`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    pub steps: u32,
    /// Progress toward the next tick, in `[0, 1)`
    pub alpha: f32,
    /// Simulation time discarded because the catch-up limit was hit
    pub dropped: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(DEFAULT_DT)
    }
}

impl FixedStepper {
    /// A stepper with tick length `dt`; invalid values fall back to 1/60 s.
    #[must_use]
    pub fn new(dt: f32) -> Self {
        Self {
            dt: if dt.is_finite() && dt > 0.0 { dt } else { DEFAULT_DT },
            speed: 1.0,
            max_steps: DEFAULT_MAX_STEPS,
            accumulator: 0.0,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Run as many ticks as `frame_dt` (scaled by `speed`) pays for.
    pub fn advance(&mut self, world: &mut PhysicsWorld, frame_dt: f32) -> StepReport {
        let scaled = frame_dt * self.speed;
        if scaled.is_finite() && scaled > 0.0 {
            self.accumulator += scaled;
        }

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_steps {
            world.update(self.dt);
            self.accumulator -= self.dt;
            steps += 1;
        }

        let mut dropped = 0.0;
        if self.accumulator >= self.dt {
            let keep = self.accumulator % self.dt;
            dropped = self.accumulator - keep;
            self.accumulator = keep;
            debug!(dropped, steps, "physics fell behind, dropping time");
        }

        StepReport {
            steps,
            alpha: (self.accumulator / self.dt).clamp(0.0, 1.0 - f32::EPSILON),
            dropped,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn runs_whole_ticks_and_keeps_remainder() {
        let mut world = PhysicsWorld::default();
        let mut stepper = FixedStepper::new(0.01);
        let report = stepper.advance(&mut world, 0.035);
        assert_eq!(report.steps, 3);
        assert!((report.alpha - 0.5).abs() < 1e-3);
        assert_eq!(world.tick(), 3);
        let report = stepper.advance(&mut world, 0.006);
        assert_eq!(report.steps, 1);
        assert!(report.alpha < 0.2);
    }

    #[test]
    fn catch_up_is_clamped() {
        let mut world = PhysicsWorld::default();
        let mut stepper = FixedStepper::new(0.01).with_max_steps(4);
        let report = stepper.advance(&mut world, 1.0);
        assert_eq!(report.steps, 4);
        assert!(report.dropped > 0.9);
        assert!((0.0..1.0).contains(&report.alpha));
        assert_eq!(world.tick(), 4);
    }

    #[test]
    fn speed_scales_simulated_time() {
        let mut world = PhysicsWorld::default();
        let mut stepper = FixedStepper::new(0.01).with_speed(2.0);
        assert_eq!(stepper.advance(&mut world, 0.0225).steps, 4);
        let mut paused = FixedStepper::new(0.01).with_speed(0.0);
        assert_eq!(paused.advance(&mut world, 1.0).steps, 0);
    }

    #[test]
    fn invalid_dt_falls_back() {
        assert_eq!(FixedStepper::new(-1.0).dt(), DEFAULT_DT);
    }
}
