/// Most simulation steps run for a single host frame. A window that was
/// hidden for a minute resumes instead of fast-forwarding the whole minute.
pub const MAX_STEPS_PER_FRAME: u32 = 10;

const FALLBACK_DT: f32 = 1.0 / 60.0;

/// Fixed timestep accumulator.
/// Turns irregular host frame times into a whole number of simulation steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// A non-positive or non-finite `dt` falls back to 1/60 s.
    pub fn new(dt: f32) -> Self {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { FALLBACK_DT };
        Self { dt, accumulator: 0.0 }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// Negative or non-finite frame times are ignored.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Drop any partial step (e.g. after a rebuild).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn long_pause_is_capped() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(60.0), MAX_STEPS_PER_FRAME);
    }

    #[test]
    fn garbage_input_is_ignored() {
        let mut ts = FixedTimestep::new(0.0);
        assert_eq!(ts.dt(), FALLBACK_DT);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(-1.0), 0);
        ts.accumulate(0.01);
        ts.reset();
        assert_eq!(ts.accumulate(0.01), 0);
    }
}
