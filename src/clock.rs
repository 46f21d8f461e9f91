//! Maps host animation-frame callbacks to simulation steps
//!
//! By default every callback is exactly one step, so speed follows the
//! display's refresh rate. With a fixed rate the clock accumulates real time
//! and hands out whole steps, capped to avoid a spiral of death.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Seconds per step in fixed-rate mode
    step_dt: Option<f32>,
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FrameClock {
    /// One step per callback
    pub fn per_frame() -> Self {
        Self {
            step_dt: None,
            accumulator: 0.0,
            last_time_ms: None,
        }
    }

    /// Fixed-rate stepping at `hz`; falls back to per-frame for a bad rate
    pub fn fixed(hz: f32) -> Self {
        let step_dt = (hz.is_finite() && hz > 0.0).then(|| 1.0 / hz);
        Self {
            step_dt,
            ..Self::per_frame()
        }
    }

    pub fn from_config(fixed_step_hz: Option<f32>) -> Self {
        match fixed_step_hz {
            Some(hz) => Self::fixed(hz),
            None => Self::per_frame(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.step_dt.is_some()
    }

    /// Number of steps to run for a callback at `now_ms` (host timestamp)
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let last = self.last_time_ms.replace(now_ms);
        let Some(step_dt) = self.step_dt else {
            return 1;
        };

        // First callback counts as exactly one step
        let dt = match last {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => step_dt,
        };
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= step_dt && steps < MAX_SUBSTEPS {
            self.accumulator -= step_dt;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog rather than carry it into the next frame
            self.accumulator = self.accumulator.min(step_dt);
        }
        steps
    }

    /// Forget elapsed time (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::per_frame()
    }
}
