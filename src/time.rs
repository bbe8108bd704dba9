//! Fixed-step clock for the typewriter.
//!
//! `draw_web()` fires at the display refresh rate with a variable delta.
//! `GameTime` turns that into whole steps of `ms_per_step`, so the reveal
//! speed does not depend on the frame rate.

/// Frames further apart than this (a backgrounded tab) count as this long.
const MAX_FRAME_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_step: f64,
    /// Milliseconds not yet consumed as steps.
    accumulator: f64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ms_per_step` is clamped to at least 1 ms.
    pub fn new(ms_per_step: u32) -> Self {
        Self {
            ms_per_step: ms_per_step.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed the frame timestamp (`performance.now()`), get the number of
    /// whole steps that elapsed since the previous frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let steps = (self.accumulator / self.ms_per_step) as u32;
        self.accumulator -= steps as f64 * self.ms_per_step;
        steps
    }
}
