//! Fixed-step frame driver with hit-stop.

/// Default fixed step: 120 Hz.
pub const FIXED_DT: f32 = 1.0 / 120.0;
/// Longest frame the driver will catch up on.
pub const MAX_FRAME_DELTA: f32 = 0.033;

/// Freeze for a shattering strike of `strength`.
pub fn shatter_hit_stop(strength: f32) -> f32 {
    ((strength - 20.0) * 0.00014).clamp(0.0, 0.01)
}

/// Freeze for a hard, non-shattering tip impact of `strength`.
pub fn impact_hit_stop(strength: f32) -> f32 {
    ((strength - 26.0) * 0.00007).clamp(0.0, 0.0035)
}

/// What one rendered frame should do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FramePlan {
    /// Hit-stop consumed the frame; run no ticks.
    Frozen,
    /// Run this many fixed ticks.
    Ticks(usize),
}

/// Accumulates rendered frame time into whole fixed steps.
#[derive(Clone, Debug)]
pub struct FixedClock {
    step: f32,
    max_frame_delta: f32,
    accumulator: f32,
    hit_stop: f32,
}

impl FixedClock {
    pub fn new(step: f32, max_frame_delta: f32) -> Self {
        FixedClock { step, max_frame_delta, accumulator: 0.0, hit_stop: 0.0 }
    }

    /// Queue a freeze. Overlapping freezes do not stack; the longest wins.
    pub fn queue_hit_stop(&mut self, amount: f32) {
        if amount > 0.0 {
            self.hit_stop = self.hit_stop.max(amount);
        }
    }

    /// Plan a frame that lasted `frame_delta` seconds, capped at the
    /// configured maximum. Negative and non-finite deltas count as zero.
    pub fn plan(&mut self, frame_delta: f32) -> FramePlan {
        let delta = if frame_delta.is_finite() {
            frame_delta.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        };

        if self.hit_stop > 0.0 {
            self.hit_stop = (self.hit_stop - delta).max(0.0);
            return FramePlan::Frozen;
        }

        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        FramePlan::Ticks(ticks)
    }

    /// Capped frame duration in 60 Hz frames, for per-frame decay.
    pub fn frame_scale(&self, frame_delta: f32) -> f32 {
        if !frame_delta.is_finite() {
            return 0.0;
        }
        frame_delta.clamp(0.0, self.max_frame_delta) * 60.0
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn hit_stop_remaining(&self) -> f32 {
        self.hit_stop
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.hit_stop = 0.0;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(FIXED_DT, MAX_FRAME_DELTA)
    }
}
