//! Configuration types for the simulation.

use crate::chain::ChainConfig;
use crate::clock::{FIXED_DT, MAX_FRAME_DELTA};
use crate::error::{SimError, SimResult};
use crate::float::Float;

/// Runtime-adjustable feel of the chain.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuning {
    /// Particles in the chain, anchor and tip included.
    pub link_count: usize,
    pub tip_mass: f32,
    /// Structural constraint weight. Values above 1 over-correct.
    pub stiffness: f32,
    /// Handle responsiveness multiplier.
    pub grip: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning { link_count: 18, tip_mass: 6.8, stiffness: 0.98, grip: 1.04 }
    }
}

/// Closed range for one continuous tuning parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningRange {
    pub min: f32,
    pub max: f32,
    /// Stepped adjustments round to `1 / resolution`.
    pub resolution: f32,
}

impl TuningRange {
    pub const fn new(min: f32, max: f32, resolution: f32) -> Self {
        TuningRange { min, max, resolution }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Round to the step resolution, then clamp.
    pub fn step(&self, value: f32) -> f32 {
        self.clamp((value * self.resolution).round() / self.resolution)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max && self.resolution > 0.0
    }
}

/// Bounds every tuning setter clamps into.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningLimits {
    pub link_count_min: usize,
    pub link_count_max: usize,
    pub tip_mass: TuningRange,
    pub stiffness: TuningRange,
    pub grip: TuningRange,
}

impl Default for TuningLimits {
    fn default() -> Self {
        TuningLimits {
            link_count_min: 10,
            link_count_max: 30,
            tip_mass: TuningRange::new(3.0, 14.0, 10.0),
            stiffness: TuningRange::new(0.68, 1.45, 100.0),
            grip: TuningRange::new(0.85, 1.6, 100.0),
        }
    }
}

impl TuningLimits {
    pub fn clamp_link_count(&self, count: usize) -> usize {
        count.clamp(self.link_count_min, self.link_count_max)
    }

    /// Clamp every field of `tuning`.
    pub fn clamp(&self, tuning: Tuning) -> Tuning {
        Tuning {
            link_count: self.clamp_link_count(tuning.link_count),
            tip_mass: self.tip_mass.clamp(tuning.tip_mass),
            stiffness: self.stiffness.clamp(tuning.stiffness),
            grip: self.grip.clamp(tuning.grip),
        }
    }

    fn validate(&self) -> SimResult<()> {
        if self.link_count_min < 2 || self.link_count_min > self.link_count_max {
            return Err(SimError::InvalidTuningLimits { parameter: "link_count" });
        }
        for (parameter, range) in [
            ("tip_mass", &self.tip_mass),
            ("stiffness", &self.stiffness),
            ("grip", &self.grip),
        ] {
            if !range.is_valid() {
                return Err(SimError::InvalidTuningLimits { parameter });
            }
        }
        if self.tip_mass.min <= 0.0 {
            return Err(SimError::InvalidTuningLimits { parameter: "tip_mass" });
        }
        Ok(())
    }
}

/// Everything needed to build a [`Simulation`](crate::Simulation).
///
/// # Builder Pattern
/// ```
/// use chainlash::config::SimConfig;
///
/// let config = SimConfig::new()
///     .with_arena(1920.0, 1080.0)
///     .with_iterations(12)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    /// Fixed tick length in seconds. Default: 1/120.
    pub fixed_dt: f32,
    /// Longest rendered frame `advance` will catch up on. Default: 0.033.
    pub max_frame_delta: f32,
    /// Solver iterations per tick. Default: 10.
    pub iterations: usize,
    pub chain: ChainConfig<f32>,
    pub tuning: Tuning,
    pub limits: TuningLimits,
    /// Seed for the default `SmallRng`.
    pub seed: u64,
    pub debris_cap: usize,
    pub ring_cap: usize,
}

impl SimConfig {
    pub fn new() -> Self {
        SimConfig {
            width: 1280.0,
            height: 720.0,
            fixed_dt: FIXED_DT,
            max_frame_delta: MAX_FRAME_DELTA,
            iterations: 10,
            chain: ChainConfig::default(),
            tuning: Tuning::default(),
            limits: TuningLimits::default(),
            seed: 0x5EED_C4A1,
            debris_cap: 320,
            ring_cap: 48,
        }
    }

    pub fn with_arena(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fixed_dt(mut self, fixed_dt: f32) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    pub fn with_max_frame_delta(mut self, max_frame_delta: f32) -> Self {
        self.max_frame_delta = max_frame_delta;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_chain(mut self, chain: ChainConfig<f32>) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_limits(mut self, limits: TuningLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_caps(mut self, debris_cap: usize, ring_cap: usize) -> Self {
        self.debris_cap = debris_cap;
        self.ring_cap = ring_cap;
        self
    }

    /// Check every field the simulation relies on.
    pub fn validate(&self) -> SimResult<()> {
        validate_arena(self.width, self.height)?;

        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.fixed_dt) || !positive(self.max_frame_delta) {
            return Err(SimError::InvalidTimestep);
        }
        if self.iterations == 0 {
            return Err(SimError::InvalidIterations);
        }
        let chain = &self.chain;
        if !positive(chain.link_length)
            || !positive(chain.link_radius)
            || !positive(chain.link_mass)
            || !(chain.link_drag > 0.0 && chain.link_drag <= 1.0)
        {
            return Err(SimError::InvalidChain);
        }

        self.limits.validate()?;
        let tuning = &self.tuning;
        if tuning.link_count < 2 {
            return Err(SimError::InvalidLinkCount { count: tuning.link_count });
        }
        if tuning.link_count < self.limits.link_count_min
            || tuning.link_count > self.limits.link_count_max
        {
            return Err(SimError::TuningOutOfRange { parameter: "link_count" });
        }
        for (parameter, range, value) in [
            ("tip_mass", &self.limits.tip_mass, tuning.tip_mass),
            ("stiffness", &self.limits.stiffness, tuning.stiffness),
            ("grip", &self.limits.grip, tuning.grip),
        ] {
            if !range.contains(value) {
                return Err(SimError::TuningOutOfRange { parameter });
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_arena(width: f32, height: f32) -> SimResult<()> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(SimError::InvalidArena { width, height });
    }
    Ok(())
}
