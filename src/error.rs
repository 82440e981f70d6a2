//! Error types for simulation setup.

use core::fmt;

/// Errors raised while validating a configuration or resizing the arena.
///
/// Runtime input (pointer samples, tuning changes) is clamped rather than
/// rejected, so the tick path itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A chain needs an anchor and a tip.
    InvalidLinkCount { count: usize },
    /// Arena width and height must be positive and finite.
    InvalidArena { width: f32, height: f32 },
    /// Fixed step and frame cap must be positive and finite.
    InvalidTimestep,
    /// The solver needs at least one iteration.
    InvalidIterations,
    /// Link length, radius and mass must be positive and finite.
    InvalidChain,
    /// A tuning limit has `min > max` or a non-finite bound.
    InvalidTuningLimits { parameter: &'static str },
    /// A starting tuning value lies outside its limits.
    TuningOutOfRange { parameter: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidLinkCount { count } => {
                write!(f, "chain needs at least 2 links (got {})", count)
            }
            SimError::InvalidArena { width, height } => {
                write!(f, "arena must have positive size (got {}x{})", width, height)
            }
            SimError::InvalidTimestep => write!(f, "timestep must be positive and finite"),
            SimError::InvalidIterations => write!(f, "solver needs at least one iteration"),
            SimError::InvalidChain => {
                write!(f, "link length, radius and mass must be positive and finite")
            }
            SimError::InvalidTuningLimits { parameter } => {
                write!(f, "tuning limits for {} are inverted or non-finite", parameter)
            }
            SimError::TuningOutOfRange { parameter } => {
                write!(f, "starting {} lies outside its limits", parameter)
            }
        }
    }
}

impl core::error::Error for SimError {}

/// Result alias for fallible simulation setup.
pub type SimResult<T> = Result<T, SimError>;
