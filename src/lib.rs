//! Fixed-step physics core for a chain-swinging destruction toy.
//!
//! `chainlash` drives a pointer-anchored Verlet chain with a heavy tip through
//! an arena of destructible circular targets. Everything runs at a fixed
//! internal rate, independent of the rendering rate, and is deterministic
//! for a given seed and input stream.
//!
//! # Features
//!
//! - **Verlet integration**: position-based dynamics with implicit velocity
//! - **Constraint relaxation**: structural and bend constraints, arena bounds
//! - **Circle collisions**: restitution and clamped friction impulses
//! - **Tiered targets**: soft, armored, explosive and metallic, with damage
//!   thresholds, hit cooldowns and chain-reaction blasts
//! - **Game feel**: turn-snap handle, recoil, hit-stop, debris and impact rings
//! - **Event queue**: impacts and shatters for audio and UI collaborators
//! - **Observable**: watch tick phases via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod collision;
pub mod chain;
pub mod handle;
pub mod tier;
pub mod target;
pub mod damage;
pub mod effects;
pub mod events;
pub mod clock;
pub mod observer;
pub mod config;
pub mod error;
pub mod simulation;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use particle::Particle;
pub use constraint::{Bounds, DistanceConstraint};
pub use collision::{resolve_circles, Contact, ContactMaterial};
pub use chain::{Chain, ChainConfig};
pub use handle::HandleController;
pub use tier::{Tier, TierSpec};
pub use target::{Target, TargetState};
pub use damage::{DamageOutcome, Strike};
pub use effects::{Debris, ImpactRing, Rgb};
pub use events::SimEvent;
pub use clock::FixedClock;
pub use observer::{StepObserver, NoOpStepObserver};
pub use config::{SimConfig, Tuning, TuningLimits};
pub use error::{SimError, SimResult};
pub use simulation::{Simulation, SpawnOptions};
