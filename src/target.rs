//! Destructible circular targets.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;
use crate::tier::Tier;
use alloc::vec::Vec as AllocVec;
use rand::Rng;

const TARGET_DRAG: f32 = 0.9975;
const CRACK_COUNT: f32 = 8.0;

/// Visible damage state of a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetState {
    Intact,
    /// `hp < max_hp`, not yet broken.
    Damaged,
    /// Terminal. Excluded from collision and damage, removed at tick end.
    Broken,
}

/// A destructible body with a tier-driven hit-point pool.
#[derive(Clone, Debug)]
pub struct Target {
    pub(crate) body: Particle<Vec2<f32>>,
    pub(crate) tier: Tier,
    pub(crate) max_hp: f32,
    pub(crate) hp: f32,
    pub(crate) hit_cooldown: f32,
    pub(crate) broken: bool,
    pub(crate) flash: f32,
    pub(crate) lift: f32,
    hue: f32,
    crack_angles: AllocVec<f32>,
    crack_bias: f32,
}

impl Target {
    /// Roll hit points, hue and crack pattern for a new target.
    pub fn new<R: Rng + ?Sized>(pos: Vec2<f32>, radius: f32, tier: Tier, rng: &mut R) -> Self {
        let spec = tier.spec();
        let max_hp = radius * rng.gen_range(2.45..2.95) * spec.hp_scale;
        let mut target = Self::with_max_hp(pos, radius, tier, max_hp);
        target.hue = rng.gen_range(spec.hue_min..spec.hue_max);
        target.crack_bias = rng.gen_range(0.0..core::f32::consts::TAU);
        let cracks = (CRACK_COUNT * spec.crack_scale).round() as usize;
        target.crack_angles = (0..cracks)
            .map(|_| rng.gen_range(0.0..core::f32::consts::TAU))
            .collect();
        target
    }

    /// A target with an explicit hit-point pool and no crack pattern.
    pub fn with_max_hp(pos: Vec2<f32>, radius: f32, tier: Tier, max_hp: f32) -> Self {
        let spec = tier.spec();
        let mass = radius * radius * 0.03 * spec.mass_scale;
        let max_hp = max_hp.max(0.0);
        Target {
            body: Particle::new(pos, radius, mass, TARGET_DRAG),
            tier,
            max_hp,
            hp: max_hp,
            hit_cooldown: 0.0,
            broken: false,
            flash: 0.0,
            lift: 0.0,
            hue: (spec.hue_min + spec.hue_max) * 0.5,
            crack_angles: AllocVec::new(),
            crack_bias: 0.0,
        }
    }

    /// Post-solve bookkeeping for one tick: motion-driven lift, flash fade
    /// and cooldown countdown.
    pub fn settle(&mut self, dt: f32) {
        if self.broken {
            return;
        }
        let speed = self.body.speed();
        self.lift += (speed * 0.26 - self.lift) * 0.14;
        self.lift *= 0.92;
        self.flash *= 0.9;
        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);
    }

    /// Launch the target with a per-tick velocity.
    pub fn set_velocity(&mut self, velocity: Vec2<f32>) {
        self.body.set_velocity(velocity);
    }

    pub(crate) fn add_flash(&mut self, amount: f32) {
        self.flash = (self.flash + amount).clamp(0.0, 1.0);
    }

    pub fn state(&self) -> TargetState {
        if self.broken {
            TargetState::Broken
        } else if self.hp < self.max_hp {
            TargetState::Damaged
        } else {
            TargetState::Intact
        }
    }

    pub fn body(&self) -> &Particle<Vec2<f32>> {
        &self.body
    }

    pub fn position(&self) -> Vec2<f32> {
        self.body.pos
    }

    pub fn velocity(&self) -> Vec2<f32> {
        self.body.velocity()
    }

    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Remaining hit points in `[0, 1]`.
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn hit_cooldown(&self) -> f32 {
        self.hit_cooldown
    }

    pub fn in_cooldown(&self) -> bool {
        self.hit_cooldown > 0.0
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn lift(&self) -> f32 {
        self.lift
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.tier.spec().saturation
    }

    pub fn crack_angles(&self) -> &[f32] {
        &self.crack_angles
    }

    pub fn crack_bias(&self) -> f32 {
        self.crack_bias
    }

    /// Whether this target's circle overlaps `other`'s, allowing `slack`.
    pub fn overlaps(&self, other: &Target, slack: f32) -> bool {
        let min_dist = self.radius() + other.radius() - slack;
        min_dist > 0.0 && self.position().distance_sq(other.position()) < min_dist * min_dist
    }
}
