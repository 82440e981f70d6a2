//! Strike strength to damage, shattering, and explosive chain reactions.
//!
//! A strike first loses the tier threshold (a quarter less for blasts),
//! then scales by tip mass, tier damage scale and a cooldown factor. The
//! cooldown only reduces damage: the solver may touch the same pair on
//! several iterations of one tick, and each touch still wears the target
//! down a little.
//!
//! Shattered explosive targets push and damage their neighbours. Chain
//! reactions are processed through a FIFO worklist over target indices, so
//! nothing iterates a list while it is being mutated and broken targets
//! stay in place until the caller removes them.

use crate::vec::{Vec, Vec2};
use crate::target::Target;
use crate::tier::Tier;
use alloc::collections::VecDeque;
use alloc::vec::Vec as AllocVec;

/// Damage per unit of effective strength before scaling.
pub const DAMAGE_COEFFICIENT: f32 = 0.16;

const BLAST_THRESHOLD_SCALE: f32 = 0.75;
const BLAST_MASS_FACTOR: f32 = 0.96;
const DIRECT_COOLDOWN: f32 = 0.045;
const BLAST_COOLDOWN: f32 = 0.018;
const DIRECT_COOLDOWN_FACTOR: f32 = 0.34;
const BLAST_COOLDOWN_FACTOR: f32 = 0.66;
const FLASH_PER_HP_FRACTION: f32 = 2.1;

const BLAST_REACH_PER_STRENGTH: f32 = 0.32;
const BLAST_PUSH: f32 = 0.024;
const BLAST_FLASH: f32 = 0.7;
const BLAST_BASE_STRENGTH: f32 = 20.0;
const BLAST_STRENGTH_FALLOFF: f32 = 0.92;

/// What delivered a strike.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StrikeKind {
    /// The chain tip. Heavier tips hit harder.
    Direct { tip_mass: f32 },
    /// A neighbouring explosion.
    Blast,
}

/// A single qualifying hit on a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Strike {
    pub strength: f32,
    pub point: Vec2<f32>,
    /// Unit direction of the blow, pointing into the target.
    pub direction: Vec2<f32>,
    pub kind: StrikeKind,
}

impl Strike {
    pub fn direct(strength: f32, point: Vec2<f32>, direction: Vec2<f32>, tip_mass: f32) -> Self {
        Strike { strength, point, direction, kind: StrikeKind::Direct { tip_mass } }
    }

    pub fn blast(strength: f32, point: Vec2<f32>, direction: Vec2<f32>) -> Self {
        Strike { strength, point, direction, kind: StrikeKind::Blast }
    }

    pub fn is_blast(&self) -> bool {
        matches!(self.kind, StrikeKind::Blast)
    }

    /// Strength absorbed by `tier` before damage starts.
    pub fn threshold(&self, tier: Tier) -> f32 {
        let threshold = tier.spec().threshold;
        if self.is_blast() { threshold * BLAST_THRESHOLD_SCALE } else { threshold }
    }

    fn mass_factor(&self) -> f32 {
        match self.kind {
            StrikeKind::Direct { tip_mass } => 0.7 + tip_mass * 0.09,
            StrikeKind::Blast => BLAST_MASS_FACTOR,
        }
    }

    fn cooldown_factor(&self) -> f32 {
        if self.is_blast() { BLAST_COOLDOWN_FACTOR } else { DIRECT_COOLDOWN_FACTOR }
    }

    fn cooldown(&self) -> f32 {
        if self.is_blast() { BLAST_COOLDOWN } else { DIRECT_COOLDOWN }
    }
}

/// Result of applying one strike.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DamageOutcome {
    /// Below threshold, or the target was already broken.
    Ignored,
    Damaged { damage: f32 },
    /// This strike took the last hit points.
    Shattered { damage: f32 },
}

/// Damage `strike` would deal to `target` right now.
pub fn damage_for(target: &Target, strike: &Strike) -> f32 {
    let effective = (strike.strength - strike.threshold(target.tier())).max(0.0);
    if effective <= 0.0 {
        return 0.0;
    }
    let cooldown = if target.in_cooldown() { strike.cooldown_factor() } else { 1.0 };
    effective
        * DAMAGE_COEFFICIENT
        * strike.mass_factor()
        * target.tier().spec().damage_scale
        * cooldown
}

/// Apply `strike` to `target`, moving it toward `Broken`.
pub fn apply_strike(target: &mut Target, strike: &Strike) -> DamageOutcome {
    if target.broken {
        return DamageOutcome::Ignored;
    }
    let damage = damage_for(target, strike);
    if damage <= 0.0 {
        return DamageOutcome::Ignored;
    }

    target.hp -= damage;
    if target.max_hp > 0.0 {
        target.add_flash(damage / target.max_hp * FLASH_PER_HP_FRACTION);
    }
    target.hit_cooldown = strike.cooldown();

    if target.hp <= 0.0 {
        target.hp = 0.0;
        target.broken = true;
        DamageOutcome::Shattered { damage }
    } else {
        DamageOutcome::Damaged { damage }
    }
}

/// An explosion centred on a shattered explosive target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blast {
    pub center: Vec2<f32>,
    pub radius: f32,
    pub power: f32,
    /// Strength of the strike that set it off.
    pub strength: f32,
}

impl Blast {
    /// The blast produced when `target` shatters, if its tier explodes.
    pub fn from_shatter(target: &Target, strength: f32) -> Option<Blast> {
        let spec = target.tier().spec().blast?;
        Some(Blast {
            center: target.position(),
            radius: target.radius() * spec.radius_scale + strength * BLAST_REACH_PER_STRENGTH,
            power: (0.42 + spec.power_scale * 0.24) * strength,
            strength,
        })
    }

    /// Centre distance within which a body of `radius` is caught.
    pub fn reach(&self, radius: f32) -> f32 {
        self.radius + radius
    }
}

/// Record of a target that broke during strike resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shatter {
    pub index: usize,
    pub tier: Tier,
    pub position: Vec2<f32>,
    pub radius: f32,
    pub hue: f32,
    pub saturation: f32,
    pub point: Vec2<f32>,
    pub direction: Vec2<f32>,
    pub strength: f32,
    pub blast: Option<Blast>,
}

/// Apply `strike` to `targets[index]` and everything its destruction sets
/// off. Every target that breaks is appended to `shatters` in the order it
/// broke. Returns the outcome of the initial strike.
pub fn resolve_strike(
    targets: &mut [Target],
    index: usize,
    strike: Strike,
    shatters: &mut AllocVec<Shatter>,
) -> DamageOutcome {
    let mut pending = VecDeque::new();
    pending.push_back((index, strike));
    let mut first = None;

    while let Some((i, strike)) = pending.pop_front() {
        let outcome = apply_strike(&mut targets[i], &strike);
        first.get_or_insert(outcome);

        if let DamageOutcome::Shattered { .. } = outcome {
            let target = &targets[i];
            let blast = Blast::from_shatter(target, strike.strength);
            shatters.push(Shatter {
                index: i,
                tier: target.tier(),
                position: target.position(),
                radius: target.radius(),
                hue: target.hue(),
                saturation: target.saturation(),
                point: strike.point,
                direction: strike.direction,
                strength: strike.strength,
                blast,
            });
            tracing::trace!(index = i, tier = target.tier().name(), strength = strike.strength, "target shattered");

            if let Some(blast) = blast {
                propagate_blast(targets, i, &blast, &mut pending);
            }
        }
    }

    first.unwrap_or(DamageOutcome::Ignored)
}

/// Kick every live neighbour in reach and queue a blast strike on it.
fn propagate_blast(
    targets: &mut [Target],
    source: usize,
    blast: &Blast,
    pending: &mut VecDeque<(usize, Strike)>,
) {
    for (j, other) in targets.iter_mut().enumerate() {
        if j == source || other.broken {
            continue;
        }

        let delta = other.position() - blast.center;
        let mut dist = delta.length();
        if dist == 0.0 {
            dist = 0.0001;
        }
        let reach = blast.reach(other.radius());
        if dist > reach {
            continue;
        }

        let normal = delta.scale(1.0 / dist);
        let falloff = 1.0 - dist / reach;
        let push = blast.power * falloff * BLAST_PUSH;
        other.body.add_velocity(normal.scale(push));
        other.add_flash(falloff * BLAST_FLASH);

        let strength = BLAST_BASE_STRENGTH + blast.strength * falloff * BLAST_STRENGTH_FALLOFF;
        pending.push_back((j, Strike::blast(strength, other.position(), normal)));
    }
}
