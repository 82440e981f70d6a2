//! The simulation: one owner for the chain, the arena and everything in it.
//!
//! A tick runs in a fixed order:
//!
//! 1. Handle update (and turn-snap kick to the first links).
//! 2. Verlet integration of every non-anchor link and live target.
//! 3. `iterations` solver passes: re-pin anchor, structural and bend
//!    constraints, chain self-collision, chain against targets, targets
//!    against each other, arena bounds.
//! 4. Target settling, removal of broken targets, debris update, decay of
//!    the impact and shake readouts.
//!
//! Only the tip's contacts with targets count as hits. A hit may damage and
//! shatter the target and, for explosive tiers, set off a chain reaction
//! that is resolved before the solver moves on.

use crate::vec::{Vec, Vec2};
use crate::chain::Chain;
use crate::clock::{impact_hit_stop, shatter_hit_stop, FixedClock, FramePlan};
use crate::collision::{pair_mut, resolve_circles, Contact, ContactMaterial};
use crate::config::{validate_arena, SimConfig, Tuning};
use crate::constraint::Bounds;
use crate::damage::{resolve_strike, Shatter, Strike};
use crate::effects::{Debris, DebrisBurst, Effects, ImpactRing, Rgb};
use crate::error::SimResult;
use crate::events::{EventQueue, SimEvent};
use crate::handle::{HandleController, SNAP_LINKS};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::target::Target;
use crate::tier::Tier;
use alloc::vec::Vec as AllocVec;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const CHAIN_BOUNCE: f32 = 0.38;
const TARGET_BOUNCE: f32 = 0.35;

/// Relative normal speed (per tick) to impact strength.
const IMPACT_SCALE: f32 = 24.0;
const IMPACT_EVENT_MIN: f32 = 15.0;
const DAMAGE_MIN: f32 = 12.0;
const IMPACT_HIT_STOP_MIN: f32 = 24.0;
const CONTACT_FLASH: f32 = 0.0035;

const RECOIL_BASE: f32 = 10.0;
const RECOIL_RATE: f32 = 0.058;
const RECOIL_MAX: f32 = 9.5;
const RECOIL_HANDLE: f32 = 2.1;
const RECOIL_LINK: f32 = 0.42;
const RECOIL_LINKS: usize = 6;

const SHATTER_RING: f32 = 1.25;
const CORE_RING: f32 = 0.92;
const BLAST_CORE_RING: f32 = 1.8;
const BLAST_EDGE_RING: f32 = 1.35;

const SHAKE_RATE: f32 = 0.064;
const SHAKE_MAX: f32 = 26.0;
const IMPACT_DECAY: f32 = 0.94;
const SHAKE_DECAY: f32 = 0.87;
const TIP_SPIN_RATE: f32 = 0.025;
/// Per-tick speed to HUD units.
const TIP_SPEED_SCALE: f32 = 58.0;

const ARENA_TARGETS: usize = 12;
const SPAWN_TRIES_PER_TARGET: usize = 120;
const SPAWN_MARGIN: f32 = 28.0;
const SPAWN_HANDLE_CLEARANCE: f32 = 170.0;
const SPAWN_SPACING: f32 = 16.0;
const SPAWN_RADIUS_MIN: f32 = 18.0;
const SPAWN_RADIUS_MAX: f32 = 33.0;

/// Tier guarantees for [`Simulation::spawn_targets`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnOptions {
    /// Place exactly one explosive target. Random rolls never pick it.
    pub ensure_explosive: bool,
    /// Place exactly one metallic target. Random rolls never pick it.
    pub ensure_metallic: bool,
}

impl SpawnOptions {
    /// The guarantees used when the arena is reset.
    pub fn arena() -> Self {
        SpawnOptions { ensure_explosive: true, ensure_metallic: true }
    }

    fn excluded(&self) -> &'static [Tier] {
        match (self.ensure_explosive, self.ensure_metallic) {
            (true, true) => &[Tier::Explosive, Tier::Metallic],
            (true, false) => &[Tier::Explosive],
            (false, true) => &[Tier::Metallic],
            (false, false) => &[],
        }
    }
}

/// Recoil magnitude for a tip strike of `strength` on `tier`.
pub fn recoil_magnitude(strength: f32, tier: Tier) -> f32 {
    ((strength - RECOIL_BASE) * RECOIL_RATE * tier.recoil_scale()).clamp(0.0, RECOIL_MAX)
}

/// Fixed-step chain-swinging simulation.
///
/// # Example
/// ```
/// use chainlash::{SimConfig, Simulation};
///
/// let mut sim = Simulation::new(SimConfig::new().with_seed(42)).unwrap();
/// sim.reset_arena();
/// sim.pointer(200.0, 300.0, 0.0);
/// sim.pointer(260.0, 320.0, 0.016);
/// let ticks = sim.advance(1.0 / 60.0);
/// assert_eq!(ticks, 2);
/// for event in sim.drain_events() {
///     let _ = event.strength();
/// }
/// ```
pub struct Simulation<R: RngCore = SmallRng> {
    config: SimConfig,
    tuning: Tuning,
    bounds: Bounds<f32>,
    handle: HandleController,
    chain: Chain<f32>,
    targets: AllocVec<Target>,
    effects: Effects,
    events: EventQueue,
    clock: FixedClock,
    rng: R,
    shattered_count: usize,
    last_impact_strength: f32,
    camera_shake: f32,
    tip_spin: f32,
    tick_count: u64,
}

impl Simulation {
    /// Build a simulation with a `SmallRng` seeded from `config.seed`.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RngCore> Simulation<R> {
    /// Build a simulation drawing randomness from `rng`. The arena starts
    /// empty; call [`reset_arena`](Self::reset_arena) to populate it.
    pub fn with_rng(config: SimConfig, rng: R) -> SimResult<Self> {
        config.validate()?;

        let bounds = Bounds::from_size(config.width, config.height);
        let center = bounds.center();
        let tuning = config.tuning;
        let mut chain = Chain::new(
            center,
            Vec2::new(-1.0, 0.0),
            tuning.link_count,
            tuning.tip_mass,
            tuning.stiffness,
            config.chain.clone(),
        );
        chain.settle_into(&bounds);

        tracing::debug!(
            width = config.width,
            height = config.height,
            links = tuning.link_count,
            "simulation created"
        );

        Ok(Simulation {
            tuning,
            bounds,
            handle: HandleController::new(center),
            chain,
            targets: AllocVec::new(),
            effects: Effects::new(config.debris_cap, config.ring_cap),
            events: EventQueue::new(),
            clock: FixedClock::new(config.fixed_dt, config.max_frame_delta),
            rng,
            shattered_count: 0,
            last_impact_strength: 0.0,
            camera_shake: 0.0,
            tip_spin: 0.0,
            tick_count: 0,
            config,
        })
    }

    // --- Driving -------------------------------------------------------------

    /// Feed a pointer sample in arena coordinates at `timestamp` seconds.
    pub fn pointer(&mut self, x: f32, y: f32, timestamp: f64) {
        self.handle.sample(x, y, timestamp, &self.bounds);
    }

    /// Run one fixed tick.
    pub fn tick(&mut self) {
        self.tick_with(&mut NoOpStepObserver);
    }

    /// Run one fixed tick, reporting each phase to `observer`.
    pub fn tick_with<O: StepObserver>(&mut self, observer: &mut O) {
        let dt = self.clock.step();

        let step = self.handle.update(dt, self.tuning.grip, &self.bounds);
        if let Some(kick) = step.snap_kick {
            self.chain.kick_links(kick, SNAP_LINKS);
        }

        self.chain.integrate();
        for target in self.targets.iter_mut().filter(|t| !t.broken) {
            target.body.integrate();
        }

        let anchor = self.handle.position();
        let anchor_prev = anchor - self.handle.velocity().scale(dt);
        self.chain.pin_anchor(anchor, anchor_prev);
        observer.on_integrate();

        let mut impacted = alloc::vec![false; self.targets.len()];
        let chain_self = ContactMaterial::chain_self();
        for iteration in 0..self.config.iterations {
            self.chain.pin_anchor(anchor, anchor_prev);
            self.chain.solve_constraints();
            self.chain.collide_self(&chain_self);
            self.collide_chain_with_targets(&mut impacted, observer);
            self.collide_targets();

            self.chain.contain(&self.bounds, CHAIN_BOUNCE);
            for target in self.targets.iter_mut().filter(|t| !t.broken) {
                self.bounds.contain(&mut target.body, TARGET_BOUNCE);
            }
            observer.on_solver_iteration(iteration);
        }

        self.tip_spin += self.chain.tip().speed() * TIP_SPIN_RATE;
        for target in self.targets.iter_mut() {
            target.settle(dt);
        }
        self.targets.retain(|t| !t.broken);
        self.effects.update_debris(dt, &self.bounds);

        self.last_impact_strength *= IMPACT_DECAY;
        self.camera_shake *= SHAKE_DECAY;
        self.tick_count += 1;
        observer.on_tick_complete();
    }

    /// Drive the simulation for one rendered frame of `frame_delta`
    /// seconds. Returns the number of fixed ticks run; zero while a
    /// hit-stop is being consumed. Rings age every frame regardless.
    pub fn advance(&mut self, frame_delta: f32) -> usize {
        self.advance_with(frame_delta, &mut NoOpStepObserver)
    }

    pub fn advance_with<O: StepObserver>(&mut self, frame_delta: f32, observer: &mut O) -> usize {
        let frame_scale = self.clock.frame_scale(frame_delta);
        let ticks = match self.clock.plan(frame_delta) {
            FramePlan::Frozen => 0,
            FramePlan::Ticks(ticks) => {
                for _ in 0..ticks {
                    self.tick_with(observer);
                }
                ticks
            }
        };
        self.effects.age_rings(frame_scale);
        ticks
    }

    // --- Solver passes -------------------------------------------------------

    fn collide_chain_with_targets<O: StepObserver>(&mut self, impacted: &mut [bool], observer: &mut O) {
        let material = ContactMaterial::chain_target();
        let tip = self.chain.tip_index();
        for i in 1..self.chain.len() {
            for j in 0..self.targets.len() {
                if self.targets[j].broken {
                    continue;
                }
                let contact = resolve_circles(
                    self.chain.particle_mut(i),
                    &mut self.targets[j].body,
                    &material,
                );
                match contact {
                    Some(contact) if i == tip && contact.approaching() => {
                        self.tip_strike(j, &contact, impacted, observer);
                    }
                    _ => {}
                }
            }
        }
    }

    fn collide_targets(&mut self) {
        let material = ContactMaterial::target_target();
        let n = self.targets.len();
        for i in 0..n {
            if self.targets[i].broken {
                continue;
            }
            for j in (i + 1)..n {
                if self.targets[j].broken {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.targets, i, j);
                resolve_circles(&mut a.body, &mut b.body, &material);
            }
        }
    }

    /// The tip ran into `targets[index]`. `contact.normal` points from the
    /// tip into the target.
    fn tip_strike<O: StepObserver>(
        &mut self,
        index: usize,
        contact: &Contact<f32>,
        impacted: &mut [bool],
        observer: &mut O,
    ) {
        let strength = contact.normal_speed.abs() * IMPACT_SCALE;
        let tier = self.targets[index].tier();

        if strength > IMPACT_EVENT_MIN && !impacted[index] {
            impacted[index] = true;
            self.ring(contact.point, strength, tier.impact_tint());
            self.events.push(SimEvent::Impact { position: contact.point, strength, tier });
        }

        self.recoil(contact.normal, strength, tier);
        if strength > IMPACT_HIT_STOP_MIN {
            self.clock.queue_hit_stop(impact_hit_stop(strength));
        }

        if strength > DAMAGE_MIN {
            let strike = Strike::direct(strength, contact.point, contact.normal, self.tuning.tip_mass);
            let mut shatters = AllocVec::new();
            resolve_strike(&mut self.targets, index, strike, &mut shatters);
            for shatter in shatters.iter() {
                self.shatter(shatter);
                observer.on_shatter(shatter.index);
            }
        }

        self.targets[index].add_flash(strength * CONTACT_FLASH);
    }

    /// Throw the handle and the first links back along `-direction`.
    fn recoil(&mut self, direction: Vec2<f32>, strength: f32, tier: Tier) {
        let recoil = recoil_magnitude(strength, tier);
        if recoil <= 0.0 {
            return;
        }
        self.handle.push(direction.scale(-recoil * RECOIL_HANDLE));
        self.chain.kick_links(direction.scale(-recoil * RECOIL_LINK), RECOIL_LINKS);
    }

    fn shatter(&mut self, shatter: &Shatter) {
        self.shattered_count += 1;
        let tier = shatter.tier;
        self.ring(shatter.point, shatter.strength * SHATTER_RING, tier.shatter_tint());
        self.ring(shatter.position, shatter.strength * CORE_RING, tier.core_tint());

        let burst = DebrisBurst {
            center: shatter.position,
            radius: shatter.radius,
            hue: shatter.hue,
            saturation: shatter.saturation,
            tier,
            direction: shatter.direction,
            strength: shatter.strength,
        };
        self.effects.spawn_debris(&burst, &mut self.rng);
        self.clock.queue_hit_stop(shatter_hit_stop(shatter.strength));

        let explosive = tier.is_explosive();
        if explosive {
            self.ring(shatter.position, shatter.strength * BLAST_CORE_RING, Rgb::BLAST_CORE);
            self.ring(shatter.position, shatter.strength * BLAST_EDGE_RING, Rgb::BLAST_EDGE);
        }

        self.events.push(SimEvent::Shatter {
            position: shatter.position,
            strength: shatter.strength,
            tier,
            explosive,
        });
    }

    /// Record a ring and let it drive the impact and shake readouts.
    fn ring(&mut self, pos: Vec2<f32>, strength: f32, tint: Rgb) {
        self.effects.push_ring(ImpactRing::new(pos, strength, tint));
        self.last_impact_strength = self.last_impact_strength.max(strength);
        self.camera_shake = self.camera_shake.max((strength * SHAKE_RATE).min(SHAKE_MAX));
    }

    // --- Tuning --------------------------------------------------------------

    /// Change the number of links, rebuilding the chain along its current
    /// path. Returns whether anything changed.
    pub fn set_link_count(&mut self, count: usize) -> bool {
        let next = self.config.limits.clamp_link_count(count);
        if next == self.tuning.link_count {
            return false;
        }
        self.tuning.link_count = next;
        self.chain = self.chain.resample(
            next,
            self.tuning.tip_mass,
            self.tuning.stiffness,
            self.handle.position(),
            &self.bounds,
        );
        tracing::debug!(link_count = next, "chain rebuilt");
        true
    }

    pub fn set_tip_mass(&mut self, tip_mass: f32) -> bool {
        if !tip_mass.is_finite() {
            return false;
        }
        let next = self.config.limits.tip_mass.clamp(tip_mass);
        if next == self.tuning.tip_mass {
            return false;
        }
        self.tuning.tip_mass = next;
        self.chain.set_tip_mass(next);
        tracing::debug!(tip_mass = next, "tip mass changed");
        true
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> bool {
        if !stiffness.is_finite() {
            return false;
        }
        let next = self.config.limits.stiffness.clamp(stiffness);
        if next == self.tuning.stiffness {
            return false;
        }
        self.tuning.stiffness = next;
        self.chain.set_stiffness(next);
        tracing::debug!(stiffness = next, "stiffness changed");
        true
    }

    pub fn set_grip(&mut self, grip: f32) -> bool {
        if !grip.is_finite() {
            return false;
        }
        let next = self.config.limits.grip.clamp(grip);
        if next == self.tuning.grip {
            return false;
        }
        self.tuning.grip = next;
        tracing::debug!(grip = next, "grip changed");
        true
    }

    /// Step the link count by `delta` links.
    pub fn adjust_link_count(&mut self, delta: isize) -> bool {
        let next = self.tuning.link_count.saturating_add_signed(delta);
        self.set_link_count(next)
    }

    /// Step the tip mass by `delta`, rounded to 0.1.
    pub fn adjust_tip_mass(&mut self, delta: f32) -> bool {
        let next = self.config.limits.tip_mass.step(self.tuning.tip_mass + delta);
        self.set_tip_mass(next)
    }

    /// Step the stiffness by `delta`, rounded to 0.01.
    pub fn adjust_stiffness(&mut self, delta: f32) -> bool {
        let next = self.config.limits.stiffness.step(self.tuning.stiffness + delta);
        self.set_stiffness(next)
    }

    /// Step the grip by `delta`, rounded to 0.01.
    pub fn adjust_grip(&mut self, delta: f32) -> bool {
        let next = self.config.limits.grip.step(self.tuning.grip + delta);
        self.set_grip(next)
    }

    // --- Arena ---------------------------------------------------------------

    /// Try to place `count` non-overlapping targets away from the handle.
    /// Returns how many were placed.
    pub fn spawn_targets(&mut self, count: usize, options: SpawnOptions) -> usize {
        let excluded = options.excluded();
        let handle = self.handle.position();
        let max_tries = count.saturating_mul(SPAWN_TRIES_PER_TARGET);
        let mut explosive_placed = false;
        let mut metallic_placed = false;
        let mut placed = 0;
        let mut tries = 0;

        while placed < count && tries < max_tries {
            tries += 1;
            let remaining = count - placed;
            let want_explosive = options.ensure_explosive && !explosive_placed;
            let want_metallic = options.ensure_metallic && !metallic_placed;

            let forced = if want_explosive && want_metallic && remaining == 2 {
                Some(if self.rng.gen_bool(0.5) { Tier::Explosive } else { Tier::Metallic })
            } else if want_explosive && remaining <= 1 {
                Some(Tier::Explosive)
            } else if want_metallic && remaining <= 1 {
                Some(Tier::Metallic)
            } else {
                None
            };
            let tier = match forced {
                Some(tier) => tier,
                None => Tier::pick_excluding(&mut self.rng, excluded),
            };

            let radius = self.rng.gen_range(SPAWN_RADIUS_MIN..SPAWN_RADIUS_MAX) * tier.spec().radius_scale;
            let inset = radius + SPAWN_MARGIN;
            let (min, max) = (self.bounds.min, self.bounds.max);
            if min.x + inset >= max.x - inset || min.y + inset >= max.y - inset {
                continue;
            }
            let pos = Vec2::new(
                self.rng.gen_range(min.x + inset..max.x - inset),
                self.rng.gen_range(min.y + inset..max.y - inset),
            );

            if pos.distance(handle) < SPAWN_HANDLE_CLEARANCE {
                continue;
            }
            let crowded = self
                .targets
                .iter()
                .any(|other| pos.distance(other.position()) < radius + other.radius() + SPAWN_SPACING);
            if crowded {
                continue;
            }

            self.targets.push(Target::new(pos, radius, tier, &mut self.rng));
            match tier {
                Tier::Explosive => explosive_placed = true,
                Tier::Metallic => metallic_placed = true,
                Tier::Soft | Tier::Armored => {}
            }
            placed += 1;
        }

        if placed < count {
            tracing::warn!(requested = count, placed, tries, "arena too crowded to place every target");
        }
        tracing::debug!(placed, tries, "targets spawned");
        placed
    }

    /// Clear targets, debris, rings, the shattered count and any pending
    /// hit-stop, then spawn a fresh set of twelve with one explosive and one
    /// metallic.
    pub fn reset_arena(&mut self) {
        self.targets.clear();
        self.effects.clear();
        self.clock.reset();
        self.shattered_count = 0;
        self.last_impact_strength = 0.0;
        let placed = self.spawn_targets(ARENA_TARGETS, SpawnOptions::arena());
        tracing::debug!(placed, "arena reset");
    }

    /// Resize the arena, clamping every body inside and bringing the chain
    /// and targets to rest.
    pub fn resize(&mut self, width: f32, height: f32) -> SimResult<()> {
        validate_arena(width, height)?;
        self.bounds = Bounds::from_size(width, height);
        self.config.width = width;
        self.config.height = height;

        self.chain.settle_into(&self.bounds);
        for target in self.targets.iter_mut() {
            let pos = self.bounds.clamp_point(target.position(), target.radius());
            target.body.place(pos, Vec2::zero());
        }
        self.effects.clamp_into(&self.bounds);
        self.handle.clamp_into(&self.bounds);
        tracing::debug!(width, height, "arena resized");
        Ok(())
    }

    /// Add a target as-is. The caller is responsible for placement.
    pub fn insert_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    // --- Queries -------------------------------------------------------------

    /// Tip speed in HUD units.
    pub fn tip_speed(&self) -> f32 {
        self.chain.tip().speed() * TIP_SPEED_SCALE
    }

    pub fn last_impact_strength(&self) -> f32 {
        self.last_impact_strength
    }

    pub fn live_target_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_broken()).count()
    }

    pub fn shattered_count(&self) -> usize {
        self.shattered_count
    }

    pub fn camera_shake(&self) -> f32 {
        self.camera_shake
    }

    /// Accumulated tip rotation for the renderer.
    pub fn tip_spin(&self) -> f32 {
        self.tip_spin
    }

    pub fn hit_stop_remaining(&self) -> f32 {
        self.clock.hit_stop_remaining()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds<f32> {
        &self.bounds
    }

    pub fn chain(&self) -> &Chain<f32> {
        &self.chain
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn handle(&self) -> &HandleController {
        &self.handle
    }

    pub fn debris(&self) -> impl Iterator<Item = &Debris> {
        self.effects.debris()
    }

    pub fn rings(&self) -> impl Iterator<Item = &ImpactRing> {
        self.effects.rings()
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> AllocVec<SimEvent> {
        self.events.drain()
    }
}
