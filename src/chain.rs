//! Anchored Verlet chain with a heavy tip.
//!
//! Index 0 is the anchor (immovable, pinned to the handle every solver
//! iteration). The last particle is the tip: heavier and larger than the
//! body links, and the only link whose contacts count as player hits.
//! Consecutive links are held at `link_length` by structural constraints
//! and links two apart at `2 * link_length` by softer bend constraints.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;
use crate::constraint::{Bounds, DistanceConstraint};
use crate::collision::{pair_mut, resolve_circles, ContactMaterial};
use alloc::vec::Vec as AllocVec;

/// Configuration for creating a chain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainConfig<F: Float> {
    /// Structural rest distance between consecutive links.
    pub link_length: F,
    /// Base radius every link and the tip are scaled from.
    pub link_radius: F,
    /// Mass of every non-anchor, non-tip link.
    pub link_mass: F,
    pub link_drag: F,
}

impl<F: Float> Default for ChainConfig<F> {
    fn default() -> Self {
        ChainConfig {
            link_length: F::from_f32(24.0),
            link_radius: F::from_f32(8.4),
            link_mass: F::from_f32(2.4),
            link_drag: F::from_f32(0.9945),
        }
    }
}

impl<F: Float> ChainConfig<F> {
    /// Radius of body link `index`; the slight wobble keeps the chain from
    /// looking machined.
    pub fn link_radius_at(&self, index: usize) -> F {
        let phase = F::from_f32(index as f32 * 0.74);
        self.link_radius * (F::from_f32(0.88) + phase.sin() * F::from_f32(0.08))
    }

    pub fn tip_radius(&self, tip_mass: F) -> F {
        self.link_radius * (F::from_f32(1.16) + tip_mass * F::from_f32(0.055))
    }

    pub fn tip_drag(tip_mass: F) -> F {
        (F::from_f32(0.989) + tip_mass * F::from_f32(0.00062))
            .clamp(F::from_f32(0.989), F::from_f32(0.996))
    }
}

/// Bend-constraint weight derived from the structural stiffness.
pub fn bend_stiffness<F: Float>(stiffness: F) -> F {
    (F::from_f32(0.13) + stiffness * F::from_f32(0.13))
        .clamp(F::from_f32(0.17), F::from_f32(0.35))
}

/// The player's chain.
#[derive(Clone, Debug)]
pub struct Chain<F: Float> {
    particles: AllocVec<Particle<Vec2<F>>>,
    structural: AllocVec<DistanceConstraint<Vec2<F>>>,
    bend: AllocVec<DistanceConstraint<Vec2<F>>>,
    config: ChainConfig<F>,
}

impl<F: Float> Chain<F> {
    /// Lay out `link_count` particles in a straight line from `anchor`
    /// along `direction`, at rest.
    pub fn new(
        anchor: Vec2<F>,
        direction: Vec2<F>,
        link_count: usize,
        tip_mass: F,
        stiffness: F,
        config: ChainConfig<F>,
    ) -> Self {
        let direction = direction.normalize();
        let mut particles = AllocVec::with_capacity(link_count);
        for i in 0..link_count {
            let offset = direction.scale(config.link_length * F::from_f32(i as f32));
            particles.push(Self::make_link(anchor + offset, i, link_count, tip_mass, &config));
        }
        Self::assemble(particles, stiffness, config)
    }

    /// Build a chain with `link_count` links that follows the path and
    /// velocities of `self`.
    ///
    /// New link `i` copies position and implied velocity from old link
    /// `round(i / (n' - 1) * (n - 1))`, so the tip keeps the old tip's
    /// motion. Positions are clamped into `bounds` and the anchor is
    /// re-seated on `anchor` at rest.
    pub fn resample(
        &self,
        link_count: usize,
        tip_mass: F,
        stiffness: F,
        anchor: Vec2<F>,
        bounds: &Bounds<F>,
    ) -> Self {
        let old_len = self.particles.len();
        let last = old_len.saturating_sub(1);
        let span = link_count.saturating_sub(1).max(1);
        let mut particles = AllocVec::with_capacity(link_count);

        for i in 0..link_count {
            let mut link = Self::make_link(anchor, i, link_count, tip_mass, &self.config);
            let t = F::from_f32(i as f32 / span as f32);
            let mapped = (t * F::from_f32(last as f32)).round().to_f32() as usize;
            if let Some(source) = self.particles.get(mapped.min(last)) {
                let pos = bounds.clamp_point(source.pos, link.radius);
                link.place(pos, source.velocity());
            }
            particles.push(link);
        }

        if let Some(first) = particles.first_mut() {
            first.place(anchor, Vec2::zero());
        }

        Self::assemble(particles, stiffness, self.config.clone())
    }

    fn make_link(
        pos: Vec2<F>,
        index: usize,
        link_count: usize,
        tip_mass: F,
        config: &ChainConfig<F>,
    ) -> Particle<Vec2<F>> {
        if index == 0 {
            Particle::fixed(pos, config.link_radius_at(0))
        } else if index + 1 == link_count {
            Particle::new(pos, config.tip_radius(tip_mass), tip_mass, ChainConfig::tip_drag(tip_mass))
        } else {
            Particle::new(pos, config.link_radius_at(index), config.link_mass, config.link_drag)
        }
    }

    fn assemble(particles: AllocVec<Particle<Vec2<F>>>, stiffness: F, config: ChainConfig<F>) -> Self {
        let n = particles.len();
        let structural = (0..n.saturating_sub(1))
            .map(|i| DistanceConstraint::new(i, i + 1, config.link_length, stiffness))
            .collect();
        let bend = (0..n.saturating_sub(2))
            .map(|i| {
                DistanceConstraint::new(
                    i,
                    i + 2,
                    config.link_length * F::two(),
                    bend_stiffness(stiffness),
                )
            })
            .collect();
        Chain { particles, structural, bend, config }
    }

    /// Update constraint weights in place.
    pub fn set_stiffness(&mut self, stiffness: F) {
        for c in self.structural.iter_mut() {
            c.stiffness = stiffness;
        }
        let bend = bend_stiffness(stiffness);
        for c in self.bend.iter_mut() {
            c.stiffness = bend;
        }
    }

    /// Update tip mass, radius and drag in place.
    pub fn set_tip_mass(&mut self, tip_mass: F) {
        if self.particles.len() < 2 {
            return;
        }
        let radius = self.config.tip_radius(tip_mass);
        let tip = self.tip_mut();
        tip.set_mass(tip_mass);
        tip.radius = radius;
        tip.drag = ChainConfig::tip_drag(tip_mass);
    }

    /// Force the anchor to `pos` with implied velocity `pos - prev`.
    pub fn pin_anchor(&mut self, pos: Vec2<F>, prev: Vec2<F>) {
        if let Some(anchor) = self.particles.first_mut() {
            anchor.pos = pos;
            anchor.prev_pos = prev;
        }
    }

    /// Verlet-integrate every link except the anchor.
    pub fn integrate(&mut self) {
        for p in self.particles.iter_mut().skip(1) {
            p.integrate();
        }
    }

    /// One relaxation pass over structural then bend constraints.
    pub fn solve_constraints(&mut self) {
        for c in self.structural.iter() {
            c.solve(&mut self.particles);
        }
        for c in self.bend.iter() {
            c.solve(&mut self.particles);
        }
    }

    /// Resolve overlaps between links at least two apart. Adjacent links
    /// are already held apart by the structural constraint.
    pub fn collide_self(&mut self, material: &ContactMaterial<F>) {
        let n = self.particles.len();
        for i in 1..n {
            for j in (i + 2)..n {
                let (a, b) = pair_mut(&mut self.particles, i, j);
                resolve_circles(a, b, material);
            }
        }
    }

    /// Keep every non-anchor link inside the arena.
    pub fn contain(&mut self, bounds: &Bounds<F>, bounce: F) {
        for p in self.particles.iter_mut().skip(1) {
            bounds.contain(p, bounce);
        }
    }

    /// Add `impulse` (per-tick velocity) to links `1..=max_links`, weighted
    /// linearly down from 1 at the first link.
    pub fn kick_links(&mut self, impulse: Vec2<F>, max_links: usize) {
        let count = max_links.min(self.particles.len().saturating_sub(1));
        if count == 0 {
            return;
        }
        for i in 1..=count {
            let weight = F::one() - F::from_f32((i - 1) as f32 / count as f32);
            self.particles[i].add_velocity(impulse.scale(weight));
        }
    }

    /// Clamp every link into `bounds` and bring it to rest.
    pub fn settle_into(&mut self, bounds: &Bounds<F>) {
        for p in self.particles.iter_mut() {
            let pos = bounds.clamp_point(p.pos, p.radius);
            p.place(pos, Vec2::zero());
        }
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn particles(&self) -> &[Particle<Vec2<F>>] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn tip_index(&self) -> usize {
        self.particles.len().saturating_sub(1)
    }

    pub fn anchor(&self) -> &Particle<Vec2<F>> {
        &self.particles[0]
    }

    pub fn tip(&self) -> &Particle<Vec2<F>> {
        &self.particles[self.tip_index()]
    }

    pub fn tip_mut(&mut self) -> &mut Particle<Vec2<F>> {
        let index = self.tip_index();
        &mut self.particles[index]
    }

    pub fn particle(&self, index: usize) -> &Particle<Vec2<F>> {
        &self.particles[index]
    }

    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<Vec2<F>> {
        &mut self.particles[index]
    }

    pub fn link_length(&self) -> F {
        self.config.link_length
    }

    pub fn config(&self) -> &ChainConfig<F> {
        &self.config
    }
}
