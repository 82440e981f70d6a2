//! Debris and impact-ring bookkeeping for the renderer.
//!
//! Neither debris nor rings take part in the solver. Debris integrates on its
//! own with exponential velocity decay and soft wall bounces; rings grow and
//! fade per rendered frame. Both populations are capped and evict their
//! oldest entries first.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::constraint::Bounds;
use crate::tier::Tier;
use alloc::collections::VecDeque;
use rand::Rng;

const DEBRIS_DECAY: f32 = 0.964;
const DEBRIS_BOUNCE: f32 = 0.35;
const DEBRIS_EXPIRY: f32 = 0.01;

const RING_START_RADIUS: f32 = 14.0;
const RING_FADE: f32 = 0.93;
const RING_MIN_ALPHA: f32 = 0.03;

/// 8-bit RGB tint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Default warm spark colour.
    pub const SPARK: Rgb = Rgb(255, 216, 152);
    pub const BLAST_CORE: Rgb = Rgb(255, 120, 82);
    pub const BLAST_EDGE: Rgb = Rgb(255, 174, 126);
}

/// One shard thrown off by a shattering target.
#[derive(Clone, Debug, PartialEq)]
pub struct Debris {
    pub pos: Vec2<f32>,
    /// Units per second.
    pub vel: Vec2<f32>,
    pub radius: f32,
    pub angle: f32,
    pub spin: f32,
    pub hue: f32,
    pub saturation: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Debris {
    /// Remaining life as a fade factor in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    fn update(&mut self, dt: f32, decay: f32, bounds: &Bounds<f32>) {
        self.pos = self.pos + self.vel.scale(dt);
        self.vel = self.vel.scale(decay);
        self.angle += self.spin * dt;
        self.life -= dt;

        if self.pos.x < bounds.min.x + self.radius {
            self.pos.x = bounds.min.x + self.radius;
            if self.vel.x < 0.0 {
                self.vel.x *= -DEBRIS_BOUNCE;
            }
        } else if self.pos.x > bounds.max.x - self.radius {
            self.pos.x = bounds.max.x - self.radius;
            if self.vel.x > 0.0 {
                self.vel.x *= -DEBRIS_BOUNCE;
            }
        }

        if self.pos.y < bounds.min.y + self.radius {
            self.pos.y = bounds.min.y + self.radius;
            if self.vel.y < 0.0 {
                self.vel.y *= -DEBRIS_BOUNCE;
            }
        } else if self.pos.y > bounds.max.y - self.radius {
            self.pos.y = bounds.max.y - self.radius;
            if self.vel.y > 0.0 {
                self.vel.y *= -DEBRIS_BOUNCE;
            }
        }
    }
}

/// Expanding, fading ring marking an impact.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactRing {
    pub pos: Vec2<f32>,
    pub radius: f32,
    /// Stroke width.
    pub width: f32,
    /// Radius growth per 60 Hz frame.
    pub growth: f32,
    pub alpha: f32,
    pub tint: Rgb,
}

impl ImpactRing {
    pub fn new(pos: Vec2<f32>, strength: f32, tint: Rgb) -> Self {
        ImpactRing {
            pos,
            radius: RING_START_RADIUS,
            width: 2.5 + strength * 0.015,
            growth: 6.0 + strength * 0.11,
            alpha: (0.25 + strength * 0.01).clamp(0.1, 0.95),
            tint,
        }
    }
}

/// Where and how a shattered target throws debris.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DebrisBurst {
    pub center: Vec2<f32>,
    pub radius: f32,
    pub hue: f32,
    pub saturation: f32,
    pub tier: Tier,
    /// Direction of the blow that broke the target.
    pub direction: Vec2<f32>,
    pub strength: f32,
}

impl DebrisBurst {
    pub fn piece_count(&self) -> usize {
        let base = (self.radius * 0.45 + self.strength * 0.045).clamp(9.0, 28.0);
        (base * self.tier.spec().debris_scale).round() as usize
    }
}

/// Capped debris and ring populations.
#[derive(Clone, Debug)]
pub struct Effects {
    debris: VecDeque<Debris>,
    rings: VecDeque<ImpactRing>,
    debris_cap: usize,
    ring_cap: usize,
}

impl Effects {
    pub fn new(debris_cap: usize, ring_cap: usize) -> Self {
        Effects {
            debris: VecDeque::with_capacity(debris_cap),
            rings: VecDeque::with_capacity(ring_cap),
            debris_cap,
            ring_cap,
        }
    }

    /// Record a ring, evicting the oldest past the cap.
    pub fn push_ring(&mut self, ring: ImpactRing) {
        self.rings.push_back(ring);
        while self.rings.len() > self.ring_cap {
            self.rings.pop_front();
        }
    }

    /// Throw a fan of shards centred on the burst direction.
    pub fn spawn_debris<R: Rng + ?Sized>(&mut self, burst: &DebrisBurst, rng: &mut R) {
        let base_angle = burst.direction.angle();
        let spread = core::f32::consts::PI * 0.8;
        for _ in 0..burst.piece_count() {
            let angle = base_angle + rng.gen_range(-spread..spread);
            let speed = rng.gen_range(110.0..260.0) + burst.strength * rng.gen_range(0.45..1.1);
            self.debris.push_back(Debris {
                pos: burst.center,
                vel: Vec2::from_angle(angle).scale(speed),
                radius: rng.gen_range(1.8..5.2),
                angle: rng.gen_range(0.0..core::f32::consts::TAU),
                spin: rng.gen_range(-13.0..13.0),
                hue: burst.hue + rng.gen_range(-7.0..7.0),
                saturation: burst.saturation,
                life: rng.gen_range(0.34..0.95),
                max_life: 1.0,
            });
        }
        while self.debris.len() > self.debris_cap {
            self.debris.pop_front();
        }
    }

    /// Advance debris by one tick and prune expired shards.
    pub fn update_debris(&mut self, dt: f32, bounds: &Bounds<f32>) {
        let decay = DEBRIS_DECAY.powf(dt * 60.0);
        for piece in self.debris.iter_mut() {
            piece.update(dt, decay, bounds);
        }
        self.debris.retain(|piece| piece.life > DEBRIS_EXPIRY);
    }

    /// Grow and fade rings for one rendered frame. `frame_scale` is the
    /// frame duration in 60 Hz frames.
    pub fn age_rings(&mut self, frame_scale: f32) {
        let fade = RING_FADE.powf(frame_scale);
        for ring in self.rings.iter_mut() {
            ring.radius += ring.growth * frame_scale;
            ring.alpha *= fade;
        }
        self.rings.retain(|ring| ring.alpha >= RING_MIN_ALPHA);
    }

    /// Clamp debris into a resized arena.
    pub fn clamp_into(&mut self, bounds: &Bounds<f32>) {
        for piece in self.debris.iter_mut() {
            piece.pos = bounds.clamp_point(piece.pos, piece.radius);
        }
    }

    pub fn clear(&mut self) {
        self.debris.clear();
        self.rings.clear();
    }

    pub fn debris(&self) -> impl Iterator<Item = &Debris> {
        self.debris.iter()
    }

    pub fn rings(&self) -> impl Iterator<Item = &ImpactRing> {
        self.rings.iter()
    }

    pub fn debris_count(&self) -> usize {
        self.debris.len()
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }
}
