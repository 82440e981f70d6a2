//! Circle-circle overlap resolution with restitution and friction.
//!
//! Positions are separated first (weighted by inverse mass), then the
//! implied velocities receive a normal impulse and a friction impulse
//! clamped to `friction * normal_impulse`. Velocities are written back
//! through `prev_pos`, so the Verlet integrator picks them up next tick.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;

/// Restitution and friction for one kind of contact.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactMaterial<F: Float> {
    pub restitution: F,
    pub friction: F,
}

impl<F: Float> ContactMaterial<F> {
    pub fn new(restitution: F, friction: F) -> Self {
        ContactMaterial { restitution, friction }
    }

    /// Soft contact between non-adjacent chain links.
    pub fn chain_self() -> Self {
        Self::new(F::from_f32(0.08), F::from_f32(0.09))
    }

    /// Chain link (including the tip) against a target.
    pub fn chain_target() -> Self {
        Self::new(F::from_f32(0.31), F::from_f32(0.28))
    }

    /// Target against target.
    pub fn target_target() -> Self {
        Self::new(F::from_f32(0.12), F::from_f32(0.34))
    }
}

/// Result of resolving one overlapping pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    /// Unit normal pointing from `a` to `b`.
    pub normal: Vec2<F>,
    /// Midpoint of the two centers after separation.
    pub point: Vec2<F>,
    /// Relative normal velocity `(v_b - v_a) . n` before the impulse.
    /// Negative while the bodies approach.
    pub normal_speed: F,
    /// Normal impulse magnitude, zero when the bodies were separating.
    pub impulse: F,
}

impl<F: Float> Contact<F> {
    pub fn approaching(&self) -> bool {
        self.normal_speed < F::zero()
    }
}

/// Resolve the overlap between two circular particles.
///
/// Returns `None` when they do not overlap, or when both are immovable
/// (there is nobody to push).
pub fn resolve_circles<F: Float>(
    a: &mut Particle<Vec2<F>>,
    b: &mut Particle<Vec2<F>>,
    material: &ContactMaterial<F>,
) -> Option<Contact<F>> {
    let delta = b.pos - a.pos;
    let min_dist = a.radius + b.radius;
    let dist_sq = delta.length_sq();
    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let w_total = a.inv_mass + b.inv_mass;
    if w_total == F::zero() {
        tracing::trace!("skipping contact between two immovable bodies");
        return None;
    }

    let mut dist = dist_sq.sqrt();
    let normal = if dist > F::from_f32(1e-8) {
        delta.scale(F::one() / dist)
    } else {
        // Coincident centers: no preferred direction, pick +x.
        dist = min_dist - F::from_f32(0.001);
        Vec2::new(F::one(), F::zero())
    };

    let overlap = min_dist - dist;
    if a.inv_mass > F::zero() {
        a.pos = a.pos - normal.scale(overlap * a.inv_mass / w_total);
    }
    if b.inv_mass > F::zero() {
        b.pos = b.pos + normal.scale(overlap * b.inv_mass / w_total);
    }

    let mut va = a.velocity();
    let mut vb = b.velocity();
    let rel = vb - va;
    let normal_speed = rel.dot(normal);
    let mut impulse = F::zero();

    if normal_speed < F::zero() {
        impulse = -(F::one() + material.restitution) * normal_speed / w_total;
        let j = normal.scale(impulse);
        va = va - j.scale(a.inv_mass);
        vb = vb + j.scale(b.inv_mass);

        let tangent_raw = rel - normal.scale(normal_speed);
        let tangent_len = tangent_raw.length();
        if tangent_len > F::from_f32(1e-8) {
            let tangent = tangent_raw.scale(F::one() / tangent_len);
            let tangent_speed = rel.dot(tangent);
            let limit = impulse * material.friction;
            let friction = (-tangent_speed / w_total).clamp(-limit, limit);
            let f = tangent.scale(friction);
            va = va - f.scale(a.inv_mass);
            vb = vb + f.scale(b.inv_mass);
        }
    }

    a.set_velocity(va);
    b.set_velocity(vb);

    Some(Contact {
        normal,
        point: (a.pos + b.pos).scale(F::half()),
        normal_speed,
        impulse,
    })
}

/// Two distinct mutable elements of one slice.
///
/// # Panics
/// Panics if `i == j` or either index is out of bounds.
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert!(i != j, "pair_mut needs two distinct indices");
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
