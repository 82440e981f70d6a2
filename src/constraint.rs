//! Chain constraints and arena containment.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;

/// Pulls two particles toward `rest_length`, splitting the correction by
/// inverse mass.
#[derive(Clone, Debug)]
pub struct DistanceConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
    pub stiffness: V::Scalar,
}

impl<V: Vec> DistanceConstraint<V> {
    pub fn new(a: usize, b: usize, rest_length: V::Scalar, stiffness: V::Scalar) -> Self {
        DistanceConstraint { a, b, rest_length, stiffness }
    }

    pub fn solve(&self, particles: &mut [Particle<V>]) {
        let a_inv = particles[self.a].inv_mass;
        let b_inv = particles[self.b].inv_mass;

        let w_total = a_inv + b_inv;
        if w_total == V::Scalar::zero() {
            return; // both immovable
        }

        let delta = particles[self.b].pos - particles[self.a].pos;
        let dist_sq = delta.length_sq();
        if dist_sq < V::Scalar::from_f32(1e-8) {
            return; // degenerate
        }

        let dist = dist_sq.sqrt();
        let error = (dist - self.rest_length) / dist;
        let correction = delta.scale(error * self.stiffness);

        if a_inv > V::Scalar::zero() {
            particles[self.a].pos = particles[self.a].pos + correction.scale(a_inv / w_total);
        }
        if b_inv > V::Scalar::zero() {
            particles[self.b].pos = particles[self.b].pos - correction.scale(b_inv / w_total);
        }
    }
}

/// Axis-aligned arena the simulation lives in.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Bounds<F> {
    pub fn new(min: Vec2<F>, max: Vec2<F>) -> Self {
        Bounds { min, max }
    }

    /// Arena spanning `(0, 0)` to `(width, height)`.
    pub fn from_size(width: F, height: F) -> Self {
        Bounds { min: Vec2::new(F::zero(), F::zero()), max: Vec2::new(width, height) }
    }

    pub fn width(&self) -> F {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> F {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2<F> {
        self.min.lerp(self.max, F::half())
    }

    /// Clamp a point into the arena shrunk by `inset` on every side.
    pub fn clamp_point(&self, point: Vec2<F>, inset: F) -> Vec2<F> {
        let inset = Vec2::new(inset, inset);
        point.clamp_to(self.min + inset, self.max - inset)
    }

    /// Clamp a circular particle inside the arena. Velocity components that
    /// point out of the arena are reflected and scaled by `bounce`.
    /// Returns whether the particle touched a wall.
    pub fn contain(&self, p: &mut Particle<Vec2<F>>, bounce: F) -> bool {
        if p.is_fixed() {
            return false;
        }

        let mut vel = p.velocity();
        let mut touched = false;

        if p.pos.x < self.min.x + p.radius {
            p.pos.x = self.min.x + p.radius;
            if vel.x < F::zero() {
                vel.x = -vel.x * bounce;
            }
            touched = true;
        } else if p.pos.x > self.max.x - p.radius {
            p.pos.x = self.max.x - p.radius;
            if vel.x > F::zero() {
                vel.x = -vel.x * bounce;
            }
            touched = true;
        }

        if p.pos.y < self.min.y + p.radius {
            p.pos.y = self.min.y + p.radius;
            if vel.y < F::zero() {
                vel.y = -vel.y * bounce;
            }
            touched = true;
        } else if p.pos.y > self.max.y - p.radius {
            p.pos.y = self.max.y - p.radius;
            if vel.y > F::zero() {
                vel.y = -vel.y * bounce;
            }
            touched = true;
        }

        if touched {
            p.set_velocity(vel);
        }
        touched
    }
}
