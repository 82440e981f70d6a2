//! Verlet particles with position-based dynamics.

use crate::float::Float;
use crate::vec::Vec;

/// A Verlet particle: position-based dynamics with implicit velocity.
///
/// Velocity is never stored; it is `pos - prev_pos` per tick. An
/// `inv_mass` of zero marks the particle as immovable: constraint and
/// collision solving leave it alone and only the owner may move it.
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    pub radius: V::Scalar,
    pub inv_mass: V::Scalar,
    /// Per-tick velocity retention in `(0, 1]`.
    pub drag: V::Scalar,
}

impl<V: Vec> Particle<V> {
    pub fn new(pos: V, radius: V::Scalar, mass: V::Scalar, drag: V::Scalar) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            radius,
            inv_mass: inverse_mass(mass),
            drag,
        }
    }

    /// An immovable particle, driven externally.
    pub fn fixed(pos: V, radius: V::Scalar) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            radius,
            inv_mass: V::Scalar::zero(),
            drag: V::Scalar::one(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.inv_mass == V::Scalar::zero()
    }

    pub fn set_mass(&mut self, mass: V::Scalar) {
        self.inv_mass = inverse_mass(mass);
    }

    /// One drag-damped Verlet step. Immovable particles are skipped.
    pub fn integrate(&mut self) {
        if self.is_fixed() {
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(self.drag);
        self.prev_pos = self.pos;
        self.pos = self.pos + velocity;
    }

    /// Implied per-tick velocity.
    pub fn velocity(&self) -> V {
        self.pos - self.prev_pos
    }

    pub fn speed(&self) -> V::Scalar {
        self.velocity().length()
    }

    /// Rewrite the position history so the implied velocity becomes `velocity`.
    pub fn set_velocity(&mut self, velocity: V) {
        self.prev_pos = self.pos - velocity;
    }

    /// Instantaneous velocity change applied through the position history.
    pub fn add_velocity(&mut self, delta: V) {
        self.prev_pos = self.prev_pos - delta;
    }

    /// Move to `pos` keeping the implied velocity.
    pub fn place(&mut self, pos: V, velocity: V) {
        self.pos = pos;
        self.prev_pos = pos - velocity;
    }
}

/// Zero, non-finite or negative masses map to an immovable body so that
/// `inv_mass >= 0` always holds.
fn inverse_mass<F: Float>(mass: F) -> F {
    if !mass.is_finite() || mass <= F::from_f32(1e-10) {
        F::zero()
    } else {
        F::one() / mass
    }
}
