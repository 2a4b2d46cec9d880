//! Impulse-based collision response
//!
//! One pass per contact: a normal impulse with restitution, a Coulomb
//! friction impulse along the sliding direction, then a linear positional
//! correction that removes most of the penetration.

use glam::Vec3;

use super::{combine_friction, combine_restitution, Contact};
use crate::body::RigidBody;
use crate::types::Material;

/// Trait for objects that can respond to collisions
pub trait CollisionResponder {
    fn velocity(&self) -> Vec3;

    fn angular_velocity(&self) -> Vec3;

    /// Zero for static objects
    fn inverse_mass(&self) -> f32;

    /// Scalar inverse moment of inertia, zero for static objects
    fn inverse_inertia(&self) -> f32;

    /// World-space center of mass
    fn center_of_mass(&self) -> Vec3;

    fn material(&self) -> Material;

    /// Apply an impulse at a world point
    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3);

    /// Translate to resolve penetration
    fn apply_correction(&mut self, correction: Vec3);

    /// Velocity of the material point at `point`
    fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.velocity() + self.angular_velocity().cross(point - self.center_of_mass())
    }
}

impl CollisionResponder for RigidBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn inverse_mass(&self) -> f32 {
        RigidBody::inverse_mass(self)
    }

    fn inverse_inertia(&self) -> f32 {
        RigidBody::inverse_inertia(self)
    }

    fn center_of_mass(&self) -> Vec3 {
        RigidBody::center_of_mass(self)
    }

    fn material(&self) -> Material {
        RigidBody::material(self)
    }

    fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        self.add_impulse(impulse, point);
    }

    fn apply_correction(&mut self, correction: Vec3) {
        self.move_by(correction);
    }
}

/// Contact solver configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSolver {
    /// Fraction of the penetration removed per contact (0-1)
    pub position_correction: f32,
    /// Penetration tolerated without correction
    pub penetration_slop: f32,
}

impl Default for CollisionSolver {
    fn default() -> Self {
        Self {
            position_correction: 0.8,
            penetration_slop: 0.001,
        }
    }
}

impl CollisionSolver {
    /// Resolve one contact between `a` and `b`; `contact.normal` points from
    /// `b` toward `a`.
    pub fn resolve<A, B>(&self, a: &mut A, b: &mut B, contact: &Contact)
    where
        A: CollisionResponder + ?Sized,
        B: CollisionResponder + ?Sized,
    {
        let inv_mass_a = a.inverse_mass();
        let inv_mass_b = b.inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            return;
        }

        let normal = contact.normal;
        let point = contact.point;
        let ra = point - a.center_of_mass();
        let rb = point - b.center_of_mass();

        // Relative velocity at the contact point
        let relative_velocity = a.point_velocity(point) - b.point_velocity(point);
        let velocity_along_normal = relative_velocity.dot(normal);

        // Only approaching contacts get an impulse
        if velocity_along_normal < 0.0 {
            let material_a = a.material();
            let material_b = b.material();
            let e = combine_restitution(material_a.restitution, material_b.restitution);
            let effective = inv_mass_sum
                + a.inverse_inertia() * ra.cross(normal).length_squared()
                + b.inverse_inertia() * rb.cross(normal).length_squared();
            let j = -(1.0 + e) * velocity_along_normal / effective;

            let impulse = normal * j;
            a.apply_impulse(impulse, point);
            b.apply_impulse(-impulse, point);

            // Coulomb friction along the post-impulse sliding direction
            let relative_velocity = a.point_velocity(point) - b.point_velocity(point);
            let sliding = relative_velocity - normal * relative_velocity.dot(normal);
            if let Some(tangent) = sliding.try_normalize() {
                let mu = combine_friction(material_a.friction, material_b.friction);
                let effective = inv_mass_sum
                    + a.inverse_inertia() * ra.cross(tangent).length_squared()
                    + b.inverse_inertia() * rb.cross(tangent).length_squared();
                let jt = (-relative_velocity.dot(tangent) / effective).clamp(-mu * j, mu * j);
                let friction = tangent * jt;
                a.apply_impulse(friction, point);
                b.apply_impulse(-friction, point);
            }
        }

        // Position correction to resolve penetration
        let excess = contact.depth - self.penetration_slop;
        if excess > 0.0 {
            let correction = normal * (excess * self.position_correction / inv_mass_sum);
            a.apply_correction(correction * inv_mass_a);
            b.apply_correction(-correction * inv_mass_b);
        }
    }
}
