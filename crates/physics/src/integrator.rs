//! # Physics Integration
//!
//! Semi-implicit Euler: velocities are updated from the accumulated force
//! and torque first, then the pose is advanced with the new velocities.

use glam::{Quat, Vec3};

use crate::body::RigidBody;

impl RigidBody {
    /// Advance the body by `dt` seconds and clear the force accumulators.
    ///
    /// Static bodies and non-positive or non-finite `dt` are ignored. The
    /// body rotates about its center of mass.
    pub fn integrate(&mut self, dt: f32) {
        if self.is_static() || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        self.prev_position = self.position;
        self.prev_orientation = self.orientation;

        // Velocities from accumulated force and torque
        self.velocity += self.force * (self.inverse_mass() * dt);
        self.angular_velocity += self.torque * (self.inverse_inertia() * dt);

        // Translate the center of mass, then rotate around it
        let center = self.center_of_mass() + self.velocity * dt;
        let w = self.angular_velocity;
        let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.orientation;
        let next = (self.orientation + spin * (0.5 * dt)).normalize();
        if next.is_finite() {
            self.orientation = next;
        }
        self.position = center - self.orientation * self.center_of_mass_local();

        // Flight tracking only while airborne
        if !self.in_contact() {
            self.flight.flight_time += dt;
            self.flight.distance_traveled += self.position.distance(self.prev_position);
        }

        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        self.refresh_world();
    }
}
