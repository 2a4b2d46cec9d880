//! # Physics Simulation Core
//!
//! [`PhysicsWorld`] owns every body and advances them one tick at a time:
//! forces, integration, broad phase, narrow phase and contact response, in
//! that order. Pairs are visited once per tick in insertion order.

use tracing::{debug, trace, warn};

use crate::body::RigidBody;
use crate::collision::{detect_contact, get_potential_collision_pairs, BoundingSphere, CollisionSolver};
use crate::error::PhysicsError;
use crate::forces::apply_forces;
use crate::types::{BodyHandle, PhysParams, PhysicsDebugInfo};

/// Main physics simulation container
#[derive(Clone, Debug, Default)]
pub struct PhysicsWorld {
    pub params: PhysParams,
    pub solver: CollisionSolver,
    pub(crate) bodies: Vec<RigidBody>,
    pub(crate) next_handle: u32,
    tick: u64,
    contacts_last_tick: usize,
}

impl PhysicsWorld {
    /// Create a new empty world
    #[must_use]
    pub fn new(params: PhysParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Advance every body by `dt` seconds.
    ///
    /// A non-positive or non-finite `dt` leaves the world untouched.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            warn!(dt, "ignoring update with invalid timestep");
            return;
        }

        // 1. Accumulate forces and integrate
        for body in &mut self.bodies {
            apply_forces(body, &self.params);
            body.integrate(dt);
            body.clear_contact_flag();
        }

        // 2. Broad phase on the refreshed world spheres
        let spheres: Vec<BoundingSphere> = self.bodies.iter().map(RigidBody::bounding_sphere).collect();
        let is_static: Vec<bool> = self.bodies.iter().map(RigidBody::is_static).collect();
        let pairs = get_potential_collision_pairs(&spheres, &is_static);

        // 3. Narrow phase and response, one pass
        let mut contacts = 0;
        for (i, j) in pairs {
            let (head, tail) = self.bodies.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);

            if !a.is_finite() || !b.is_finite() {
                warn!(a = %a.handle(), b = %b.handle(), "skipping pair with non-finite state");
                continue;
            }
            let Some(contact) = detect_contact(a.world_vertices(), b.world_vertices()) else {
                continue;
            };
            trace!(
                a = %a.handle(),
                b = %b.handle(),
                depth = contact.depth,
                normal = ?contact.normal,
                "contact"
            );

            self.solver.resolve(a, b, &contact);
            a.record_contact(b.handle(), &contact);
            b.record_contact(a.handle(), &contact.flipped());
            contacts += 1;
        }

        self.tick += 1;
        self.contacts_last_tick = contacts;
        debug!(
            tick = self.tick,
            bodies = self.bodies.len(),
            contacts,
            "physics tick"
        );
    }

    /// Look up a body by handle
    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.handle() == handle)
    }

    /// Look up a body by handle for mutation
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.handle() == handle)
    }

    /// Like [`Self::body_mut`] but with a typed error for hosts.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if no body has this handle.
    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.body_mut(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of completed ticks
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Get debug information
    #[must_use]
    pub fn debug_info(&self) -> PhysicsDebugInfo {
        PhysicsDebugInfo {
            tick: self.tick,
            num_bodies: self.bodies.len(),
            num_static: self.bodies.iter().filter(|b| b.is_static()).count(),
            contacts_last_tick: self.contacts_last_tick,
            total_kinetic_energy: self.bodies.iter().map(RigidBody::kinetic_energy).sum(),
            params: self.params,
        }
    }
}
