//! # World Builder
//!
//! Adding and removing bodies. Handles are allocated monotonically, so a
//! handle kept after its body was removed never aliases a newer body.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::body::RigidBody;
use crate::error::PhysicsError;
use crate::shapes::ShapeDesc;
use crate::simulation::PhysicsWorld;
use crate::types::{BodyDesc, BodyHandle};

impl PhysicsWorld {
    /// Add a body built from a local point cloud.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`RigidBody::new`]; the world is
    /// unchanged on failure.
    pub fn add_body(
        &mut self,
        points: &[Vec3],
        position: Vec3,
        orientation: Quat,
        desc: &BodyDesc,
    ) -> Result<BodyHandle, PhysicsError> {
        let handle = BodyHandle(self.next_handle);
        let body = RigidBody::new(handle, points, position, orientation, desc)?;
        debug!(
            %handle,
            vertices = body.hull().vertices().len(),
            faces = body.hull().faces().len(),
            mass = body.mass(),
            "added body"
        );
        self.bodies.push(body);
        self.next_handle += 1;
        Ok(handle)
    }

    /// Add one of the primitive shapes.
    ///
    /// # Errors
    ///
    /// See [`Self::add_body`].
    pub fn add_shape(
        &mut self,
        shape: &ShapeDesc,
        position: Vec3,
        orientation: Quat,
        desc: &BodyDesc,
    ) -> Result<BodyHandle, PhysicsError> {
        self.add_body(&shape.points(), position, orientation, desc)
    }

    /// Remove a body, keeping the order of the others.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownBody`] if the handle is not (or no longer) present.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody, PhysicsError> {
        let index = self
            .bodies
            .iter()
            .position(|b| b.handle() == handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        debug!(%handle, "removed body");
        Ok(self.bodies.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Material;

    #[test]
    fn handles_are_never_reused() {
        let mut world = PhysicsWorld::default();
        let shape = ShapeDesc::default();
        let a = world.add_shape(&shape, Vec3::ZERO, Quat::IDENTITY, &BodyDesc::default()).unwrap();
        let b = world.add_shape(&shape, Vec3::X * 3.0, Quat::IDENTITY, &BodyDesc::default()).unwrap();
        world.remove_body(a).unwrap();
        let c = world.add_shape(&shape, Vec3::X * 6.0, Quat::IDENTITY, &BodyDesc::default()).unwrap();
        assert_ne!(a, c);
        assert_eq!(world.remove_body(a).unwrap_err(), PhysicsError::UnknownBody(a));
        let order: Vec<BodyHandle> = world.bodies().map(RigidBody::handle).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn failed_add_leaves_world_unchanged() {
        let mut world = PhysicsWorld::default();
        let err = world
            .add_body(&[], Vec3::ZERO, Quat::IDENTITY, &BodyDesc::fixed(Material::default()))
            .unwrap_err();
        assert_eq!(err, PhysicsError::EmptyPointCloud);
        assert!(world.is_empty());
        let handle = world
            .add_shape(&ShapeDesc::default(), Vec3::ZERO, Quat::IDENTITY, &BodyDesc::default())
            .unwrap();
        assert_eq!(handle, BodyHandle(0));
    }
}
