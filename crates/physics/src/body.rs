//! # Rigid Bodies
//!
//! A [`RigidBody`] owns its pose, velocities, mass properties and a convex
//! hull built once from the point cloud it was created with. World-space
//! vertices and the world bounding sphere are cached and refreshed whenever
//! the pose changes.

use glam::{Quat, Vec3};

use crate::collision::hull::{projected_area, BoundingSphere, ConvexHull};
use crate::collision::Contact;
use crate::error::PhysicsError;
use crate::types::{AeroModel, BodyDesc, BodyHandle, ContactDebugInfo, FlightStats, ForceDebugInfo, Material};

/// A convex rigid body. `mass == 0` makes it static.
#[derive(Clone, Debug)]
pub struct RigidBody {
    handle: BodyHandle,

    // Pose
    pub(crate) position: Vec3,
    pub(crate) orientation: Quat,
    pub(crate) prev_position: Vec3,
    pub(crate) prev_orientation: Quat,
    pub(crate) velocity: Vec3,
    pub(crate) angular_velocity: Vec3,

    // Mass properties
    mass: f32,
    inverse_mass: f32,
    inertia: f32,
    inverse_inertia: f32,
    center_of_mass_local: Vec3,
    center_of_mass: Vec3,

    // Geometry
    hull: ConvexHull,
    world_vertices: Vec<Vec3>,
    local_sphere: BoundingSphere,
    world_sphere: BoundingSphere,
    projected_area: f32,

    // Accumulators, cleared by `integrate`
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,

    drag_coefficient: f32,
    lift_coefficient: f32,
    material: Material,
    aero: AeroModel,

    // Tracking
    pub(crate) flight: FlightStats,
    in_contact: bool,
    last_contact: Option<ContactDebugInfo>,
    pub(crate) forces: ForceDebugInfo,
}

impl RigidBody {
    /// Build a body from a local point cloud placed at `position`.
    ///
    /// The moment of inertia is the solid-sphere approximation
    /// `2/5 · m · r²` with `r` the local bounding-sphere radius.
    ///
    /// # Errors
    ///
    /// Fails on an invalid [`BodyDesc`], a non-finite pose, or an empty or
    /// non-finite point cloud.
    pub fn new(
        handle: BodyHandle,
        points: &[Vec3],
        position: Vec3,
        orientation: Quat,
        desc: &BodyDesc,
    ) -> Result<Self, PhysicsError> {
        desc.validate()?;
        if !position.is_finite() {
            return Err(PhysicsError::NonFiniteState("position"));
        }
        let orientation = unit_orientation(orientation)?;

        let hull = ConvexHull::from_points(points)?;
        let local_sphere = BoundingSphere::from_points(hull.vertices());

        let mass = desc.mass;
        let (inverse_mass, inertia) = if mass > 0.0 {
            (1.0 / mass, 0.4 * mass * local_sphere.radius * local_sphere.radius)
        } else {
            (0.0, 0.0)
        };
        let inverse_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };

        let mut body = Self {
            handle,
            position,
            orientation,
            prev_position: position,
            prev_orientation: orientation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            inverse_mass,
            inertia,
            inverse_inertia,
            center_of_mass_local: desc.center_of_mass,
            center_of_mass: position,
            world_vertices: Vec::with_capacity(hull.vertices().len()),
            hull,
            local_sphere,
            world_sphere: local_sphere,
            projected_area: 0.0,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            drag_coefficient: desc.drag_coefficient,
            lift_coefficient: desc.lift_coefficient,
            material: desc.material,
            aero: desc.aero,
            flight: FlightStats::default(),
            in_contact: false,
            last_contact: None,
            forces: ForceDebugInfo::default(),
        };
        body.refresh_world();
        Ok(body)
    }

    /// Re-pose the cached world vertices, bounding sphere and center of mass.
    pub fn refresh_world(&mut self) {
        let (position, orientation) = (self.position, self.orientation);
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.hull.vertices().iter().map(|v| position + orientation * *v));
        self.world_sphere = self.local_sphere.transformed(position, orientation);
        self.center_of_mass = position + orientation * self.center_of_mass_local;
    }

    /// Accumulate `force` applied at the world point `point`.
    pub fn add_force(&mut self, force: Vec3, point: Vec3) {
        if self.is_static() || !force.is_finite() || !point.is_finite() {
            return;
        }
        self.force += force;
        self.torque += (point - self.center_of_mass).cross(force);
    }

    /// Accumulate `force` through the center of mass (no torque).
    pub fn add_force_at_com(&mut self, force: Vec3) {
        if self.is_static() || !force.is_finite() {
            return;
        }
        self.force += force;
    }

    /// Apply an instantaneous impulse at the world point `point`.
    pub fn add_impulse(&mut self, impulse: Vec3, point: Vec3) {
        if self.is_static() || !impulse.is_finite() || !point.is_finite() {
            return;
        }
        self.velocity += impulse * self.inverse_mass;
        self.angular_velocity += (point - self.center_of_mass).cross(impulse) * self.inverse_inertia;
    }

    /// Teleport the body. The previous pose is reset too, so interpolation
    /// does not sweep across the jump.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NonFiniteState`] for a non-finite position or an
    /// orientation that cannot be normalized.
    pub fn set_transform(&mut self, position: Vec3, orientation: Quat) -> Result<(), PhysicsError> {
        if !position.is_finite() {
            return Err(PhysicsError::NonFiniteState("position"));
        }
        let orientation = unit_orientation(orientation)?;
        self.position = position;
        self.orientation = orientation;
        self.prev_position = position;
        self.prev_orientation = orientation;
        self.refresh_world();
        Ok(())
    }

    /// Set the linear velocity. Ignored for static bodies.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NonFiniteState`] for a non-finite velocity.
    pub fn set_velocity(&mut self, velocity: Vec3) -> Result<(), PhysicsError> {
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFiniteState("velocity"));
        }
        if !self.is_static() {
            self.velocity = velocity;
        }
        Ok(())
    }

    /// Set the angular velocity (rad/s, world axes). Ignored for static bodies.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NonFiniteState`] for a non-finite angular velocity.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) -> Result<(), PhysicsError> {
        if !angular_velocity.is_finite() {
            return Err(PhysicsError::NonFiniteState("angular_velocity"));
        }
        if !self.is_static() {
            self.angular_velocity = angular_velocity;
        }
        Ok(())
    }

    /// Pose between the previous and current tick, `alpha` in `[0, 1]`.
    #[must_use]
    pub fn interpolated_transform(&self, alpha: f32) -> (Vec3, Quat) {
        let alpha = alpha.clamp(0.0, 1.0);
        (
            self.prev_position.lerp(self.position, alpha),
            self.prev_orientation.slerp(self.orientation, alpha),
        )
    }

    pub(crate) fn move_by(&mut self, offset: Vec3) {
        if self.is_static() || !offset.is_finite() {
            return;
        }
        self.position += offset;
        self.refresh_world();
    }

    pub(crate) fn scale_velocities(&mut self, factor: f32) {
        self.velocity *= factor;
        self.angular_velocity *= factor;
    }

    pub(crate) fn update_projected_area(&mut self, direction: Vec3) {
        self.projected_area = projected_area(&self.world_vertices, direction);
    }

    pub(crate) fn clear_contact_flag(&mut self) {
        self.in_contact = false;
    }

    /// Remember a contact; `contact.normal` must point away from `other`.
    pub(crate) fn record_contact(&mut self, other: BodyHandle, contact: &Contact) {
        self.in_contact = true;
        self.last_contact = Some(ContactDebugInfo {
            other,
            point: contact.point,
            normal: contact.normal,
            depth: contact.depth,
        });
    }

    #[must_use]
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[must_use]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Velocity of the material point currently at `point`.
    #[must_use]
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(point - self.center_of_mass)
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Linear plus rotational kinetic energy.
    #[must_use]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
            + 0.5 * self.inertia * self.angular_velocity.length_squared()
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    #[must_use]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    #[must_use]
    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// World-space center of mass
    #[must_use]
    pub fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    /// Center of mass offset in body coordinates
    #[must_use]
    pub fn center_of_mass_local(&self) -> Vec3 {
        self.center_of_mass_local
    }

    #[must_use]
    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }

    #[must_use]
    pub fn world_vertices(&self) -> &[Vec3] {
        &self.world_vertices
    }

    /// World-space bounding sphere
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.world_sphere
    }

    /// Silhouette area along the relative air velocity, from the last force pass
    #[must_use]
    pub fn projected_area(&self) -> f32 {
        self.projected_area
    }

    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    #[must_use]
    pub fn drag_coefficient(&self) -> f32 {
        self.drag_coefficient
    }

    #[must_use]
    pub fn lift_coefficient(&self) -> f32 {
        self.lift_coefficient
    }

    #[must_use]
    pub fn aero(&self) -> AeroModel {
        self.aero
    }

    #[must_use]
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    #[must_use]
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    #[must_use]
    pub fn flight_stats(&self) -> FlightStats {
        self.flight
    }

    /// Whether the body touched anything during the last tick
    #[must_use]
    pub fn in_contact(&self) -> bool {
        self.in_contact
    }

    #[must_use]
    pub fn last_contact(&self) -> Option<ContactDebugInfo> {
        self.last_contact
    }

    /// Named forces applied during the last force pass
    #[must_use]
    pub fn force_debug(&self) -> ForceDebugInfo {
        self.forces
    }

    /// Every kinematic quantity is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}

fn unit_orientation(orientation: Quat) -> Result<Quat, PhysicsError> {
    let length = orientation.length();
    if !orientation.is_finite() || length <= f32::EPSILON {
        return Err(PhysicsError::NonFiniteState("orientation"));
    }
    Ok(orientation / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::box_points;

    fn cube(mass: f32) -> RigidBody {
        RigidBody::new(
            BodyHandle(0),
            &box_points(Vec3::splat(0.5)),
            Vec3::new(0.0, 2.0, 0.0),
            Quat::IDENTITY,
            &BodyDesc::dynamic(mass),
        )
        .unwrap()
    }

    #[test]
    fn inertia_uses_bounding_radius() {
        let body = cube(2.0);
        let r = 3.0_f32.sqrt() * 0.5;
        assert!((body.inertia() - 0.4 * 2.0 * r * r).abs() < 1e-4);
        assert!((body.inverse_mass() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn static_body_ignores_forces_and_impulses() {
        let mut body = cube(0.0);
        assert!(body.is_static());
        assert_eq!(body.inverse_inertia(), 0.0);
        body.add_force(Vec3::X * 10.0, Vec3::ZERO);
        body.add_impulse(Vec3::X * 10.0, Vec3::ZERO);
        body.set_velocity(Vec3::Y).unwrap();
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn off_center_force_produces_torque() {
        let mut body = cube(1.0);
        body.add_force(Vec3::X, body.center_of_mass() + Vec3::Y);
        assert_eq!(body.accumulated_torque(), Vec3::new(0.0, 0.0, -1.0));
        body.add_force_at_com(Vec3::X);
        assert_eq!(body.accumulated_force(), Vec3::X * 2.0);
    }

    #[test]
    fn off_center_impulse_spins() {
        let mut body = cube(1.0);
        body.add_impulse(Vec3::X, body.center_of_mass() + Vec3::Y * 0.5);
        assert_eq!(body.velocity(), Vec3::X);
        assert!(body.angular_velocity().z < 0.0);
    }

    #[test]
    fn world_vertices_follow_transform() {
        let mut body = cube(1.0);
        body.set_transform(Vec3::new(5.0, 0.0, 0.0), Quat::from_rotation_y(0.3))
            .unwrap();
        let max_x = body
            .world_vertices()
            .iter()
            .map(|v| v.x)
            .fold(f32::MIN, f32::max);
        assert!(max_x > 5.5);
        assert!((body.bounding_sphere().center - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn invalid_construction_is_rejected() {
        let points = box_points(Vec3::splat(0.5));
        let nan = RigidBody::new(
            BodyHandle(1),
            &points,
            Vec3::NAN,
            Quat::IDENTITY,
            &BodyDesc::default(),
        );
        assert_eq!(nan.unwrap_err(), PhysicsError::NonFiniteState("position"));
        let empty = RigidBody::new(BodyHandle(1), &[], Vec3::ZERO, Quat::IDENTITY, &BodyDesc::default());
        assert_eq!(empty.unwrap_err(), PhysicsError::EmptyPointCloud);
    }

    #[test]
    fn kinetic_energy_counts_spin() {
        let mut body = cube(2.0);
        body.set_velocity(Vec3::new(3.0, 0.0, 0.0)).unwrap();
        assert!((body.kinetic_energy() - 9.0).abs() < 1e-5);
        body.set_angular_velocity(Vec3::Y).unwrap();
        assert!((body.kinetic_energy() - 9.0 - 0.5 * body.inertia()).abs() < 1e-5);
    }
}
