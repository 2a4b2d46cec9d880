//! # Force Model
//!
//! Environmental forces accumulated on every dynamic body before it is
//! integrated. [`apply_forces`] runs them in a fixed order: damping, gravity,
//! drag (or per-face drag and lift), then the Magnus effect. Each force is
//! also recorded by name in the body's [`ForceDebugInfo`].

use glam::Vec3;

use crate::body::RigidBody;
use crate::types::{AeroModel, ForceDebugInfo, PhysParams};

/// Relative air speeds below this produce no aerodynamic force
const MIN_AIR_SPEED: f32 = 1e-6;

/// Run the whole force pass for one body.
pub fn apply_forces(body: &mut RigidBody, params: &PhysParams) {
    if body.is_static() {
        return;
    }
    body.forces = ForceDebugInfo::default();

    apply_damping(body, params.damping);
    apply_gravity(body, params.gravity);

    let relative_air = body.velocity() - params.wind;
    body.update_projected_area(relative_air);

    match body.aero() {
        AeroModel::Panels if !body.hull().is_flat() => apply_panel_forces(body, params),
        AeroModel::Silhouette | AeroModel::Panels => apply_drag(body, params),
    }
    apply_magnus(body, params);
}

/// Multiply linear and angular velocity by `damping`.
pub fn apply_damping(body: &mut RigidBody, damping: f32) {
    if body.is_static() || !damping.is_finite() {
        return;
    }
    body.scale_velocities(damping.clamp(0.0, 1.0));
}

/// Weight `m · g` through the center of mass.
pub fn apply_gravity(body: &mut RigidBody, gravity: Vec3) {
    let weight = gravity * body.mass();
    body.add_force_at_com(weight);
    body.forces.gravity += weight;
}

/// Quadratic drag `½ ρ |v|² A Cd` against the relative air velocity, using
/// the silhouette area from the last area update.
pub fn apply_drag(body: &mut RigidBody, params: &PhysParams) {
    let relative_air = body.velocity() - params.wind;
    let speed = relative_air.length();
    if speed < MIN_AIR_SPEED {
        return;
    }
    let magnitude = 0.5 * params.air_density * speed * speed * body.projected_area() * body.drag_coefficient();
    let drag = -relative_air / speed * magnitude;
    body.add_force_at_com(drag);
    body.forces.drag += drag;
}

/// Per-face drag and lift applied at each leading hull face.
///
/// A face leads when its outward normal faces into the oncoming air. Its
/// exposed area is weighted by the cosine between normal and relative wind;
/// drag opposes the wind and lift acts perpendicular to it in the plane of
/// wind and normal.
pub fn apply_panel_forces(body: &mut RigidBody, params: &PhysParams) {
    let position = body.position();
    let orientation = body.orientation();
    let drag_coefficient = body.drag_coefficient();
    let lift_coefficient = body.lift_coefficient();

    let panels: Vec<(Vec3, Vec3, f32)> = body
        .hull()
        .faces()
        .iter()
        .map(|face| (position + orientation * face.centroid, orientation * face.normal, face.area))
        .collect();

    for (centroid, normal, area) in panels {
        let relative_air = body.point_velocity(centroid) - params.wind;
        let speed = relative_air.length();
        if speed < MIN_AIR_SPEED {
            continue;
        }
        let direction = relative_air / speed;
        let exposure = normal.dot(direction);
        if exposure <= 0.0 {
            continue;
        }

        let pressure = 0.5 * params.air_density * speed * speed * area * exposure;
        let drag = -direction * pressure * drag_coefficient;
        let lift = (direction * exposure - normal).normalize_or_zero() * pressure * lift_coefficient;

        body.add_force(drag + lift, centroid);
        body.forces.drag += drag;
        body.forces.lift += lift;
    }
}

/// Magnus force `½ ρ A r (ω × v_rel)` with `r` the bounding radius.
pub fn apply_magnus(body: &mut RigidBody, params: &PhysParams) {
    let relative_air = body.velocity() - params.wind;
    let spin = body.angular_velocity().cross(relative_air);
    if spin.length_squared() == 0.0 {
        return;
    }
    let coefficient = 0.5 * params.air_density * body.projected_area() * body.bounding_sphere().radius;
    let magnus = spin * coefficient;
    body.add_force_at_com(magnus);
    body.forces.magnus += magnus;
}
