//! # Shared Types
//!
//! Configuration and telemetry types exchanged between the world, its
//! bodies and host layers. Math types are re-exported from `glam`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use glam::{Quat, Vec2, Vec3};

use crate::error::PhysicsError;

/// Stable identifier of a body inside a [`crate::PhysicsWorld`].
///
/// Handles are allocated monotonically and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World-wide environment parameters
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysParams {
    /// Constant gravitational acceleration (m/s²)
    pub gravity: Vec3,
    /// Per-tick velocity multiplier applied before forces accumulate
    pub damping: f32,
    /// Air density (kg/m³)
    pub air_density: f32,
    /// Uniform wind velocity (m/s), folded into the relative air velocity
    pub wind: Vec3,
}

impl Default for PhysParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            damping: 0.99,
            air_density: 1.225,
            wind: Vec3::ZERO,
        }
    }
}

impl PhysParams {
    /// Parameters with gravity only: no damping, no air.
    #[must_use]
    pub fn vacuum() -> Self {
        Self {
            damping: 1.0,
            air_density: 0.0,
            ..Self::default()
        }
    }
}

/// Surface response coefficients
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.8,
        }
    }
}

impl Material {
    #[must_use]
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }

    /// High restitution, low friction
    #[must_use]
    pub const fn bouncy() -> Self {
        Self::new(0.1, 0.95)
    }
}

/// Which aerodynamic model a body uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AeroModel {
    /// Whole-body drag from the projected silhouette area, plus Magnus.
    #[default]
    Silhouette,
    /// Per-face drag and lift applied at each hull face centroid, plus Magnus.
    Panels,
}

/// Static per-body configuration supplied when a body is added.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDesc {
    /// Mass in kg; `0.0` makes the body static.
    pub mass: f32,
    pub drag_coefficient: f32,
    pub lift_coefficient: f32,
    pub material: Material,
    /// Center of mass offset in body-local coordinates
    pub center_of_mass: Vec3,
    pub aero: AeroModel,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag_coefficient: 0.5,
            lift_coefficient: 0.0,
            material: Material::default(),
            center_of_mass: Vec3::ZERO,
            aero: AeroModel::Silhouette,
        }
    }
}

impl BodyDesc {
    /// A static (infinite mass) body with the given material.
    #[must_use]
    pub fn fixed(material: Material) -> Self {
        Self {
            mass: 0.0,
            material,
            ..Self::default()
        }
    }

    /// A dynamic body of the given mass with default coefficients.
    #[must_use]
    pub fn dynamic(mass: f32) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[must_use]
    pub fn with_aero(mut self, aero: AeroModel) -> Self {
        self.aero = aero;
        self
    }

    /// Check that every coefficient is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidMass`] or
    /// [`PhysicsError::InvalidCoefficient`] for negative or non-finite values.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        let coefficients = [
            ("drag_coefficient", self.drag_coefficient),
            ("lift_coefficient", self.lift_coefficient),
            ("friction", self.material.friction),
            ("restitution", self.material.restitution),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidCoefficient { name, value });
            }
        }
        if !self.center_of_mass.is_finite() {
            return Err(PhysicsError::NonFiniteState("center_of_mass"));
        }
        Ok(())
    }
}

/// Forces applied to a body during the last force pass, by name.
///
/// Presentation layers may draw these; the core never reads them back.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ForceDebugInfo {
    pub gravity: Vec3,
    pub drag: Vec3,
    pub lift: Vec3,
    pub magnus: Vec3,
}

impl ForceDebugInfo {
    /// Net force of the last pass; matches the force accumulated on the body
    #[must_use]
    pub fn total(&self) -> Vec3 {
        self.gravity + self.drag + self.lift + self.magnus
    }
}

/// The most recent contact a body took part in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactDebugInfo {
    pub other: BodyHandle,
    pub point: Vec3,
    /// Unit normal pointing away from `other`
    pub normal: Vec3,
    pub depth: f32,
}

/// Flight statistics accumulated by the integrator.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FlightStats {
    /// Seconds integrated while not touching anything
    pub flight_time: f32,
    /// Path length covered while not touching anything
    pub distance_traveled: f32,
}

/// Snapshot of the world for telemetry.
#[derive(Clone, Debug, Default)]
pub struct PhysicsDebugInfo {
    pub tick: u64,
    pub num_bodies: usize,
    pub num_static: usize,
    pub contacts_last_tick: usize,
    pub total_kinetic_energy: f32,
    pub params: PhysParams,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_desc_is_valid() {
        assert_eq!(BodyDesc::default().validate(), Ok(()));
        assert_eq!(BodyDesc::fixed(Material::default()).validate(), Ok(()));
    }

    #[test]
    fn negative_mass_is_rejected() {
        let desc = BodyDesc::dynamic(-1.0);
        assert_eq!(desc.validate(), Err(PhysicsError::InvalidMass(-1.0)));
    }

    #[test]
    fn nan_restitution_is_rejected() {
        let desc = BodyDesc::default().with_material(Material::new(0.5, f32::NAN));
        assert!(matches!(
            desc.validate(),
            Err(PhysicsError::InvalidCoefficient { name: "restitution", .. })
        ));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: PhysParams = serde_json::from_str(r#"{ "damping": 1.0 }"#).unwrap();
        assert_eq!(params.damping, 1.0);
        assert_eq!(params.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(params.air_density, 1.225);
    }
}
