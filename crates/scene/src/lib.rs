#![deny(clippy::all, clippy::pedantic)]
//! # Scene Descriptions
//!
//! JSON scenes: world parameters plus a list of bodies, each with a
//! primitive shape, an initial pose and velocity, and a [`BodyDesc`].
//!
//! ```json
//! {
//!   "params": { "wind": [2.0, 0.0, 0.0] },
//!   "bodies": [
//!     { "id": "ball", "shape": "sphere", "radius": 0.25,
//!       "position": [0.0, 8.0, 0.0], "velocity": [20.0, 20.0, 0.0] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::f32::consts::FRAC_1_SQRT_2;

use anyhow::{bail, Context, Result};
use glam::{Quat, Vec3};
use physics::{BodyDesc, BodyHandle, Material, PhysParams, PhysicsWorld, ShapeDesc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub params: PhysParams,
    pub bodies: Vec<SceneBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBody {
    /// Name used to look the body up after loading
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeDesc,
    pub position: Vec3,
    #[serde(default)]
    pub orientation: Quat,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default)]
    pub angular_velocity: Vec3,
    #[serde(default)]
    pub body: BodyDesc,
}

/// A loaded scene: the world and the handles of named bodies.
#[derive(Debug)]
pub struct LoadedScene {
    pub world: PhysicsWorld,
    pub names: HashMap<String, BodyHandle>,
}

impl LoadedScene {
    #[must_use]
    pub fn handle(&self, id: &str) -> Option<BodyHandle> {
        self.names.get(id).copied()
    }
}

impl Scene {
    /// Parse a scene from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or unknown shape tags.
    pub fn from_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scene JSON")
    }

    /// Build the world, adding bodies in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids and on any body the physics engine rejects;
    /// the error names the offending body.
    pub fn into_world(self) -> Result<LoadedScene> {
        let mut world = PhysicsWorld::new(self.params);
        let mut names = HashMap::new();

        for (index, body) in self.bodies.into_iter().enumerate() {
            let label = body.id.clone().unwrap_or_else(|| format!("#{index}"));
            let handle = world
                .add_shape(&body.shape, body.position, body.orientation, &body.body)
                .with_context(|| format!("cannot add body {label}"))?;

            let rigid = world.try_body_mut(handle)?;
            rigid
                .set_velocity(body.velocity)
                .with_context(|| format!("body {label}"))?;
            rigid
                .set_angular_velocity(body.angular_velocity)
                .with_context(|| format!("body {label}"))?;

            if let Some(id) = body.id {
                if names.insert(id.clone(), handle).is_some() {
                    bail!("duplicate body id {id}");
                }
            }
        }

        info!(bodies = world.len(), "scene loaded");
        Ok(LoadedScene { world, names })
    }
}

/// Projectile launch: a static ground slab and one box fired from a
/// launcher 8 m up, 45° above the horizon at 30 m/s.
#[must_use]
pub fn default_launch_scene() -> Scene {
    let speed = 30.0;
    Scene {
        params: PhysParams::default(),
        bodies: vec![
            SceneBody {
                id: Some("ground".to_owned()),
                shape: ShapeDesc::Box {
                    width: 200.0,
                    height: 1.0,
                    depth: 200.0,
                },
                position: Vec3::new(0.0, -0.5, 0.0),
                orientation: Quat::IDENTITY,
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                body: BodyDesc::fixed(Material::default()),
            },
            SceneBody {
                id: Some("projectile".to_owned()),
                shape: ShapeDesc::default(),
                position: Vec3::new(0.0, 8.0, 0.0),
                orientation: Quat::IDENTITY,
                velocity: Vec3::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0) * speed,
                angular_velocity: Vec3::ZERO,
                body: BodyDesc::default(),
            },
        ],
    }
}
