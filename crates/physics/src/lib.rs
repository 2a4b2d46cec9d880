#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::many_single_char_names, clippy::similar_names)]
//! # Convex Hull Physics Engine
//!
//! A small rigid body engine for convex shapes given as point clouds. Bodies
//! fly under gravity and air forces and collide through GJK and EPA.
//!
//! ## Key Components
//!
//! -   **Bodies:** [`RigidBody`] keeps pose, velocities, mass properties and
//!     the convex hull of its point cloud. Bodies live in a [`PhysicsWorld`]
//!     and are addressed by [`BodyHandle`].
//! -   **Forces:** the [`forces`] module applies damping, gravity, drag,
//!     per-face lift and the Magnus effect before each integration step.
//! -   **Collision:** [`collision`] holds the hull and bounding sphere
//!     builders, the GJK/EPA narrow phase and the impulse solver.
//! -   **Stepping:** [`FixedStepper`] turns frame times into fixed ticks and
//!     [`transform::sync_transforms`] hands interpolated poses to a renderer.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{BodyDesc, Material, PhysicsWorld, PhysParams, Quat, ShapeDesc, Vec3};
//!
//! let mut world = PhysicsWorld::new(PhysParams::default());
//! let ground = ShapeDesc::Box { width: 20.0, height: 1.0, depth: 20.0 };
//! world.add_shape(&ground, Vec3::new(0.0, -0.5, 0.0), Quat::IDENTITY, &BodyDesc::fixed(Material::default()))?;
//! let ball = world.add_shape(
//!     &ShapeDesc::Sphere { radius: 0.25, segments: 16 },
//!     Vec3::new(0.0, 5.0, 0.0),
//!     Quat::IDENTITY,
//!     &BodyDesc::dynamic(0.45),
//! )?;
//!
//! for _ in 0..60 {
//!     world.update(1.0 / 60.0);
//! }
//! assert!(world.body(ball).unwrap().position().y < 5.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod body;
pub mod builder;
pub mod collision;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod shapes;
pub mod simulation;
pub mod stepper;
pub mod transform;
pub mod types;

pub use body::RigidBody;
pub use collision::{Contact, ConvexHull};
pub use error::PhysicsError;
pub use shapes::ShapeDesc;
pub use simulation::PhysicsWorld;
pub use stepper::{FixedStepper, StepReport};
pub use transform::RenderTransform;
pub use types::{
    AeroModel, BodyDesc, BodyHandle, ContactDebugInfo, FlightStats, ForceDebugInfo, Material, PhysParams,
    PhysicsDebugInfo, Quat, Vec2, Vec3,
};
