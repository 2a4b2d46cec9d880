//! # Collision Detection and Response
//!
//! Narrow phase between convex hulls: [`gjk`] decides overlap, [`epa`]
//! measures it, and [`response`] turns the resulting [`Contact`] into
//! impulses and a positional correction.

pub mod broad_phase;
pub mod epa;
pub mod gjk;
pub mod hull;
pub mod response;

pub use broad_phase::get_potential_collision_pairs;
pub use hull::{projected_area, BoundingSphere, ConvexHull, HullFace};
pub use response::{CollisionResponder, CollisionSolver};

use glam::Vec3;

use self::gjk::GjkResult;

/// Contact information for collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal pointing from body B toward body A
    pub normal: Vec3,
    /// Penetration depth, never negative
    pub depth: f32,
}

impl Contact {
    /// The same contact seen from the other body.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}

/// Narrow-phase test between two world-space vertex sets.
///
/// Degenerate geometry and exhausted iteration budgets report no contact.
#[must_use]
pub fn detect_contact(a: &[Vec3], b: &[Vec3]) -> Option<Contact> {
    let GjkResult::Intersecting(seed) = gjk::intersect(a, b) else {
        return None;
    };
    let result = epa::penetration(a, b, &seed)?;
    Some(Contact {
        point: result.point,
        normal: -result.normal,
        depth: result.depth,
    })
}

/// Combine friction coefficients using geometric mean
#[must_use]
pub fn combine_friction(f1: f32, f2: f32) -> f32 {
    (f1 * f2).sqrt()
}

/// Combine restitution coefficients: the less elastic surface wins
#[must_use]
pub fn combine_restitution(r1: f32, r2: f32) -> f32 {
    r1.min(r2)
}
