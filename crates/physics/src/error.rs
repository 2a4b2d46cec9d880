use thiserror::Error;

use crate::types::BodyHandle;

/// Errors raised while building bodies or addressing them through the world.
///
/// The per-tick pipeline never returns these: degenerate geometry and invalid
/// state downgrade to "no contact" or a silent no-op instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("point cloud is empty")]
    EmptyPointCloud,
    #[error("point cloud contains a non-finite coordinate at index {0}")]
    NonFinitePoint(usize),
    #[error("mass must be finite and non-negative, got {0}")]
    InvalidMass(f32),
    #[error("coefficient `{name}` must be finite and non-negative, got {value}")]
    InvalidCoefficient { name: &'static str, value: f32 },
    #[error("initial state `{0}` is not finite")]
    NonFiniteState(&'static str),
    #[error("no body with handle {0}")]
    UnknownBody(BodyHandle),
}
