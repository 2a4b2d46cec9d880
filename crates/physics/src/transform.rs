//! Transform matrix utilities for physics objects
//!
//! One-way sync from the physics world to a renderer: body poses are turned
//! into column-major 4x4 matrices that can be uploaded as-is.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::simulation::PhysicsWorld;
use crate::types::BodyHandle;

/// Per-body model matrix, laid out for direct GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderTransform {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    pub handle: u32,
    pub _pad: [u32; 3],
}

/// Convert position and quaternion to a 4x4 transformation matrix
#[must_use]
pub fn to_transform_matrix(position: Vec3, orientation: Quat) -> [[f32; 4]; 4] {
    Mat4::from_rotation_translation(orientation, position).to_cols_array_2d()
}

/// Model matrices for every body, interpolated `alpha` of the way from the
/// previous tick to the current one.
#[must_use]
pub fn sync_transforms(world: &PhysicsWorld, alpha: f32) -> Vec<RenderTransform> {
    world
        .bodies()
        .map(|body| {
            let (position, orientation) = body.interpolated_transform(alpha);
            let BodyHandle(handle) = body.handle();
            RenderTransform {
                model: to_transform_matrix(position, orientation),
                handle,
                _pad: [0; 3],
            }
        })
        .collect()
}
