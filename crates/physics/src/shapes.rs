//! Point cloud generators for the primitive shapes a host usually spawns.
//!
//! The engine itself only ever sees point clouds; these helpers stand in for
//! a mesh layer when a host (or a test) just needs a box, sphere or cylinder.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

/// Primitive shape description, centered on the local origin.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeDesc {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        #[serde(default = "default_segments")]
        segments: u32,
    },
}

fn default_segments() -> u32 {
    16
}

impl Default for ShapeDesc {
    fn default() -> Self {
        Self::Box {
            width: 0.5,
            height: 0.5,
            depth: 0.5,
        }
    }
}

impl ShapeDesc {
    /// Generate the local-space point cloud for this shape.
    #[must_use]
    pub fn points(&self) -> Vec<Vec3> {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => box_points(Vec3::new(width, height, depth) * 0.5),
            Self::Sphere { radius, segments } => sphere_points(radius, segments, segments / 2),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => cylinder_points(radius_top, radius_bottom, height, segments),
        }
    }
}

/// The eight corners of an axis-aligned box.
#[must_use]
pub fn box_points(half_extents: Vec3) -> Vec<Vec3> {
    let h = half_extents.abs();
    let mut points = Vec::with_capacity(8);
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                points.push(Vec3::new(sx * h.x, sy * h.y, sz * h.z));
            }
        }
    }
    points
}

/// UV sphere vertices: one vertex per pole plus `rings - 1` latitude rings.
#[must_use]
pub fn sphere_points(radius: f32, segments: u32, rings: u32) -> Vec<Vec3> {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut points = Vec::with_capacity((segments * (rings - 1) + 2) as usize);
    points.push(Vec3::new(0.0, radius, 0.0));
    for ring in 1..rings {
        #[allow(clippy::cast_precision_loss)]
        let theta = PI * ring as f32 / rings as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for segment in 0..segments {
            #[allow(clippy::cast_precision_loss)]
            let phi = TAU * segment as f32 / segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            points.push(Vec3::new(cos_p * sin_t, cos_t, sin_p * sin_t) * radius);
        }
    }
    points.push(Vec3::new(0.0, -radius, 0.0));
    points
}

/// Two rings of `segments` vertices at `y = ±height / 2`.
#[must_use]
pub fn cylinder_points(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Vec<Vec3> {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut points = Vec::with_capacity(2 * segments as usize);
    for (y, radius) in [(half, radius_top), (-half, radius_bottom)] {
        if radius <= 0.0 {
            // Cone apex
            points.push(Vec3::new(0.0, y, 0.0));
            continue;
        }
        for segment in 0..segments {
            #[allow(clippy::cast_precision_loss)]
            let phi = TAU * segment as f32 / segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            points.push(Vec3::new(cos_p * radius, y, sin_p * radius));
        }
    }
    points
}
