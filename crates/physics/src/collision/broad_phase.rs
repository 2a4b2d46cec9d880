//! Broad-phase collision culling with world bounding spheres

use super::hull::BoundingSphere;

/// Potential collision pairs `(i, j)` with `i < j`, in insertion order.
///
/// Pairs of two static bodies are never produced; other pairs survive
/// unless their spheres are strictly apart.
#[must_use]
pub fn get_potential_collision_pairs(spheres: &[BoundingSphere], is_static: &[bool]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, sphere_a) in spheres.iter().enumerate() {
        for (j, sphere_b) in spheres.iter().enumerate().skip(i + 1) {
            let both_static = is_static.get(i).copied().unwrap_or(false) && is_static.get(j).copied().unwrap_or(false);
            if !both_static && sphere_a.intersects(sphere_b) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
