//! Expanding Polytope Algorithm
//!
//! Grows the GJK tetrahedron towards the boundary of the Minkowski
//! difference until the face closest to the origin stops moving. That face
//! gives the penetration normal and depth; its barycentric weights applied
//! to the support witnesses give the contact point.

use glam::Vec3;

use super::gjk::{support, Simplex, SupportPoint};
use super::hull::toggle_edge;

const MAX_EPA_ITERATIONS: usize = 64;
const EPA_TOLERANCE: f32 = 1e-4;
/// Faces whose doubled area squared falls below this are skipped
const FACE_AREA_EPSILON: f32 = 1e-12;
const VISIBILITY_EPSILON: f32 = 1e-6;

/// Penetration of `A` into `B`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EpaResult {
    /// Unit direction in which `A` pushes into `B`
    pub normal: Vec3,
    pub depth: f32,
    /// Midpoint of the deepest points on both hulls
    pub point: Vec3,
}

#[derive(Copy, Clone, Debug)]
struct FacePlane {
    normal: Vec3,
    distance: f32,
}

/// Expand an enclosing tetrahedron into penetration data.
///
/// Returns `None` when the seed is not a tetrahedron or the polytope has no
/// usable face left.
#[must_use]
pub fn penetration(a: &[Vec3], b: &[Vec3], seed: &Simplex) -> Option<EpaResult> {
    if seed.len() != 4 {
        return None;
    }
    let mut vertices: Vec<SupportPoint> = seed.points().to_vec();
    let interior = vertices.iter().map(|v| v.point).sum::<Vec3>() * 0.25;
    let mut faces: Vec<[usize; 3]> = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]
        .into_iter()
        .map(|face| orient_outward(&vertices, face, interior))
        .collect();

    let mut best = None;
    for _ in 0..MAX_EPA_ITERATIONS {
        let planes: Vec<Option<FacePlane>> = faces.iter().map(|f| face_plane(&vertices, *f)).collect();
        let (closest, plane) = planes
            .iter()
            .enumerate()
            .filter_map(|(i, plane)| plane.map(|p| (i, p)))
            .min_by(|(_, x), (_, y)| x.distance.total_cmp(&y.distance))?;
        best = Some((faces[closest], plane));

        let candidate = support(a, b, plane.normal);
        let reach = candidate.point.dot(plane.normal);
        let known = vertices
            .iter()
            .any(|v| v.point.distance_squared(candidate.point) < EPA_TOLERANCE * EPA_TOLERANCE);
        if reach - plane.distance < EPA_TOLERANCE || known {
            return Some(contact_from_face(&vertices, faces[closest], plane));
        }

        let mut visible: Vec<bool> = planes
            .iter()
            .map(|plane| {
                plane.is_some_and(|p| p.normal.dot(candidate.point) - p.distance > VISIBILITY_EPSILON)
            })
            .collect();
        absorb_degenerate_neighbours(&faces, &planes, &mut visible);

        let mut horizon = Vec::new();
        for (face, _) in faces.iter().zip(&visible).filter(|(_, seen)| **seen) {
            for edge in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                toggle_edge(&mut horizon, edge);
            }
        }

        let apex = vertices.len();
        vertices.push(candidate);
        let mut seen = visible.iter();
        faces.retain(|_| !seen.next().copied().unwrap_or(false));
        faces.extend(horizon.into_iter().map(|(from, to)| [from, to, apex]));
    }

    best.map(|(face, plane)| contact_from_face(&vertices, face, plane))
}

fn orient_outward(vertices: &[SupportPoint], [a, b, c]: [usize; 3], interior: Vec3) -> [usize; 3] {
    let pa = vertices[a].point;
    let normal = (vertices[b].point - pa).cross(vertices[c].point - pa);
    if normal.dot(interior - pa) > 0.0 {
        [a, c, b]
    } else {
        [a, b, c]
    }
}

fn face_plane(vertices: &[SupportPoint], [a, b, c]: [usize; 3]) -> Option<FacePlane> {
    let pa = vertices[a].point;
    let cross = (vertices[b].point - pa).cross(vertices[c].point - pa);
    if cross.length_squared() < FACE_AREA_EPSILON {
        return None;
    }
    let normal = cross.normalize();
    Some(FacePlane {
        normal,
        distance: normal.dot(pa),
    })
}

/// Degenerate faces bordering the removed region go with it, otherwise the
/// horizon would leave a hole.
fn absorb_degenerate_neighbours(faces: &[[usize; 3]], planes: &[Option<FacePlane>], visible: &mut [bool]) {
    loop {
        let mut changed = false;
        for i in 0..faces.len() {
            if visible[i] || planes[i].is_some() {
                continue;
            }
            let borders = faces
                .iter()
                .zip(visible.iter())
                .any(|(face, seen)| *seen && shares_edge(*face, faces[i]));
            if borders {
                visible[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn shares_edge(x: [usize; 3], y: [usize; 3]) -> bool {
    x.iter().filter(|i| y.contains(i)).count() >= 2
}

fn contact_from_face(vertices: &[SupportPoint], face: [usize; 3], plane: FacePlane) -> EpaResult {
    let [a, b, c] = face.map(|i| vertices[i]);
    let projected = plane.normal * plane.distance;
    let weights = barycentric(projected, a.point, b.point, c.point).unwrap_or(Vec3::splat(1.0 / 3.0));
    let on_a = a.on_a * weights.x + b.on_a * weights.y + c.on_a * weights.z;
    let on_b = a.on_b * weights.x + b.on_b * weights.y + c.on_b * weights.z;
    EpaResult {
        normal: plane.normal,
        depth: plane.distance.max(0.0),
        point: (on_a + on_b) * 0.5,
    }
}

/// Barycentric coordinates of `p` with respect to triangle `abc`.
fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < f32::EPSILON * d00 * d11 {
        return None;
    }
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Some(Vec3::new(1.0 - v - w, v, w))
}
