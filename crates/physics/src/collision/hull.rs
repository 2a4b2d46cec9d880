//! Convex hulls, bounding spheres and silhouette areas
//!
//! A body's hull is built once from its local point cloud. Every tick the
//! local vertices are re-posed into world space, and the silhouette of the
//! world hull seen along the relative air velocity feeds the drag model.

use glam::{Quat, Vec2, Vec3};

use crate::error::PhysicsError;

/// Geometric tolerance, relative to the extent of the point cloud
const HULL_EPSILON: f32 = 1e-5;
/// Seed for the bounding sphere shuffle; fixed so hulls are reproducible
const SHUFFLE_SEED: u64 = 0x5EED_CAFE;

/// A triangular hull face in body-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HullFace {
    /// Indices into [`ConvexHull::vertices`], counter-clockwise seen from outside
    pub indices: [usize; 3],
    pub centroid: Vec3,
    /// Outward unit normal
    pub normal: Vec3,
    pub area: f32,
}

/// Convex hull of a point cloud.
///
/// A cloud without volume (all points coplanar or collinear) produces a flat
/// hull: its vertices are still a valid support set, it just has no faces.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    vertices: Vec<Vec3>,
    faces: Vec<HullFace>,
}

impl ConvexHull {
    /// Build the hull of `points` with an incremental horizon-edge algorithm.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::EmptyPointCloud`] for an empty slice and
    /// [`PhysicsError::NonFinitePoint`] if any coordinate is NaN or infinite.
    pub fn from_points(points: &[Vec3]) -> Result<Self, PhysicsError> {
        if points.is_empty() {
            return Err(PhysicsError::EmptyPointCloud);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PhysicsError::NonFinitePoint(index));
        }

        let tolerance = HULL_EPSILON * extent(points).max(1.0);
        let unique = dedup(points, tolerance);

        let Some(seed) = initial_tetrahedron(&unique, tolerance) else {
            return Ok(Self {
                vertices: unique,
                faces: Vec::new(),
            });
        };

        let interior = seed.iter().map(|&i| unique[i]).sum::<Vec3>() * 0.25;
        let [a, b, c, d] = seed;
        let mut faces: Vec<[usize; 3]> = [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
            .into_iter()
            .map(|face| orient_outward(&unique, face, interior))
            .collect();

        let mut pending: Vec<usize> = (0..unique.len()).filter(|i| !seed.contains(i)).collect();
        while let Some(index) = take_farthest_outside(&unique, &faces, &mut pending, interior, tolerance) {
            let point = unique[index];
            let visible: Vec<bool> = faces
                .iter()
                .map(|face| plane_distance(&unique, *face, point) > tolerance)
                .collect();
            if !visible.contains(&true) {
                continue;
            }

            let mut horizon = Vec::new();
            for (face, _) in faces.iter().zip(&visible).filter(|(_, seen)| **seen) {
                for edge in face_edges(*face) {
                    toggle_edge(&mut horizon, edge);
                }
            }

            let mut kept: Vec<[usize; 3]> = faces
                .iter()
                .zip(&visible)
                .filter(|(_, seen)| !**seen)
                .map(|(face, _)| *face)
                .collect();
            kept.extend(horizon.into_iter().map(|(from, to)| [from, to, index]));
            faces = kept;
        }

        Ok(Self::compact(&unique, &faces, tolerance))
    }

    /// Keep only the vertices referenced by faces and compute face data.
    fn compact(points: &[Vec3], faces: &[[usize; 3]], tolerance: f32) -> Self {
        let mut remap = vec![usize::MAX; points.len()];
        let mut vertices = Vec::new();
        let mut hull_faces = Vec::with_capacity(faces.len());

        for face in faces {
            let indices = face.map(|i| {
                if remap[i] == usize::MAX {
                    remap[i] = vertices.len();
                    vertices.push(points[i]);
                }
                remap[i]
            });
            let [a, b, c] = indices.map(|i| vertices[i]);
            let cross = (b - a).cross(c - a);
            let area = 0.5 * cross.length();
            if area <= tolerance * tolerance {
                continue;
            }
            hull_faces.push(HullFace {
                indices,
                centroid: (a + b + c) / 3.0,
                normal: cross / (2.0 * area),
                area,
            });
        }

        Self {
            vertices,
            faces: hull_faces,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn faces(&self) -> &[HullFace] {
        &self.faces
    }

    /// True when the cloud had no volume
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.faces.is_empty()
    }

    /// Hull vertex farthest along `direction`, in local space.
    #[must_use]
    pub fn support(&self, direction: Vec3) -> Vec3 {
        farthest_point(&self.vertices, direction)
    }
}

/// The point of `points` farthest along `direction` (origin for an empty slice).
#[must_use]
pub fn farthest_point(points: &[Vec3], direction: Vec3) -> Vec3 {
    points
        .iter()
        .copied()
        .max_by(|a, b| a.dot(direction).total_cmp(&b.dot(direction)))
        .unwrap_or(Vec3::ZERO)
}

/// Add `edge` to the list unless its reverse is already there, in which case
/// both cancel. What remains after feeding every edge of a set of
/// consistently wound faces is the boundary of that set.
pub(crate) fn toggle_edge(edges: &mut Vec<(usize, usize)>, edge: (usize, usize)) {
    if let Some(pos) = edges.iter().position(|&(a, b)| a == edge.1 && b == edge.0) {
        edges.swap_remove(pos);
    } else {
        edges.push(edge);
    }
}

fn face_edges([a, b, c]: [usize; 3]) -> [(usize, usize); 3] {
    [(a, b), (b, c), (c, a)]
}

fn plane_distance(points: &[Vec3], [a, b, c]: [usize; 3], point: Vec3) -> f32 {
    let normal = (points[b] - points[a])
        .cross(points[c] - points[a])
        .normalize_or_zero();
    normal.dot(point - points[a])
}

fn orient_outward(points: &[Vec3], [a, b, c]: [usize; 3], interior: Vec3) -> [usize; 3] {
    let normal = (points[b] - points[a]).cross(points[c] - points[a]);
    if normal.dot(interior - points[a]) > 0.0 {
        [a, c, b]
    } else {
        [a, b, c]
    }
}

fn extent(points: &[Vec3]) -> f32 {
    let (min, max) = points
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    (max - min).length()
}

fn dedup(points: &[Vec3], tolerance: f32) -> Vec<Vec3> {
    let limit = tolerance * tolerance;
    let mut unique: Vec<Vec3> = Vec::with_capacity(points.len());
    for &p in points {
        if !unique.iter().any(|q| q.distance_squared(p) <= limit) {
            unique.push(p);
        }
    }
    unique
}

/// Index of the point maximising `key`; near-ties go to the point farthest
/// from `center`, which keeps seeds on hull corners.
fn index_of_max(points: &[Vec3], center: Vec3, tolerance: f32, key: impl Fn(Vec3) -> f32) -> Option<usize> {
    let best = points.iter().map(|p| key(*p)).fold(f32::MIN, f32::max);
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| key(**p) >= best - tolerance)
        .max_by(|(_, a), (_, b)| a.distance_squared(center).total_cmp(&b.distance_squared(center)))
        .map(|(i, _)| i)
}

/// Remove and return the pending point highest above any face.
///
/// Points inside the current hull are dropped for good. Among points of
/// near-equal height the one farthest from `interior` wins, so points lying
/// on a face or an edge of the final hull are never inserted.
fn take_farthest_outside(
    points: &[Vec3],
    faces: &[[usize; 3]],
    pending: &mut Vec<usize>,
    interior: Vec3,
    tolerance: f32,
) -> Option<usize> {
    let height = |index: usize| {
        faces
            .iter()
            .map(|face| plane_distance(points, *face, points[index]))
            .fold(f32::MIN, f32::max)
    };
    pending.retain(|&index| height(index) > tolerance);

    let highest = pending.iter().map(|&index| height(index)).fold(f32::MIN, f32::max);
    let slot = pending
        .iter()
        .enumerate()
        .filter(|(_, &index)| height(index) >= highest - tolerance)
        .max_by(|(_, &a), (_, &b)| {
            points[a]
                .distance_squared(interior)
                .total_cmp(&points[b].distance_squared(interior))
        })
        .map(|(slot, _)| slot)?;
    Some(pending.swap_remove(slot))
}

/// Four affinely independent points to start the hull from.
fn initial_tetrahedron(points: &[Vec3], tolerance: f32) -> Option<[usize; 4]> {
    if points.len() < 4 {
        return None;
    }
    let (min, max) = points
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let center = (min + max) * 0.5;

    let i0 = index_of_max(points, center, tolerance, |p| -p.x)?;
    let p0 = points[i0];

    let i1 = index_of_max(points, center, tolerance, |p| p.distance(p0))?;
    let axis = points[i1] - p0;
    if axis.length() <= tolerance {
        return None;
    }
    let axis = axis.normalize();

    let i2 = index_of_max(points, center, tolerance, |p| (p - p0).cross(axis).length())?;
    if (points[i2] - p0).cross(axis).length() <= tolerance {
        return None;
    }
    let normal = axis.cross(points[i2] - p0).normalize();

    let i3 = index_of_max(points, center, tolerance, |p| (p - p0).dot(normal).abs())?;
    if (points[i3] - p0).dot(normal).abs() <= tolerance {
        return None;
    }
    Some([i0, i1, i2, i3])
}

/// Sphere given by center and radius.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Minimal enclosing sphere (Welzl's algorithm, iterative form).
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(&first) = points.first() else {
            return Self::default();
        };
        let mut shuffled = points.to_vec();
        fastrand::Rng::with_seed(SHUFFLE_SEED).shuffle(&mut shuffled);
        let p = &shuffled;

        let mut sphere = Self::new(first, 0.0);
        for (i, &a) in p.iter().enumerate() {
            if sphere.contains(a) {
                continue;
            }
            sphere = Self::new(a, 0.0);
            for (j, &b) in p[..i].iter().enumerate() {
                if sphere.contains(b) {
                    continue;
                }
                sphere = sphere_from_two(a, b);
                for (k, &c) in p[..j].iter().enumerate() {
                    if sphere.contains(c) {
                        continue;
                    }
                    sphere = sphere_from_three(a, b, c);
                    for &d in &p[..k] {
                        if !sphere.contains(d) {
                            sphere = sphere_from_four(a, b, c, d);
                        }
                    }
                }
            }
        }

        // Degenerate support sets can leave a point just outside; grow to fit.
        for &point in points {
            let distance = point.distance(sphere.center);
            if distance > sphere.radius {
                let grow = 0.5 * (distance - sphere.radius);
                sphere.center += (point - sphere.center) * (grow / distance);
                sphere.radius += grow;
            }
        }
        sphere
    }

    /// Containment with a small relative tolerance.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) <= self.radius * (1.0 + HULL_EPSILON) + HULL_EPSILON
    }

    /// Broad-phase test: overlapping unless the radii cannot bridge the gap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.radius + other.radius >= self.center.distance(other.center)
    }

    /// The same sphere placed by a rigid transform.
    #[must_use]
    pub fn transformed(&self, position: Vec3, orientation: Quat) -> Self {
        Self::new(position + orientation * self.center, self.radius)
    }
}

fn sphere_from_two(a: Vec3, b: Vec3) -> BoundingSphere {
    BoundingSphere::new((a + b) * 0.5, a.distance(b) * 0.5)
}

fn sphere_from_three(a: Vec3, b: Vec3, c: Vec3) -> BoundingSphere {
    let ab = b - a;
    let ac = c - a;
    let normal = ab.cross(ac);
    let denom = 2.0 * normal.length_squared();
    if denom <= f32::EPSILON * ab.length_squared().max(ac.length_squared()).powi(2) {
        // Collinear: the farthest pair spans the rest.
        return [sphere_from_two(a, b), sphere_from_two(a, c), sphere_from_two(b, c)]
            .into_iter()
            .max_by(|x, y| x.radius.total_cmp(&y.radius))
            .unwrap_or_default();
    }
    let offset = (normal.cross(ab) * ac.length_squared() + ac.cross(normal) * ab.length_squared()) / denom;
    BoundingSphere::new(a + offset, offset.length())
}

fn sphere_from_four(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> BoundingSphere {
    let u = b - a;
    let v = c - a;
    let w = d - a;
    let det = u.dot(v.cross(w));
    let scale = u.length() * v.length() * w.length();
    if det.abs() <= 1e-6 * scale {
        // Coplanar: smallest circumcircle of a triple that holds all four.
        let candidates = [
            sphere_from_three(a, b, c),
            sphere_from_three(a, b, d),
            sphere_from_three(a, c, d),
            sphere_from_three(b, c, d),
        ];
        return candidates
            .iter()
            .filter(|s| [a, b, c, d].iter().all(|p| s.contains(*p)))
            .min_by(|x, y| x.radius.total_cmp(&y.radius))
            .or_else(|| candidates.iter().max_by(|x, y| x.radius.total_cmp(&y.radius)))
            .copied()
            .unwrap_or_default();
    }
    let offset = (v.cross(w) * u.length_squared()
        + w.cross(u) * v.length_squared()
        + u.cross(v) * w.length_squared())
        / (2.0 * det);
    BoundingSphere::new(a + offset, offset.length())
}

/// Area of the silhouette of `points` seen along `direction`.
///
/// Projects every point onto the plane perpendicular to `direction`, takes
/// the 2-D convex hull of the projections and returns its shoelace area.
/// A zero direction has no silhouette and yields `0.0`.
#[must_use]
pub fn projected_area(points: &[Vec3], direction: Vec3) -> f32 {
    let Some(axis) = direction.try_normalize() else {
        return 0.0;
    };
    let (u, v) = axis.any_orthonormal_pair();
    let projected = points
        .iter()
        .map(|p| Vec2::new(p.dot(u), p.dot(v)))
        .collect();
    polygon_area(&convex_hull_2d(projected))
}

/// Andrew's monotone chain; returns the hull counter-clockwise.
fn convex_hull_2d(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let turn = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);
    let mut lower: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in &points {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f32 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum();
    0.5 * twice.abs()
}
