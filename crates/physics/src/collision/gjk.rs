//! Gilbert-Johnson-Keerthi intersection test on convex vertex sets
//!
//! Works on the Minkowski difference `A - B`, which contains the origin
//! exactly when the two hulls overlap. Only the boolean answer and, on
//! overlap, an enclosing tetrahedron are produced; penetration data comes
//! from [`super::epa`].

use glam::Vec3;

use super::hull::farthest_point;

const MAX_GJK_ITERATIONS: usize = 64;
/// A support point must pass the origin by at least this much
const GJK_TOLERANCE: f32 = 1e-6;
/// Search directions shorter than this mean the origin lies on the simplex
const DIRECTION_EPSILON: f32 = 1e-12;
const VOLUME_EPSILON: f32 = 1e-10;

/// A vertex of the Minkowski difference with its witnesses on both hulls.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SupportPoint {
    /// `on_a - on_b`
    pub point: Vec3,
    pub on_a: Vec3,
    pub on_b: Vec3,
}

/// Support mapping of `A - B` along `direction`.
#[must_use]
pub fn support(a: &[Vec3], b: &[Vec3], direction: Vec3) -> SupportPoint {
    let on_a = farthest_point(a, direction);
    let on_b = farthest_point(b, -direction);
    SupportPoint {
        point: on_a - on_b,
        on_a,
        on_b,
    }
}

/// Up to four support points, newest first.
#[derive(Copy, Clone, Debug, Default)]
pub struct Simplex {
    points: [SupportPoint; 4],
    len: usize,
}

impl Simplex {
    fn push_front(&mut self, point: SupportPoint) {
        self.points.copy_within(0..3, 1);
        self.points[0] = point;
        self.len = (self.len + 1).min(4);
    }

    fn set(&mut self, points: &[SupportPoint]) {
        self.points[..points.len()].copy_from_slice(points);
        self.len = points.len();
    }

    fn contains(&self, point: Vec3) -> bool {
        self.points()
            .iter()
            .any(|p| p.point.distance_squared(point) <= GJK_TOLERANCE * GJK_TOLERANCE)
    }

    #[must_use]
    pub fn points(&self) -> &[SupportPoint] {
        &self.points[..self.len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn volume(&self) -> f32 {
        if self.len < 4 {
            return 0.0;
        }
        let [a, b, c, d] = self.points.map(|p| p.point);
        (b - a).dot((c - a).cross(d - a)).abs() / 6.0
    }
}

#[derive(Copy, Clone, Debug)]
pub enum GjkResult {
    Separated,
    /// The hulls overlap; the tetrahedron encloses the origin.
    Intersecting(Simplex),
}

impl GjkResult {
    #[must_use]
    pub fn is_intersecting(&self) -> bool {
        matches!(self, Self::Intersecting(_))
    }
}

/// Test two convex vertex sets (world space) for overlap.
#[must_use]
pub fn intersect(a: &[Vec3], b: &[Vec3]) -> GjkResult {
    if a.is_empty() || b.is_empty() {
        return GjkResult::Separated;
    }

    let initial = (centroid(a) - centroid(b))
        .try_normalize()
        .unwrap_or(Vec3::X);
    let mut simplex = Simplex::default();
    simplex.push_front(support(a, b, initial));
    let mut direction = -simplex.points[0].point;

    for _ in 0..MAX_GJK_ITERATIONS {
        let candidate = if direction.length_squared() > DIRECTION_EPSILON {
            let direction = direction.normalize();
            let candidate = support(a, b, direction);
            if candidate.point.dot(direction) < GJK_TOLERANCE || simplex.contains(candidate.point) {
                return GjkResult::Separated;
            }
            candidate
        } else {
            match grow_degenerate(a, b, &simplex) {
                Some(candidate) => candidate,
                None => return GjkResult::Separated,
            }
        };

        simplex.push_front(candidate);
        match evolve(&mut simplex) {
            Some(next) => direction = next,
            None if simplex.volume() > VOLUME_EPSILON => return GjkResult::Intersecting(simplex),
            None => return GjkResult::Separated,
        }
    }
    GjkResult::Separated
}

fn centroid(points: &[Vec3]) -> Vec3 {
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f32;
    points.iter().sum::<Vec3>() / count
}

/// The origin sits on the current simplex: search sideways to add a dimension.
fn grow_degenerate(a: &[Vec3], b: &[Vec3], simplex: &Simplex) -> Option<SupportPoint> {
    let points = simplex.points();
    let base = match points.len() {
        0 | 1 => Vec3::X,
        2 => (points[1].point - points[0].point).any_orthogonal_vector(),
        _ => {
            let edge = points[1].point - points[0].point;
            edge.cross(points[2].point - points[0].point)
                .try_normalize()
                .unwrap_or_else(|| edge.any_orthogonal_vector())
        }
    };
    let base = base.try_normalize()?;

    [base, -base]
        .into_iter()
        .map(|d| (d, support(a, b, d)))
        .find(|(d, candidate)| {
            candidate.point.dot(*d) > GJK_TOLERANCE && !simplex.contains(candidate.point)
        })
        .map(|(_, candidate)| candidate)
}

/// Reduce the simplex to the feature nearest the origin and return the next
/// search direction, or `None` once a tetrahedron encloses the origin.
fn evolve(simplex: &mut Simplex) -> Option<Vec3> {
    match simplex.len {
        2 => Some(line(simplex)),
        3 => Some(triangle(simplex)),
        4 => tetrahedron(simplex),
        _ => Some(-simplex.points[0].point),
    }
}

fn line(simplex: &mut Simplex) -> Vec3 {
    let [a, b, ..] = simplex.points;
    let ab = b.point - a.point;
    let ao = -a.point;
    if ab.dot(ao) > 0.0 {
        ab.cross(ao).cross(ab)
    } else {
        simplex.set(&[a]);
        ao
    }
}

fn triangle(simplex: &mut Simplex) -> Vec3 {
    let [a, b, c, _] = simplex.points;
    let ab = b.point - a.point;
    let ac = c.point - a.point;
    let ao = -a.point;
    let abc = ab.cross(ac);

    if abc.cross(ac).dot(ao) > 0.0 {
        if ac.dot(ao) > 0.0 {
            simplex.set(&[a, c]);
            ac.cross(ao).cross(ac)
        } else {
            simplex.set(&[a, b]);
            line(simplex)
        }
    } else if ab.cross(abc).dot(ao) > 0.0 {
        simplex.set(&[a, b]);
        line(simplex)
    } else if abc.dot(ao) > 0.0 {
        abc
    } else {
        simplex.set(&[a, c, b]);
        -abc
    }
}

fn tetrahedron(simplex: &mut Simplex) -> Option<Vec3> {
    let [a, b, c, d] = simplex.points;
    let ao = -a.point;
    for (p, q, opposite) in [(b, c, d), (c, d, b), (d, b, c)] {
        let mut normal = (p.point - a.point).cross(q.point - a.point);
        if normal.dot(opposite.point - a.point) > 0.0 {
            normal = -normal;
        }
        if normal.dot(ao) > 0.0 {
            simplex.set(&[a, p, q]);
            return Some(triangle(simplex));
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::collision::epa::penetration;
    use crate::shapes::{box_points, sphere_points};

    fn translated(points: &[Vec3], offset: Vec3) -> Vec<Vec3> {
        points.iter().map(|p| *p + offset).collect()
    }

    #[test]
    fn support_combines_opposite_extremes() {
        let a = box_points(Vec3::splat(0.5));
        let b = translated(&a, Vec3::new(3.0, 0.0, 0.0));
        let s = support(&a, &b, Vec3::X);
        assert_eq!(s.on_a.x, 0.5);
        assert_eq!(s.on_b.x, 2.5);
        assert_eq!(s.point.x, -2.0);
    }

    #[test]
    fn distant_spheres_are_separated() {
        let a = sphere_points(1.0, 16, 8);
        let b = translated(&a, Vec3::new(2.5, 0.0, 0.0));
        assert!(!intersect(&a, &b).is_intersecting());
    }

    #[test]
    fn overlapping_spheres_intersect() {
        let a = sphere_points(1.0, 16, 8);
        let b = translated(&a, Vec3::new(1.5, 0.0, 0.0));
        match intersect(&a, &b) {
            GjkResult::Intersecting(simplex) => assert_eq!(simplex.len(), 4),
            GjkResult::Separated => panic!("expected overlap"),
        }
    }

    #[test]
    fn coincident_cubes_intersect() {
        let a = box_points(Vec3::splat(0.5));
        assert!(intersect(&a, &a).is_intersecting());
    }

    #[test]
    fn diagonal_offset_cubes() {
        let a = box_points(Vec3::splat(0.5));
        let near = translated(&a, Vec3::new(0.7, 0.7, 0.7));
        let far = translated(&a, Vec3::new(1.2, 1.2, 0.0));
        assert!(intersect(&a, &near).is_intersecting());
        assert!(!intersect(&a, &far).is_intersecting());
    }

    fn witness(point: Vec3) -> SupportPoint {
        SupportPoint {
            point,
            on_a: point,
            on_b: Vec3::ZERO,
        }
    }

    #[test]
    fn flat_seeds_give_finite_penetration_or_none() {
        let a = box_points(Vec3::splat(0.5));
        let b = translated(&a, Vec3::new(0.5, 0.0, 0.0));
        let coplanar = [Vec3::X, Vec3::Y, -Vec3::X, -Vec3::Y];
        // Third point sits on the first edge, so one seed face has no area
        let sliver = [-Vec3::X, Vec3::X, Vec3::ZERO, Vec3::Z * 0.5];

        for points in [coplanar, sliver] {
            let mut seed = Simplex::default();
            seed.set(&points.map(witness));
            assert_eq!(seed.volume(), 0.0);
            if let Some(result) = penetration(&a, &b, &seed) {
                assert!(result.normal.is_finite() && result.point.is_finite());
                assert!(result.depth.is_finite() && result.depth >= 0.0);
            }
        }
    }

    #[test]
    fn short_seed_is_rejected_by_epa() {
        let a = box_points(Vec3::splat(0.5));
        let mut seed = Simplex::default();
        seed.set(&[witness(Vec3::X), witness(-Vec3::X)]);
        assert!(penetration(&a, &a, &seed).is_none());
    }

    #[test]
    fn empty_sets_never_intersect() {
        let a = box_points(Vec3::splat(0.5));
        assert!(!intersect(&a, &[]).is_intersecting());
    }
}
