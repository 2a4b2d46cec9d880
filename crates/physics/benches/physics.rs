use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physics::collision::{detect_contact, hull::ConvexHull};
use physics::shapes::sphere_points;
use physics::Vec3;

fn bench_hull_build(c: &mut Criterion) {
    let points = sphere_points(1.0, 32, 16);
    c.bench_function("hull_build_sphere_32x16", |b| {
        b.iter(|| ConvexHull::from_points(black_box(&points)).unwrap());
    });
}

fn bench_narrow_phase(c: &mut Criterion) {
    let a = sphere_points(1.0, 16, 8);
    let b: Vec<Vec3> = a.iter().map(|p| *p + Vec3::new(1.5, 0.2, 0.1)).collect();
    c.bench_function("gjk_epa_spheres", |bench| {
        bench.iter(|| detect_contact(black_box(&a), black_box(&b)));
    });
}

criterion_group!(benches, bench_hull_build, bench_narrow_phase);
criterion_main!(benches);
