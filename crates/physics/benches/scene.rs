use criterion::{criterion_group, criterion_main, Criterion};
use physics::{BodyDesc, Material, PhysParams, PhysicsWorld, Quat, ShapeDesc, Vec3};

fn pile(count: u32) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysParams::default());
    let ground = ShapeDesc::Box {
        width: 30.0,
        height: 1.0,
        depth: 30.0,
    };
    world
        .add_shape(&ground, Vec3::new(0.0, -0.5, 0.0), Quat::IDENTITY, &BodyDesc::fixed(Material::default()))
        .unwrap();
    for i in 0..count {
        #[allow(clippy::cast_precision_loss)]
        let position = Vec3::new((i % 4) as f32 * 1.1, 1.0 + (i / 4) as f32 * 1.1, 0.0);
        world
            .add_shape(&ShapeDesc::default(), position, Quat::IDENTITY, &BodyDesc::default())
            .unwrap();
    }
    world
}

fn bench_scene_run(c: &mut Criterion) {
    c.bench_function("scene_run_16_boxes", |b| {
        b.iter(|| {
            let mut world = pile(16);
            for _ in 0..10 {
                world.update(1.0 / 60.0);
            }
        });
    });
}

criterion_group!(benches, bench_scene_run);
criterion_main!(benches);
