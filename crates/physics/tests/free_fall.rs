use physics::{BodyDesc, PhysParams, PhysicsWorld, Quat, ShapeDesc, Vec3};

fn world_with_ball(params: PhysParams, height: f32) -> (PhysicsWorld, physics::BodyHandle) {
    let mut world = PhysicsWorld::new(params);
    let ball = world
        .add_shape(
            &ShapeDesc::Sphere { radius: 0.5, segments: 16 },
            Vec3::new(0.0, height, 0.0),
            Quat::IDENTITY,
            &BodyDesc::default(),
        )
        .unwrap();
    (world, ball)
}

#[test]
fn sphere_free_fall_matches_analytic() {
    // initial height 10 m, no initial velocity
    let (mut world, ball) = world_with_ball(PhysParams::vacuum(), 10.0);
    let dt = 0.01_f32;
    let steps = 100_usize;
    for _ in 0..steps {
        world.update(dt);
    }

    // analytic: h = h0 − ½ g t², semi-implicit Euler runs ahead by ½ g dt t
    #[allow(clippy::cast_precision_loss)]
    let t = dt * steps as f32;
    let expected = 10.0 - 0.5 * 9.81 * t * t;
    let body = world.body(ball).unwrap();
    let diff = (body.position().y - expected).abs();
    assert!(diff < 0.5 * 9.81 * dt * t + 1e-3, "diff={diff}");
    assert!((body.velocity().y + 9.81 * t).abs() < 1e-3);
}

#[test]
fn no_forces_means_straight_line() {
    let params = PhysParams {
        gravity: Vec3::ZERO,
        damping: 1.0,
        air_density: 0.0,
        wind: Vec3::ZERO,
    };
    let (mut world, ball) = world_with_ball(params, 0.0);
    world.body_mut(ball).unwrap().set_velocity(Vec3::new(1.0, 2.0, -3.0)).unwrap();
    for _ in 0..60 {
        world.update(1.0 / 60.0);
    }
    let body = world.body(ball).unwrap();
    assert_eq!(body.velocity(), Vec3::new(1.0, 2.0, -3.0));
    assert!((body.position() - Vec3::new(1.0, 2.0, -3.0)).length() < 1e-4);
}

#[test]
fn spinning_body_keeps_unit_orientation() {
    let (mut world, ball) = world_with_ball(PhysParams::default(), 100.0);
    world
        .body_mut(ball)
        .unwrap()
        .set_angular_velocity(Vec3::new(20.0, 5.0, -13.0))
        .unwrap();
    for _ in 0..600 {
        world.update(1.0 / 60.0);
        let q = world.body(ball).unwrap().orientation();
        assert!((q.length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn flight_stats_accumulate_until_landing() {
    let (mut world, ball) = world_with_ball(PhysParams::vacuum(), 50.0);
    for _ in 0..60 {
        world.update(1.0 / 60.0);
    }
    let stats = world.body(ball).unwrap().flight_stats();
    assert!((stats.flight_time - 1.0).abs() < 1e-3);
    let fallen = 50.0 - world.body(ball).unwrap().position().y;
    assert!((stats.distance_traveled - fallen).abs() < 1e-3);
}
