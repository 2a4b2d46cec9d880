use physics::{AeroModel, BodyDesc, PhysParams, PhysicsWorld, Quat, ShapeDesc, Vec3};

const DT: f32 = 1.0 / 60.0;

fn launch(params: PhysParams, desc: &BodyDesc, velocity: Vec3, spin: Vec3, ticks: usize) -> Vec3 {
    let mut world = PhysicsWorld::new(params);
    let ball = world
        .add_shape(
            &ShapeDesc::Sphere { radius: 0.3, segments: 16 },
            Vec3::ZERO,
            Quat::IDENTITY,
            desc,
        )
        .unwrap();
    let body = world.body_mut(ball).unwrap();
    body.set_velocity(velocity).unwrap();
    body.set_angular_velocity(spin).unwrap();
    for _ in 0..ticks {
        world.update(DT);
    }
    world.body(ball).unwrap().position()
}

fn still_air() -> PhysParams {
    PhysParams {
        damping: 1.0,
        ..PhysParams::default()
    }
}

#[test]
fn drag_shortens_the_throw() {
    let velocity = Vec3::new(20.0, 10.0, 0.0);
    let desc = BodyDesc::dynamic(0.2);
    let vacuum = launch(PhysParams::vacuum(), &desc, velocity, Vec3::ZERO, 60);
    let air = launch(still_air(), &desc, velocity, Vec3::ZERO, 60);
    assert!(air.x < vacuum.x - 0.5, "air {air:?} vacuum {vacuum:?}");
}

#[test]
fn backspin_lifts_topspin_dips() {
    let velocity = Vec3::new(20.0, 5.0, 0.0);
    let desc = BodyDesc::dynamic(0.2);
    let plain = launch(still_air(), &desc, velocity, Vec3::ZERO, 60);
    let backspin = launch(still_air(), &desc, velocity, Vec3::new(0.0, 0.0, 30.0), 60);
    let topspin = launch(still_air(), &desc, velocity, Vec3::new(0.0, 0.0, -30.0), 60);
    assert!(backspin.y > plain.y + 0.1, "{backspin:?} vs {plain:?}");
    assert!(topspin.y < plain.y - 0.1, "{topspin:?} vs {plain:?}");
}

#[test]
fn wind_carries_a_dropped_ball() {
    let params = PhysParams {
        wind: Vec3::new(0.0, 0.0, 8.0),
        ..still_air()
    };
    let drifted = launch(params, &BodyDesc::dynamic(0.2), Vec3::ZERO, Vec3::ZERO, 60);
    assert!(drifted.z > 0.5, "{drifted:?}");
    assert!(drifted.x.abs() < 1e-3);
}

#[test]
fn panel_model_records_named_forces() {
    let mut world = PhysicsWorld::new(still_air());
    let desc = BodyDesc {
        lift_coefficient: 0.8,
        ..BodyDesc::dynamic(0.5)
    }
    .with_aero(AeroModel::Panels);
    let plate = world
        .add_shape(
            &ShapeDesc::Box {
                width: 1.0,
                height: 0.05,
                depth: 1.0,
            },
            Vec3::ZERO,
            Quat::from_rotation_z(0.25),
            &desc,
        )
        .unwrap();
    world
        .body_mut(plate)
        .unwrap()
        .set_velocity(Vec3::new(15.0, 0.0, 0.0))
        .unwrap();
    world.update(DT);

    let debug = world.body(plate).unwrap().force_debug();
    assert!((debug.gravity.y + 0.5 * 9.81).abs() < 1e-4);
    assert!(debug.drag.x < 0.0);
    assert!(debug.lift.y > 0.0);
    assert_eq!(debug.magnus, Vec3::ZERO);
}
