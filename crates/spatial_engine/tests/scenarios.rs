//! End-to-end scenarios across math, skeletons, verlet systems and the world

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_relative_eq;
use spatial_engine::physics::verlet::MeshDescription;
use spatial_engine::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn forward_pointer(length: f32) -> Option<Ray> {
    Some(Ray::from_direction(Vector3::zero(), Vector3::forward(), length))
}

fn recorded(collider: &mut Collider) -> Rc<RefCell<Vec<ColliderEventKind>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    collider.on_any(move |event: &ColliderEvent| {
        log.borrow_mut().push(event.kind);
    });
    seen
}

#[test]
fn quaternion_inverse_and_euler_properties() {
    let q = Quaternion::from_euler_xyz(30.0, -45.0, 60.0, AngleUnit::Deg);
    assert_relative_eq!(q.mul(q.invert()), Quaternion::identity(), epsilon = 1e-5);

    for (x, y, z) in [(10.0, 20.0, 30.0), (-80.0, 45.0, -5.0), (0.0, -60.0, 75.0)] {
        let angles = Quaternion::from_euler_xyz(x, y, z, AngleUnit::Deg)
            .to_euler()
            .to_deg();
        assert_relative_eq!(angles, Vector3::new(x, y, z), epsilon = 1e-2);
    }

    let plus = Quaternion::from_euler_xyz(10.0, 0.0, 0.0, AngleUnit::Deg);
    let minus = Quaternion::from_euler_xyz(-10.0, 0.0, 0.0, AngleUnit::Deg);
    assert_relative_eq!(plus.mul(minus), Quaternion::identity(), epsilon = 1e-6);
    assert_relative_eq!(minus.mul(plus), Quaternion::identity(), epsilon = 1e-6);
}

#[test]
fn sphere_hit_distance() {
    let sphere = Sphere::new(Vector3::new(0.0, 0.0, -6.0), 1.5);
    let ray = Ray::from_direction(Vector3::zero(), Vector3::forward(), 20.0);
    let hit = sphere.ray_intersection(&ray).expect("hit");
    assert_relative_eq!(hit.distance_to(ray.start()), 4.5, epsilon = 1e-4);
}

#[test]
fn hover_sequence_enter_stay_stay_exit() {
    use ColliderEventKind::{RayEnter, RayExit, RayStay};

    let mut world = World::default();
    let mut collider = Collider::cuboid(Vector3::new(0.0, 0.0, -4.0), Vector3::one());
    let seen = recorded(&mut collider);
    world.add_collider(collider);

    world.pointer_mut().ray = forward_pointer(10.0);
    for _ in 0..3 {
        world.update(DT);
    }
    world.pointer_mut().ray = Some(Ray::from_direction(Vector3::zero(), Vector3::right(), 10.0));
    world.update(DT);

    assert_eq!(*seen.borrow(), vec![RayEnter, RayStay, RayStay, RayExit]);
}

#[test]
fn trigger_press_and_release_on_collider() {
    use ColliderEventKind::{RightTriggerDown, RightTriggerUp};

    let mut world = World::default();
    let mut collider = Collider::sphere(Vector3::new(0.0, 0.0, -3.0), 0.5);
    let seen = recorded(&mut collider);
    world.add_collider(collider);
    world.pointer_mut().ray = forward_pointer(10.0);

    world.update(DT);
    world.pointer_mut().set_trigger(true);
    world.update(DT);
    world.pointer_mut().set_trigger(false);
    world.update(DT);

    let triggers: Vec<_> = seen
        .borrow()
        .iter()
        .copied()
        .filter(|kind| matches!(kind, RightTriggerDown | RightTriggerUp))
        .collect();
    assert_eq!(triggers, vec![RightTriggerDown, RightTriggerUp]);
}

#[test]
fn trigger_held_before_enter_fires_nothing() {
    let mut world = World::default();
    let mut collider = Collider::sphere(Vector3::new(0.0, 0.0, -3.0), 0.5);
    let seen = recorded(&mut collider);
    world.add_collider(collider);

    world.pointer_mut().set_trigger(true);
    world.pointer_mut().ray = forward_pointer(10.0);
    for _ in 0..4 {
        world.update(DT);
    }

    assert!(!seen.borrow().iter().any(|kind| matches!(
        kind,
        ColliderEventKind::RightTriggerDown | ColliderEventKind::RightTriggerUp
    )));
}

#[test]
fn every_subscriber_sees_each_event() {
    let mut world = World::default();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let (a, b) = (Rc::clone(&first), Rc::clone(&second));
    let mut collider = Collider::sphere(Vector3::new(0.0, 0.0, -3.0), 0.5)
        .with_handler(ColliderEventKind::RayEnter, move |_: &ColliderEvent| a.set(a.get() + 1))
        .with_handler(ColliderEventKind::RayEnter, move |_: &ColliderEvent| b.set(b.get() + 1));
    let seen = recorded(&mut collider);
    world.add_collider(collider);
    world.pointer_mut().ray = forward_pointer(10.0);
    world.update(DT);

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 1);
    assert_eq!(*seen.borrow(), vec![ColliderEventKind::RayEnter]);
    assert_eq!(world.frame_events().len(), 1);
}

#[test]
fn removing_hovered_collider_flushes_exit() {
    let mut world = World::default();
    let mut collider = Collider::cuboid(Vector3::new(0.0, 0.0, -4.0), Vector3::one());
    let seen = recorded(&mut collider);
    let key = world.add_collider(collider);
    world.pointer_mut().ray = forward_pointer(10.0);
    world.update(DT);

    assert!(world.remove_collider(key).is_some());
    assert_eq!(seen.borrow().last(), Some(&ColliderEventKind::RayExit));

    // gone colliders get nothing further
    let count = seen.borrow().len();
    world.update(DT);
    assert_eq!(seen.borrow().len(), count);
}

#[test]
fn rope_between_fixed_points() {
    let mut rope = VerletRope::new(Vector3::zero(), Vector3::new(2.0, 0.0, 0.0), 2, 4);
    assert_eq!(rope.points().len(), 3);
    assert_eq!(rope.constraints().len(), 2);
    for constraint in rope.constraints() {
        assert_relative_eq!(constraint.rest_length(), 1.0, epsilon = 1e-6);
    }

    for _ in 0..120 {
        rope.update_physics(DT, Vector3::zero());
        rope.apply_constraints();
    }
    for point in rope.points() {
        assert!(point.position.y.abs() < 1e-3);
        assert!(point.position.z.abs() < 1e-3);
    }
    assert_eq!(rope.start().position, Vector3::zero());
    assert_eq!(rope.end().position, Vector3::new(2.0, 0.0, 0.0));
}

#[test]
fn rope_drapes_over_box() {
    let mut world = World::default();
    world.add_collider(Collider::cuboid(Vector3::zero(), Vector3::new(1.0, 1.0, 1.0)));
    let mut rope = VerletRope::new(Vector3::new(-1.0, 1.0, 0.0), Vector3::new(1.0, 1.0, 0.0), 10, 8);
    rope.start_mut().is_static = false;
    rope.end_mut().is_static = false;
    let key = world.add_system(rope);

    for _ in 0..30 {
        world.update(DT);
    }
    let points = world.system(key).expect("rope").points();
    let middle = points[points.len() / 2].position;
    assert!(middle.y >= 0.5 - 1e-3, "middle point fell through: {middle:?}");
}

#[test]
fn world_clamps_frame_delta() {
    let config = PhysicsConfig {
        min_delta: 0.01,
        max_delta: 0.05,
        ..PhysicsConfig::default()
    };
    let mut world = World::new(config);
    assert_relative_eq!(world.update(0.5), 0.05);
    assert_relative_eq!(world.update(0.001), 0.01);
    assert_relative_eq!(world.update(0.02), 0.02);
    assert_relative_eq!(world.update(-1.0), 0.01);

    let mut clock = FrameClock::new(0.01, 0.05);
    assert_relative_eq!(clock.advance(2.0), 0.05);
    assert_eq!(clock.frame_count(), 1);
}

#[test]
fn hair_roots_follow_parent_in_world() {
    let offset = Rc::new(Cell::new(Vector3::zero()));
    let source = Rc::clone(&offset);
    let parent = ParentTransform::dynamic(move || Matrix4x4::from_translation(source.get()));
    let config = HairConfig {
        root_jitter: 0.0,
        ..HairConfig::default()
    };
    let hair = VerletHair::from_config(&[Vector3::zero(), Vector3::new(0.0, 0.0, 1.0)], parent, &config);

    let mut world = World::default();
    let key = world.add_system(hair);
    offset.set(Vector3::new(3.0, 1.0, 0.0));
    world.update(DT);

    let system = world.system(key).expect("hair");
    let roots: Vec<_> = system.points().iter().filter(|p| p.is_static).collect();
    assert_eq!(roots.len(), 2 * config.strands_per_vertex);
    for root in roots {
        assert_relative_eq!(root.position.x, 3.0);
        assert_relative_eq!(root.position.y, 1.0);
    }
}

#[test]
fn cloth_mesh_hangs_from_pins() {
    let description = quad_mesh();
    let mut mesh = VerletMesh::new(&description, 8).expect("valid mesh");
    assert!(mesh.pin(0));
    assert!(mesh.pin(1));
    assert!(!mesh.pin(42));

    let mut world = World::default();
    let key = world.add_system(mesh);
    for _ in 0..60 {
        world.update(DT);
    }
    let points = world.system(key).expect("mesh").points();
    assert_eq!(points[0].position, Vector3::zero());
    assert!(points[2].position.y < 0.0);
}

fn quad_mesh() -> MeshDescription {
    MeshDescription {
        vertices: vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[test]
fn skeleton_arm_with_world_space_edits() {
    let skin = SkinDescription {
        bones: vec![
            BoneDescription::new(1, "root").with_children(&[2]),
            BoneDescription::new(2, "hand").with_position(Vector3::new(0.0, 1.0, 0.0)),
        ],
    };
    let mut skeleton = Skeleton::from_skin(&skin).expect("valid skin");
    skeleton.set_root_offset(Vector3::new(2.0, 0.0, 0.0), Quaternion::identity());
    skeleton.update();
    assert_relative_eq!(
        skeleton.world_matrix("hand").expect("hand").get_position(),
        Vector3::new(2.0, 1.0, 0.0)
    );

    assert!(skeleton.set_world_position("hand", Vector3::new(2.0, 3.0, 0.0)));
    skeleton.update();
    assert_relative_eq!(
        skeleton.world_matrix("hand").expect("hand").get_position(),
        Vector3::new(2.0, 3.0, 0.0),
        epsilon = 1e-5
    );
    assert_eq!(skeleton.skin_matrices().len(), 2);

    let broken = SkinDescription {
        bones: vec![BoneDescription::new(1, "root").with_children(&[9])],
    };
    assert!(matches!(
        Skeleton::from_skin(&broken),
        Err(SkeletonError::UnknownChild { parent: 1, child: 9 })
    ));
}

#[test]
fn animation_clip_from_toml_loops_over_skeleton() {
    let clip = r#"
        name = "swing"

        [[tracks]]
        bone = "root"
        times = [0.0, 1.0]

        [tracks.values]
        rotation = [
            { x = 0.0, y = 0.0, z = 0.0, w = 1.0 },
            { x = 0.0, y = 0.0, z = 0.70710677, w = 0.70710677 },
        ]
    "#;
    let mut animation: Animation = toml::from_str(clip).expect("parse clip");
    let skin = SkinDescription {
        bones: vec![
            BoneDescription::new(1, "root").with_children(&[2]),
            BoneDescription::new(2, "hand").with_position(Vector3::new(0.0, 1.0, 0.0)),
        ],
    };
    let mut skeleton = Skeleton::from_skin(&skin).expect("valid skin");

    assert_eq!(animation.animate(1.0, &mut skeleton), 1);
    assert_relative_eq!(
        skeleton.world_matrix("hand").expect("hand").get_position(),
        Vector3::new(-1.0, 0.0, 0.0),
        epsilon = 1e-5
    );

    animation.animate(0.5, &mut skeleton);
    assert_relative_eq!(animation.time, 0.5, epsilon = 1e-6);
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(
        skeleton.world_matrix("hand").expect("hand").get_position(),
        Vector3::new(-half, half, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn physics_config_round_trips_through_both_formats() {
    let config = PhysicsConfig {
        gravity: Vector3::new(0.0, -3.0, 0.0),
        pointer_length: 4.5,
        ..PhysicsConfig::default()
    };
    for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
        let text = config.to_string_with(format).expect("serialize");
        let parsed = PhysicsConfig::from_str_with(&text, format).expect("parse");
        assert_eq!(parsed, config);
    }
}
