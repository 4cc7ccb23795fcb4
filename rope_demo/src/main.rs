//! Rope demo application
//!
//! Headless run of the collision world: a rope hanging over a box, a ball
//! under it, and a pointer sweeping across the scene while the trigger
//! pulses. Events are logged as they happen.
//!
//! Usage: `rope_demo [config.toml|config.ron]`

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;

use spatial_engine::foundation::logging;
use spatial_engine::prelude::*;

const FRAMES: u32 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;

struct RopeDemo {
    world: World,
    rope: BodyKey,
    ball: ColliderKey,
    elapsed: f32,
    hits: Rc<Cell<u32>>,
}

impl RopeDemo {
    fn new(config: PhysicsConfig) -> Self {
        let iterations = config.constraint_iterations;
        let mut world = World::new(config);

        let mut table = Collider::cuboid(Vector3::new(0.0, -0.5, -3.0), Vector3::new(1.5, 0.2, 1.0));
        table.on_any(|event: &ColliderEvent| {
            log::info!("table: {} at {:?}", event.kind, event.point);
        });
        world.add_collider(table);

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let ball = Collider::sphere(Vector3::new(0.8, -1.2, -3.0), 0.3)
            .with_handler(ColliderEventKind::RightTriggerDown, move |event: &ColliderEvent| {
                counter.set(counter.get() + 1);
                log::info!("ball grabbed at {:?}", event.point);
            })
            .with_handler(ColliderEventKind::RightTriggerUp, |_: &ColliderEvent| {
                log::info!("ball released");
            });
        let ball = world.add_collider(ball);

        let rope = world.add_system(VerletRope::with_link(
            Vector3::new(-1.0, 0.5, -3.0),
            Vector3::new(1.0, 0.5, -3.0),
            16,
            iterations,
            LinkKind::Soft { stiffness: 0.9 },
        ));

        log::info!("Scene ready: 2 colliders, 1 rope");

        Self {
            world,
            rope,
            ball,
            elapsed: 0.0,
            hits,
        }
    }

    fn step(&mut self) {
        self.elapsed += FRAME_TIME;

        // Sweep the pointer left and right, pulse the trigger every second
        let yaw = (self.elapsed * TAU / 4.0).sin() * 30.0;
        let pose = Matrix4x4::from_translation(Vector3::new(0.0, -0.2, 0.0))
            .rotate_quaternion(Quaternion::from_euler_xyz(-15.0, yaw, 0.0, AngleUnit::Deg));
        let controller = ControllerState {
            transform: pose,
            trigger: self.elapsed.fract() > 0.5,
            ..ControllerState::default()
        };
        self.world.set_pointer_from_controller(&controller);

        // Drift the ball along x so the rope has something to fall on
        if let Some(ball) = self.world.collider_mut(self.ball) {
            let mut position = ball.position();
            position.x = (self.elapsed * 0.5).cos() * 0.8;
            ball.set_position(position);
        }

        self.world.update(FRAME_TIME);
    }

    fn report(&self) {
        if let Some(rope) = self.world.system(self.rope) {
            let lowest = rope
                .points()
                .iter()
                .map(|p| p.position.y)
                .fold(f32::INFINITY, f32::min);
            log::info!(
                "frame {}: lowest rope point y={lowest:.3}, ball grabbed {} times",
                self.world.frame(),
                self.hits.get()
            );
        }
        if let Some(ray) = self.world.query_ray() {
            log::debug!("query ray ends at {:?}", ray.end());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting rope demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics config from {path}");
            PhysicsConfig::load_from_file(&path)?
        }
        None => PhysicsConfig::default(),
    };

    let mut demo = RopeDemo::new(config);
    for frame in 0..FRAMES {
        demo.step();
        if frame % 60 == 0 {
            demo.report();
        }
    }
    demo.report();

    log::info!("Rope demo finished");
    Ok(())
}
