//! Collision world
//!
//! Owns colliders and verlet systems. Each `update`:
//! 1. clamps the frame delta,
//! 2. refreshes collider matrices,
//! 3. steps every verlet system and pushes its points out of the colliders,
//! 4. runs the pointer ray against the colliders, nearest first, and emits
//!    enter / stay / exit and trigger events.

use log::{debug, trace};
use slotmap::SlotMap;

use crate::events::{ColliderEvent, ColliderEventKind};
use crate::foundation::math::Vector3;
use crate::foundation::time::clamp_delta;
use crate::geometry::{ParentTransform, Ray};
use crate::input::{ControllerState, Pointer};

use super::verlet::{VerletHair, VerletRope, VerletSystem};
use super::{BodyKey, Collider, ColliderKey, PhysicsConfig, RayState};

/// Colliders, soft bodies and the pointer driving collider events
pub struct World {
    colliders: SlotMap<ColliderKey, Collider>,
    systems: SlotMap<BodyKey, Box<dyn VerletSystem>>,
    pointer: Pointer,
    query_ray: Option<Ray>,
    config: PhysicsConfig,
    frame: u64,
    events: Vec<ColliderEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl World {
    /// Empty world
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            colliders: SlotMap::with_key(),
            systems: SlotMap::with_key(),
            pointer: Pointer::new(),
            query_ray: None,
            config,
            frame: 0,
            events: Vec::new(),
        }
    }

    /// Settings in use
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the settings, effective from the next update
    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.config = config;
    }

    /// Updates run so far
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    // ---- colliders ----

    /// Register a collider
    pub fn add_collider(&mut self, collider: Collider) -> ColliderKey {
        let key = self.colliders.insert(collider);
        debug!("collider {key:?} added ({} total)", self.colliders.len());
        key
    }

    /// Unregister a collider
    ///
    /// A collider under the ray gets its pending `RightTriggerUp` and its
    /// `RayExit` before it is handed back.
    pub fn remove_collider(&mut self, key: ColliderKey) -> Option<Collider> {
        let mut collider = self.colliders.remove(key)?;
        let ray = self
            .query_ray
            .or(self.pointer.ray)
            .unwrap_or_else(|| Ray::new(Vector3::zero(), Vector3::zero()));

        if collider.state == RayState::HoveredTriggered {
            dispatch(&mut self.events, key, &mut collider, ColliderEventKind::RightTriggerUp, ray, None);
        }
        if collider.state != RayState::NotHovered {
            dispatch(&mut self.events, key, &mut collider, ColliderEventKind::RayExit, ray, None);
        }
        collider.state = RayState::NotHovered;
        collider.trigger_armed = false;

        debug!("collider {key:?} removed ({} left)", self.colliders.len());
        Some(collider)
    }

    /// Collider by key
    pub fn collider(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    /// Collider by key, mutable
    pub fn collider_mut(&mut self, key: ColliderKey) -> Option<&mut Collider> {
        self.colliders.get_mut(key)
    }

    /// Every collider with its key
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderKey, &Collider)> {
        self.colliders.iter()
    }

    // ---- verlet systems ----

    /// Register a verlet system
    pub fn add_system(&mut self, system: impl VerletSystem + 'static) -> BodyKey {
        let key = self.systems.insert(Box::new(system));
        debug!("verlet system {key:?} added ({} total)", self.systems.len());
        key
    }

    /// Add a rope relaxed with the configured iteration count
    pub fn add_rope(&mut self, from: Vector3, to: Vector3, count: usize) -> BodyKey {
        let iterations = self.config.constraint_iterations;
        self.add_system(VerletRope::new(from, to, count, iterations))
    }

    /// Grow hair from `base_vertices` using the configured [`HairConfig`]
    ///
    /// [`HairConfig`]: super::verlet::HairConfig
    pub fn add_hair(&mut self, base_vertices: &[Vector3], parent: ParentTransform) -> BodyKey {
        let hair = VerletHair::from_config(base_vertices, parent, &self.config.hair);
        self.add_system(hair)
    }

    /// Unregister a verlet system
    pub fn remove_system(&mut self, key: BodyKey) -> Option<Box<dyn VerletSystem>> {
        let system = self.systems.remove(key);
        if system.is_some() {
            debug!("verlet system {key:?} removed");
        }
        system
    }

    /// Verlet system by key
    pub fn system(&self, key: BodyKey) -> Option<&dyn VerletSystem> {
        self.systems.get(key).map(|system| &**system)
    }

    /// Verlet system by key, mutable
    pub fn system_mut(&mut self, key: BodyKey) -> Option<&mut (dyn VerletSystem + 'static)> {
        self.systems.get_mut(key).map(|system| &mut **system)
    }

    /// Every verlet system with its key
    pub fn systems(&self) -> impl Iterator<Item = (BodyKey, &dyn VerletSystem)> {
        self.systems.iter().map(|(key, system)| (key, system.as_ref()))
    }

    // ---- pointer ----

    /// Pointer driving the ray pass
    pub const fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Pointer driving the ray pass, mutable
    pub fn pointer_mut(&mut self) -> &mut Pointer {
        &mut self.pointer
    }

    /// Replace the pointer
    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Point from a controller, using the configured ray length
    pub fn set_pointer_from_controller(&mut self, controller: &ControllerState) {
        self.pointer
            .set_from_controller(controller, self.config.pointer_length);
    }

    /// Ray after the last pass, shortened to the nearest hit
    pub const fn query_ray(&self) -> Option<Ray> {
        self.query_ray
    }

    /// Events emitted by the last update, plus any removal flushes since
    pub fn frame_events(&self) -> &[ColliderEvent] {
        &self.events
    }

    // ---- stepping ----

    /// Advance the world, returns the delta actually integrated
    pub fn update(&mut self, delta_time: f32) -> f32 {
        let dt = clamp_delta(delta_time, self.config.min_delta, self.config.max_delta);
        self.frame += 1;
        self.events.clear();
        trace!("world frame {} dt={dt:.5}", self.frame);

        for collider in self.colliders.values_mut() {
            collider.update();
        }

        self.step_systems(dt);

        self.query_ray = None;
        if let Some(ray) = self.pointer.ray {
            self.process_ray(ray);
        }

        dt
    }

    fn step_systems(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let colliders = &self.colliders;

        for system in self.systems.values_mut() {
            system.update_physics(dt, gravity);

            for point in system.points_mut().iter_mut().filter(|p| !p.is_static) {
                for collider in colliders.values() {
                    if let Some(surface) = collider.shape.point_intersection(point.position) {
                        point.position = surface;
                    }
                }
            }

            system.apply_constraints();
        }
    }

    fn process_ray(&mut self, base: Ray) {
        let mut ray = base;
        let trigger = self.pointer.trigger;

        let mut order: Vec<(ColliderKey, f32)> = self
            .colliders
            .iter()
            .map(|(key, collider)| (key, ray.position.distance_to(collider.matrix().get_position())))
            .collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (key, _) in order {
            let Some(collider) = self.colliders.get_mut(key) else {
                continue;
            };
            let hit = collider.shape.ray_intersection(&ray);

            let Some(point) = hit else {
                match collider.state {
                    RayState::NotHovered => {}
                    RayState::Hovered => {
                        dispatch(&mut self.events, key, collider, ColliderEventKind::RayExit, ray, None);
                    }
                    RayState::HoveredTriggered => {
                        dispatch(&mut self.events, key, collider, ColliderEventKind::RightTriggerUp, ray, None);
                        dispatch(&mut self.events, key, collider, ColliderEventKind::RayExit, ray, None);
                    }
                }
                collider.state = RayState::NotHovered;
                collider.trigger_armed = false;
                continue;
            };

            if collider.state == RayState::NotHovered {
                collider.state = RayState::Hovered;
                collider.trigger_armed = !trigger;
                dispatch(&mut self.events, key, collider, ColliderEventKind::RayEnter, ray, Some(point));
            } else {
                dispatch(&mut self.events, key, collider, ColliderEventKind::RayStay, ray, Some(point));
            }

            // Nearer hits occlude the colliders behind them
            ray.length = ray.position.distance_to(point);

            match collider.state {
                RayState::Hovered if trigger && collider.trigger_armed => {
                    collider.state = RayState::HoveredTriggered;
                    collider.trigger_armed = false;
                    dispatch(&mut self.events, key, collider, ColliderEventKind::RightTriggerDown, ray, Some(point));
                }
                RayState::Hovered if !trigger => collider.trigger_armed = true,
                RayState::HoveredTriggered if !trigger => {
                    collider.state = RayState::Hovered;
                    collider.trigger_armed = true;
                    dispatch(&mut self.events, key, collider, ColliderEventKind::RightTriggerUp, ray, Some(point));
                }
                _ => {}
            }
        }

        self.query_ray = Some(ray);
    }
}

fn dispatch(
    events: &mut Vec<ColliderEvent>,
    key: ColliderKey,
    collider: &mut Collider,
    kind: ColliderEventKind,
    ray: Ray,
    point: Option<Vector3>,
) {
    let event = ColliderEvent {
        collider: key,
        kind,
        ray,
        point,
    };
    if kind == ColliderEventKind::RayStay {
        trace!("{kind} on {key:?}");
    } else {
        debug!("{kind} on {key:?}");
    }
    collider.events.emit(&event);
    events.push(event);
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("colliders", &self.colliders.len())
            .field("systems", &self.systems.len())
            .field("pointer", &self.pointer)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}
