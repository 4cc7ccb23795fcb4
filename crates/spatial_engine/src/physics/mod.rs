//! Physics: verlet soft bodies and the collision world
//!
//! The [`World`] owns colliders and verlet systems under `slotmap` keys,
//! steps the systems against the colliders, and turns pointer ray hits into
//! collider events.

pub mod collider;
pub mod config;
pub mod verlet;
pub mod world;

pub use collider::{Collider, ColliderShape, RayState};
pub use config::PhysicsConfig;
pub use world::World;

slotmap::new_key_type! {
    /// Handle to a collider owned by a [`World`]
    pub struct ColliderKey;

    /// Handle to a verlet system owned by a [`World`]
    pub struct BodyKey;
}
