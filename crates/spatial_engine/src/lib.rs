//! # Spatial Engine
//!
//! Transform math, hierarchical skeletons and verlet soft bodies for
//! real-time 3D scenes driven by a pointer ray.
//!
//! ## Features
//!
//! - **Math**: vectors, quaternions and column-major matrices with `nalgebra` interop
//! - **Geometry**: rays, triangles, spheres and oriented boxes with parent transforms
//! - **Skeletons**: bone arenas with world and skin matrices, keyframe animation
//! - **Verlet Physics**: ropes, cloth meshes and hair strands
//! - **Collision World**: point push-out plus ray enter / stay / exit and trigger events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spatial_engine::prelude::*;
//!
//! fn main() {
//!     let mut world = World::default();
//!     let floor = world.add_collider(Collider::cuboid(
//!         Vector3::new(0.0, -1.0, 0.0),
//!         Vector3::new(10.0, 1.0, 10.0),
//!     ));
//!     world.add_system(VerletRope::new(
//!         Vector3::new(-1.0, 1.0, 0.0),
//!         Vector3::new(1.0, 1.0, 0.0),
//!         10,
//!         4,
//!     ));
//!
//!     if let Some(collider) = world.collider_mut(floor) {
//!         collider.on(ColliderEventKind::RayEnter, |event: &ColliderEvent| {
//!             println!("pointer on the floor at {:?}", event.point);
//!         });
//!     }
//!
//!     world.pointer_mut().ray = Some(Ray::from_direction(
//!         Vector3::new(0.0, 2.0, 0.0),
//!         Vector3::new(0.0, -1.0, 0.0),
//!         10.0,
//!     ));
//!     world.update(1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod skeleton;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        events::{ColliderEvent, ColliderEventHandler, ColliderEventKind},
        foundation::{
            math::{AngleUnit, Matrix4x4, Quaternion, Vector2, Vector3, Vector4},
            time::FrameClock,
        },
        geometry::{Cube, ParentTransform, Ray, Sphere, Triangle},
        input::{ControllerState, Pointer},
        physics::{
            verlet::{
                Constraint, HairConfig, LinkKind, VerletHair, VerletMesh, VerletPoint,
                VerletRope, VerletSystem,
            },
            BodyKey, Collider, ColliderKey, ColliderShape, PhysicsConfig, RayState, World,
        },
        skeleton::{
            Animation, AnimationTrack, BoneDescription, Keyframes, Skeleton, SkeletonError,
            SkinDescription,
        },
    };
}
