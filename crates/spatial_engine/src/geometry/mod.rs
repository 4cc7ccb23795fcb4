//! Geometric primitives and intersection tests
//!
//! Shapes keep their transform in a [`Primitive`]; callers refresh the
//! derived matrix explicitly, then query rays and points against it.

mod cube;
mod primitive;
mod ray;
mod sphere;
mod triangle;

pub use cube::Cube;
pub use primitive::{ParentTransform, Primitive};
pub use ray::Ray;
pub use sphere::Sphere;
pub use triangle::Triangle;
