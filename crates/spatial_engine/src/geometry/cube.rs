//! Oriented box shape

use crate::foundation::math::Vector3;

use super::{Primitive, Ray, Triangle};

/// Two triangles per face over the corner indices
const FACES: [[usize; 3]; 12] = [
    // front
    [0, 1, 2],
    [0, 2, 3],
    // back
    [4, 5, 6],
    [4, 6, 7],
    // top
    [3, 2, 6],
    [3, 6, 7],
    // bottom
    [0, 1, 5],
    [0, 5, 4],
    // left
    [0, 4, 7],
    [0, 7, 3],
    // right
    [1, 5, 6],
    [1, 6, 2],
];

/// Box centred on its primitive, sized along the local axes
#[derive(Debug, Clone)]
pub struct Cube {
    /// Transform
    pub primitive: Primitive,
    /// Full extents along x, y and z before scaling
    pub size: Vector3,
    local_vertices: [Vector3; 8],
    vertices: [Vector3; 8],
}

impl Cube {
    /// Creates a box at `position` with the given extents
    pub fn new(position: Vector3, size: Vector3) -> Self {
        let (x, y, z) = (size.x / 2.0, size.y / 2.0, size.z / 2.0);
        let local_vertices = [
            Vector3::new(-x, -y, z),
            Vector3::new(x, -y, z),
            Vector3::new(x, y, z),
            Vector3::new(-x, y, z),
            Vector3::new(-x, -y, -z),
            Vector3::new(x, -y, -z),
            Vector3::new(x, y, -z),
            Vector3::new(-x, y, -z),
        ];

        let mut cube = Self {
            primitive: Primitive::new(position),
            size,
            local_vertices,
            vertices: local_vertices,
        };
        cube.calculate_vertices();
        cube
    }

    /// World-space corners as of the last `calculate_vertices`
    pub const fn vertices(&self) -> &[Vector3; 8] {
        &self.vertices
    }

    /// Transform the local corners by the primitive matrix
    pub fn calculate_vertices(&mut self) {
        let matrix = self.primitive.matrix;
        for (world, local) in self.vertices.iter_mut().zip(&self.local_vertices) {
            *world = matrix.transform_point(*local);
        }
    }

    /// The 12 world-space triangles covering the faces
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        FACES.iter().map(|&[a, b, c]| {
            Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c])
        })
    }

    /// Hit closest to the ray origin
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Vector3> {
        let origin = ray.start();
        self.triangles()
            .filter_map(|triangle| triangle.ray_intersection(ray))
            .min_by(|a, b| a.distance_to(origin).total_cmp(&b.distance_to(origin)))
    }

    /// Push a point inside the box out through the nearest face
    pub fn point_intersection(&self, point: Vector3) -> Option<Vector3> {
        let inverse = self.primitive.matrix.invert()?;
        let local = inverse.transform_point(point);
        let half = self.size / 2.0;

        let depth = Vector3::new(
            half.x - local.x.abs(),
            half.y - local.y.abs(),
            half.z - local.z.abs(),
        );
        if depth.x < 0.0 || depth.y < 0.0 || depth.z < 0.0 {
            return None;
        }

        let face = |value: f32, extent: f32| if value < 0.0 { -extent } else { extent };
        let mut pushed = local;
        if depth.x <= depth.y && depth.x <= depth.z {
            pushed.x = face(local.x, half.x);
        } else if depth.y <= depth.z {
            pushed.y = face(local.y, half.y);
        } else {
            pushed.z = face(local.z, half.z);
        }

        Some(self.primitive.matrix.transform_point(pushed))
    }
}
