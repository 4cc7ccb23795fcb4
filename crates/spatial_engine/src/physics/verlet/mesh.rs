//! Cloth-like mesh: one point per vertex, one link per triangle edge

use log::debug;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vector3;

use super::{Constraint, VerletBody, VerletPoint, VerletSystem};

/// Triangulated surface handed over by the asset loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    /// Vertex positions
    pub vertices: Vec<Vector3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

/// Problems with a mesh description
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index points past the vertex list
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Number of vertices
        vertex_count: usize,
    },

    /// The index list length is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Soft body built from a triangle mesh
///
/// Edges shared by two triangles get two coincident constraints.
#[derive(Debug, Clone)]
pub struct VerletMesh {
    body: VerletBody,
}

impl VerletMesh {
    /// Build points and edge constraints from a mesh
    pub fn new(mesh: &MeshDescription, iterations: usize) -> Result<Self, MeshError> {
        if mesh.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(mesh.indices.len()));
        }

        let vertex_count = mesh.vertices.len();
        let indices = mesh
            .indices
            .iter()
            .map(|&index| {
                usize::try_from(index)
                    .ok()
                    .filter(|&i| i < vertex_count)
                    .ok_or(MeshError::IndexOutOfRange {
                        index,
                        vertex_count,
                    })
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let points: Vec<VerletPoint> = mesh.vertices.iter().copied().map(VerletPoint::new).collect();

        let mut constraints = Vec::with_capacity(indices.len());
        for triangle in indices.chunks_exact(3) {
            let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
            constraints.push(Constraint::distance(&points, a, b));
            constraints.push(Constraint::distance(&points, b, c));
            constraints.push(Constraint::distance(&points, c, a));
        }

        debug!(
            "verlet mesh: {} points, {} constraints",
            points.len(),
            constraints.len()
        );

        Ok(Self {
            body: VerletBody::new(points, constraints, iterations),
        })
    }

    /// Pin a vertex in place; out-of-range indices are ignored
    pub fn pin(&mut self, index: usize) -> bool {
        self.body.points.get_mut(index).map_or(false, |point| {
            point.is_static = true;
            true
        })
    }
}

impl VerletSystem for VerletMesh {
    fn body(&self) -> &VerletBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut VerletBody {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshDescription {
        MeshDescription {
            vertices: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_mesh_keeps_shared_edges() {
        let mesh = VerletMesh::new(&quad(), 3).expect("valid mesh");
        assert_eq!(mesh.points().len(), 4);
        assert_eq!(mesh.constraints().len(), 6);

        let diagonal = mesh
            .constraints()
            .iter()
            .filter(|c| {
                let (a, b) = c.endpoints();
                (a.min(b), a.max(b)) == (0, 2)
            })
            .count();
        assert_eq!(diagonal, 2);
    }

    #[test]
    fn test_mesh_rejects_bad_indices() {
        let mut bad = quad();
        bad.indices.push(7);
        assert_eq!(
            VerletMesh::new(&bad, 1).err(),
            Some(MeshError::IncompleteTriangle(7))
        );

        bad.indices.extend([0, 9]);
        assert_eq!(
            VerletMesh::new(&bad, 1).err(),
            Some(MeshError::IndexOutOfRange {
                index: 7,
                vertex_count: 4
            })
        );
    }

    #[test]
    fn test_pinned_vertex_holds_under_gravity() {
        let mut mesh = VerletMesh::new(&quad(), 4).expect("valid mesh");
        assert!(mesh.pin(3));
        assert!(!mesh.pin(40));
        for _ in 0..20 {
            mesh.update_physics(1.0 / 60.0, Vector3::new(0.0, -9.81, 0.0));
            mesh.apply_constraints();
        }
        assert_eq!(mesh.points()[3].position, Vector3::new(0.0, 1.0, 0.0));
        assert!(mesh.points()[1].position.y < 0.0);
    }
}
