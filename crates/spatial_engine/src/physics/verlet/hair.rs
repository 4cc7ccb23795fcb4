//! Hair: short pinned strands growing from the vertices of a moving mesh

use std::ops::Range;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Matrix4x4, Vector3};
use crate::geometry::ParentTransform;

use super::{Constraint, VerletBody, VerletPoint, VerletSystem};

/// How strands are spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairConfig {
    /// Strands spawned at every base vertex
    pub strands_per_vertex: usize,
    /// Segments per strand
    pub segments: usize,
    /// Rest length of a whole strand
    pub strand_length: f32,
    /// Maximum per-axis root offset from its vertex, capped at `strand_length`
    pub root_jitter: f32,
    /// Growth direction in the parent's local space
    pub growth: Vector3,
    /// Relaxation passes per step
    pub iterations: usize,
    /// Seed for the root jitter
    pub seed: u64,
}

impl Default for HairConfig {
    fn default() -> Self {
        Self {
            strands_per_vertex: 3,
            segments: 4,
            strand_length: 0.2,
            root_jitter: 0.01,
            growth: Vector3::new(0.0, -1.0, 0.0),
            iterations: 4,
            seed: 0,
        }
    }
}

/// Upper bound on the root offset regardless of strand length
const MAX_ROOT_JITTER: f32 = 1.0e6;

/// Usable per-axis jitter: non-finite values disable it, large ones are capped
fn root_jitter(config: &HairConfig) -> f32 {
    let requested = config.root_jitter.abs();
    if !requested.is_finite() {
        warn!("hair root jitter {} is not finite, ignoring", config.root_jitter);
        return 0.0;
    }
    let limit = if config.strand_length.is_finite() {
        config.strand_length.abs().min(MAX_ROOT_JITTER)
    } else {
        0.0
    };
    if requested > limit {
        warn!("hair root jitter {requested} clamped to {limit}");
    }
    requested.min(limit)
}

/// Range of points making up one strand, root first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HairStrand {
    /// Point indices, root at `points.start`
    pub points: Range<usize>,
}

/// Set of strands anchored to a parent transform
#[derive(Debug, Clone)]
pub struct VerletHair {
    body: VerletBody,
    parent: ParentTransform,
    strands: Vec<HairStrand>,
    /// (root point index, root position in parent space)
    anchors: Vec<(usize, Vector3)>,
}

impl VerletHair {
    /// Grow strands from `base_vertices` given in the parent's local space
    pub fn new(
        base_vertices: &[Vector3],
        parent: ParentTransform,
        config: &HairConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let segments = config.segments.max(1);
        let growth = config.growth.normalize();
        let growth = if growth == Vector3::zero() {
            Vector3::new(0.0, -1.0, 0.0)
        } else {
            growth
        };
        #[allow(clippy::cast_precision_loss)]
        let step = growth * (config.strand_length / segments as f32);
        let jitter = root_jitter(config);
        let matrix = parent.resolve().unwrap_or_else(Matrix4x4::identity);

        let strand_count = base_vertices.len() * config.strands_per_vertex;
        let mut points = Vec::with_capacity(strand_count * (segments + 1));
        let mut strands = Vec::with_capacity(strand_count);
        let mut anchors = Vec::with_capacity(strand_count);

        for vertex in base_vertices {
            for _ in 0..config.strands_per_vertex {
                let offset = if jitter > 0.0 {
                    Vector3::new(
                        rng.gen_range(-jitter..=jitter),
                        rng.gen_range(-jitter..=jitter),
                        rng.gen_range(-jitter..=jitter),
                    )
                } else {
                    Vector3::zero()
                };
                let root = *vertex + offset;

                let start = points.len();
                for i in 0..=segments {
                    #[allow(clippy::cast_precision_loss)]
                    let local = root + step * i as f32;
                    points.push(VerletPoint::new(matrix.transform_point(local)));
                }
                points[start].is_static = true;
                anchors.push((start, root));
                strands.push(HairStrand {
                    points: start..points.len(),
                });
            }
        }

        let constraints = strands
            .iter()
            .flat_map(|strand| {
                let range = strand.points.clone();
                range
                    .clone()
                    .zip(range.skip(1))
                    .map(|(a, b)| Constraint::distance(&points, a, b))
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(
            "hair: {} strands, {} points",
            strands.len(),
            points.len()
        );

        Self {
            body: VerletBody::new(points, constraints, config.iterations),
            parent,
            strands,
            anchors,
        }
    }

    /// Same as [`VerletHair::new`] with jitter seeded from `config.seed`
    pub fn from_config(
        base_vertices: &[Vector3],
        parent: ParentTransform,
        config: &HairConfig,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::new(base_vertices, parent, config, &mut rng)
    }

    /// Strand ranges for drawing
    pub fn strands(&self) -> &[HairStrand] {
        &self.strands
    }

    /// Points of one strand, root first
    pub fn strand_points(&self, strand: &HairStrand) -> &[VerletPoint] {
        self.body.points.get(strand.points.clone()).unwrap_or_default()
    }

    /// Replace the parent link
    pub fn set_parent(&mut self, parent: ParentTransform) {
        self.parent = parent;
    }

    /// Move pinned roots to where the parent currently carries them
    pub fn follow_parent(&mut self) {
        let matrix = self.parent.resolve().unwrap_or_else(Matrix4x4::identity);
        for &(index, local) in &self.anchors {
            if let Some(point) = self.body.points.get_mut(index) {
                if point.is_static {
                    point.position = matrix.transform_point(local);
                }
            }
        }
    }
}

impl VerletSystem for VerletHair {
    fn body(&self) -> &VerletBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut VerletBody {
        &mut self.body
    }

    fn update_physics(&mut self, dt: f32, gravity: Vector3) {
        self.follow_parent();
        self.body.integrate(dt, gravity);
    }
}
