//! Mesh collider backed by a parry triangle mesh

use parry3d::math::{Point, Vector};
use parry3d::query::{Ray as ParryRay, RayCast};
use parry3d::shape::{FeatureId, TriMesh};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::{Aabb, Ray};

use super::mesh::TriangleMesh;
use super::{RayHit, RaycastTarget};

/// Step taken past a culled back face before casting again
const BACKFACE_SKIP: f32 = 1e-4;

/// Upper bound on back faces skipped by one query
const MAX_BACKFACE_SKIPS: usize = 64;

/// Collision representation of a [`TriangleMesh`].
///
/// Ray queries go through parry's BVH. Back faces are culled by default,
/// like a physics mesh collider: a ray arriving from behind a triangle passes
/// through it and may still hit surfaces further along.
#[derive(Clone)]
pub struct MeshCollider {
    shape: TriMesh,
    bounds: Aabb,
    cull_backfaces: bool,
}

impl std::fmt::Debug for MeshCollider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshCollider")
            .field("triangles", &self.triangle_count())
            .field("bounds", &self.bounds)
            .field("cull_backfaces", &self.cull_backfaces)
            .finish()
    }
}

impl MeshCollider {
    /// Build a collider from a mesh. Back faces are culled.
    pub fn new(mesh: &TriangleMesh) -> Result<Self> {
        let vertices: Vec<Point<f32>> = mesh
            .positions()
            .iter()
            .map(|p| Point::new(p.x, p.y, p.z))
            .collect();
        let shape = TriMesh::new(vertices, mesh.indices().to_vec())
            .map_err(|e| Error::Mesh(format!("cannot build collider: {:?}", e)))?;

        log::debug!("Built mesh collider: {} triangles", mesh.triangle_count());

        Ok(Self {
            shape,
            bounds: mesh.bounds(),
            cull_backfaces: true,
        })
    }

    /// Register hits on back faces too (two-sided collision)
    pub fn with_backfaces(mut self, hit_backfaces: bool) -> Self {
        self.cull_backfaces = !hit_backfaces;
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.shape.indices().len()
    }

    /// Triangle index encoded in a parry feature; back-face hits are offset
    /// by the triangle count.
    fn triangle_of(&self, feature: FeatureId) -> usize {
        let count = self.triangle_count();
        match feature {
            FeatureId::Face(id) => id as usize % count.max(1),
            _ => 0,
        }
    }

    fn is_front_face(&self, triangle: usize, direction: Vector<f32>) -> bool {
        self.shape
            .triangle(triangle as u32)
            .normal()
            .is_some_and(|n| n.dot(&direction) < 0.0)
    }
}

impl RaycastTarget for MeshCollider {
    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let direction = Vector::new(ray.direction.x, ray.direction.y, ray.direction.z);
        let mut travelled = 0.0;

        for _ in 0..=MAX_BACKFACE_SKIPS {
            let origin = ray.at(travelled);
            let query = ParryRay::new(Point::new(origin.x, origin.y, origin.z), direction);
            let hit = self
                .shape
                .cast_local_ray_and_get_normal(&query, max_distance - travelled, false)?;

            let distance = travelled + hit.time_of_impact;
            let triangle = self.triangle_of(hit.feature);
            if !self.cull_backfaces || self.is_front_face(triangle, direction) {
                return Some(RayHit {
                    point: ray.at(distance),
                    distance,
                    triangle,
                });
            }

            travelled = distance + BACKFACE_SKIP;
            if travelled > max_distance {
                return None;
            }
        }

        None
    }
}
