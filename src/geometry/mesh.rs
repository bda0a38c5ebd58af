//! Indexed triangle mesh

use crate::core::error::Error;
use crate::core::types::{Mat4, Result, Vec2, Vec3};
use crate::math::Aabb;

/// Indexed triangle mesh in world space
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    bounds: Aabb,
}

impl TriangleMesh {
    /// Build a mesh, validating that it has at least one triangle, every
    /// index is in range and every position is finite.
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::Mesh("mesh has no triangles".into()));
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(Error::Mesh(format!("vertex {} is not finite", i)));
        }
        let vertex_count = positions.len();
        for (face, tri) in indices.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(Error::Mesh(format!(
                    "face {} references vertex {} but mesh has {} vertices",
                    face, bad, vertex_count
                )));
            }
        }

        let bounds = Aabb::from_points(positions.iter().copied())
            .ok_or_else(|| Error::Mesh("mesh has no vertices".into()))?;

        Ok(Self { positions, indices, bounds })
    }

    /// Horizontal quad at height `y` spanning `min..max` in XZ, facing +Y
    pub fn quad(min: Vec2, max: Vec2, y: f32) -> Self {
        let positions = vec![
            Vec3::new(min.x, y, min.y),
            Vec3::new(min.x, y, max.y),
            Vec3::new(max.x, y, max.y),
            Vec3::new(max.x, y, min.y),
        ];
        let bounds = Aabb::new(
            Vec3::new(min.x.min(max.x), y, min.y.min(max.y)),
            Vec3::new(min.x.max(max.x), y, min.y.max(max.y)),
        );
        Self {
            positions,
            indices: vec![[0, 1, 2], [0, 2, 3]],
            bounds,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Copy of the mesh with every vertex transformed by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Result<Self> {
        let positions = self
            .positions
            .iter()
            .map(|&p| matrix.transform_point3(p))
            .collect();
        Self::new(positions, self.indices.clone())
    }
}
