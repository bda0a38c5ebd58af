//! Collidable source geometry
//!
//! The heightmap sampler only sees geometry through [`RaycastTarget`]: a
//! bounding box plus a bounded ray query. [`MeshCollider`] is the stock
//! implementation over a [`TriangleMesh`], built on parry, and
//! [`ColliderScope`] provides one for a [`SceneObject`] for exactly as long
//! as it is needed.

pub mod mesh;
pub mod collider;
pub mod obj;
pub mod object;

pub use mesh::TriangleMesh;
pub use collider::MeshCollider;
pub use obj::{load_obj, parse_obj};
pub use object::{ColliderScope, SceneObject};

use crate::core::types::Vec3;
use crate::math::{Aabb, Ray};

/// Result of a successful raycast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Index of the triangle that was hit (0 for analytic surfaces)
    pub triangle: usize,
}

/// Geometry that can be queried with bounded rays.
pub trait RaycastTarget {
    /// World-space bounding box of the collidable surface.
    fn bounds(&self) -> Aabb;

    /// Nearest hit along `ray` no further than `max_distance`, if any.
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit>;
}

impl<T: RaycastTarget + ?Sized> RaycastTarget for &T {
    fn bounds(&self) -> Aabb {
        (**self).bounds()
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        (**self).raycast(ray, max_distance)
    }
}
