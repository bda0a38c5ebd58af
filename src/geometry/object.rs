//! Scene objects and scoped collider provisioning

use crate::core::types::{Mat4, Result};
use crate::math::{Aabb, Ray};

use super::collider::MeshCollider;
use super::mesh::TriangleMesh;
use super::{RayHit, RaycastTarget};

/// A named mesh placed in the world that may or may not carry a collider
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    mesh: TriangleMesh,
    /// Local to world transform
    transform: Mat4,
    collider: Option<MeshCollider>,
}

impl SceneObject {
    /// Create an object at the origin without a collider
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Mat4::IDENTITY,
            collider: None,
        }
    }

    /// Place the object in the world. Drops any collider built for the old placement.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self.collider = None;
        self
    }

    /// Attach a permanent collider built from the object's world-space mesh
    pub fn with_collider(mut self) -> Result<Self> {
        self.attach_collider()?;
        Ok(self)
    }

    /// Mesh in local space
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Mesh with the object's transform applied
    pub fn world_mesh(&self) -> Result<TriangleMesh> {
        if self.transform == Mat4::IDENTITY {
            return Ok(self.mesh.clone());
        }
        self.mesh.transformed(&self.transform)
    }

    pub fn collider(&self) -> Option<&MeshCollider> {
        self.collider.as_ref()
    }

    pub fn has_collider(&self) -> bool {
        self.collider.is_some()
    }

    /// Build and attach a world-space collider, replacing any existing one
    pub fn attach_collider(&mut self) -> Result<()> {
        self.collider = Some(MeshCollider::new(&self.world_mesh()?)?);
        Ok(())
    }

    pub fn detach_collider(&mut self) -> Option<MeshCollider> {
        self.collider.take()
    }
}

/// Raycastable view of a [`SceneObject`] for the lifetime of the scope.
///
/// If the object has no collider one is attached on acquire and detached
/// again when the scope is dropped, on every exit path. An existing collider
/// is used as-is and left in place.
pub struct ColliderScope<'a> {
    object: &'a mut SceneObject,
    bounds: Aabb,
    temporary: bool,
}

impl<'a> ColliderScope<'a> {
    pub fn acquire(object: &'a mut SceneObject) -> Result<Self> {
        let temporary = !object.has_collider();
        if temporary {
            object.attach_collider()?;
            log::debug!("Attached temporary collider to '{}'", object.name);
        }
        let bounds = object.collider.as_ref().map(|c| c.bounds()).unwrap_or_default();
        Ok(Self { object, bounds, temporary })
    }

    /// Whether the collider will be removed when the scope ends
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn object(&self) -> &SceneObject {
        self.object
    }
}

impl RaycastTarget for ColliderScope<'_> {
    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.object.collider.as_ref()?.raycast(ray, max_distance)
    }
}

impl Drop for ColliderScope<'_> {
    fn drop(&mut self) {
        if self.temporary {
            self.object.collider = None;
            log::debug!("Removed temporary collider from '{}'", self.object.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Vec2, Vec3};

    fn plate() -> TriangleMesh {
        TriangleMesh::quad(Vec2::ZERO, Vec2::splat(2.0), 1.0)
    }

    #[test]
    fn test_temporary_collider_removed_on_drop() {
        let mut object = SceneObject::new("plate", plate());
        {
            let scope = ColliderScope::acquire(&mut object).unwrap();
            assert!(scope.is_temporary());
            assert!(scope.object().has_collider());
            let hit = scope.raycast(&Ray::down(Vec3::new(0.5, 5.0, 1.2)), 10.0);
            assert!(hit.is_some());
        }
        assert!(!object.has_collider());
    }

    #[test]
    fn test_existing_collider_kept() {
        let mut object = SceneObject::new("plate", plate()).with_collider().unwrap();
        {
            let scope = ColliderScope::acquire(&mut object).unwrap();
            assert!(!scope.is_temporary());
        }
        assert!(object.has_collider());
    }

    #[test]
    fn test_removed_when_unwinding() {
        let mut object = SceneObject::new("plate", plate());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = ColliderScope::acquire(&mut object).unwrap();
            panic!("sampling failed");
        }));
        assert!(result.is_err());
        assert!(!object.has_collider());
    }

    #[test]
    fn test_scope_bounds_match_mesh() {
        let mut object = SceneObject::new("plate", plate());
        let expected = object.mesh().bounds();
        let scope = ColliderScope::acquire(&mut object).unwrap();
        assert_eq!(scope.bounds(), expected);
    }

    #[test]
    fn test_collider_in_world_space() {
        let transform = Mat4::from_translation(Vec3::new(10.0, 2.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let mut object = SceneObject::new("plate", plate()).with_transform(transform);
        let scope = ColliderScope::acquire(&mut object).unwrap();

        let bounds = scope.bounds();
        assert_eq!(bounds.min, Vec3::new(10.0, 4.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(14.0, 4.0, 4.0));

        // Local position (0.5, 1.2) lands at world (11, 2.4)
        let hit = scope.raycast(&Ray::down(Vec3::new(11.0, 10.0, 2.4)), 20.0).unwrap();
        assert!((hit.point.y - 4.0).abs() < 1e-4);
        assert!(scope.raycast(&Ray::down(Vec3::new(1.0, 10.0, 1.0)), 20.0).is_none());
    }

    #[test]
    fn test_with_transform_drops_stale_collider() {
        let object = SceneObject::new("plate", plate())
            .with_collider()
            .unwrap()
            .with_transform(Mat4::from_translation(Vec3::X));
        assert!(!object.has_collider());
        assert_eq!(object.transform(), Mat4::from_translation(Vec3::X));
        assert_eq!(object.world_mesh().unwrap().bounds().min, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_detach() {
        let mut object = SceneObject::new("plate", plate()).with_collider().unwrap();
        assert!(object.detach_collider().is_some());
        assert!(object.collider().is_none());
    }
}
