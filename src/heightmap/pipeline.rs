//! Headless object-to-terrain conversion

use crate::core::types::Result;
use crate::geometry::{ColliderScope, RaycastTarget, SceneObject};

use super::export::TerrainSink;
use super::progress::SampleProgress;
use super::sampler::{HeightmapSampler, TerrainSummary};

/// Sample `object` into a terrain and hand it to `sink`.
///
/// A collider is attached to the object for the duration of sampling if it
/// does not already have one, and removed again whether sampling succeeds or
/// fails. Bounds come from the collider.
pub fn object_to_terrain<P, S>(
    object: &mut SceneObject,
    sampler: &HeightmapSampler,
    progress: &mut P,
    sink: &mut S,
) -> Result<TerrainSummary>
where
    P: SampleProgress + ?Sized,
    S: TerrainSink + ?Sized,
{
    let name = object.name.clone();
    let terrain = {
        let scope = ColliderScope::acquire(object)?;
        let bounds = scope.bounds();
        sampler.sample_with_progress(&scope, bounds, progress)?
    };

    let summary = terrain.summary();
    log::info!(
        "Created terrain from '{}': {}x{} samples, size {:.2} x {:.2} x {:.2}, heights {:.3}..{:.3}",
        name,
        summary.resolution,
        summary.resolution,
        summary.size.x,
        summary.size.y,
        summary.size.z,
        summary.min_height,
        summary.max_height
    );

    sink.accept(terrain)?;
    Ok(summary)
}
