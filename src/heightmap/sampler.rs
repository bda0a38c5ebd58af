//! Raycast heightmap sampling

use std::time::Instant;

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};
use crate::geometry::RaycastTarget;
use crate::math::{Aabb, Ray};

use super::grid::HeightGrid;
use super::params::SampleParams;
use super::progress::{CancelToken, NoProgress, SampleProgress};

/// Output of one sampling run
#[derive(Clone, Debug, PartialEq)]
pub struct SampledTerrain {
    pub heights: HeightGrid,
    /// Terrain dimensions in world units: source bounds size plus padding
    pub size: Vec3,
    /// Box the ray grid was laid over
    pub working_bounds: Aabb,
}

/// Headline numbers of a sampled terrain
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainSummary {
    pub resolution: usize,
    pub size: Vec3,
    pub min_height: f32,
    pub max_height: f32,
}

impl SampledTerrain {
    pub fn summary(&self) -> TerrainSummary {
        let (min_height, max_height) = self.heights.min_max();
        TerrainSummary {
            resolution: self.heights.resolution(),
            size: self.size,
            min_height,
            max_height,
        }
    }
}

/// Converts geometry into a height grid by casting a grid of rays straight down.
///
/// The ray grid covers the source bounds widened by `padding.x` / `padding.z`
/// about their center. Rays start one bounds-height above the top and reach
/// three bounds-heights, so the vertical search range ignores `padding.y`;
/// that component only enters through the bottom-up size factor.
#[derive(Clone, Debug)]
pub struct HeightmapSampler {
    params: SampleParams,
    cancel: Option<CancelToken>,
}

impl HeightmapSampler {
    /// Fails with [`Error::InvalidParameter`] if the parameters are unusable.
    pub fn new(params: SampleParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, cancel: None })
    }

    /// Check `token` before every row and abort with [`Error::Cancelled`] once set
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn params(&self) -> &SampleParams {
        &self.params
    }

    /// Box the rays are laid over: footprint grown by the horizontal padding,
    /// vertical span unchanged.
    pub fn working_bounds(&self, bounds: &Aabb) -> Result<Aabb> {
        if !bounds.is_finite() {
            return Err(Error::DegenerateBounds(format!("bounds {:?} are not finite", bounds)));
        }

        let size = bounds.size();
        let padding = self.params.padding;
        if size.y <= 0.0 {
            return Err(Error::DegenerateBounds(format!(
                "vertical extent is {}, must be positive",
                size.y
            )));
        }
        if size.y + padding.y == 0.0 {
            return Err(Error::DegenerateBounds(format!(
                "vertical padding {} cancels the source height {}",
                padding.y, size.y
            )));
        }

        let footprint_x = size.x + padding.x;
        let footprint_z = size.z + padding.z;
        if footprint_x <= 0.0 || footprint_z <= 0.0 {
            return Err(Error::DegenerateBounds(format!(
                "terrain footprint {} x {} is empty",
                footprint_x, footprint_z
            )));
        }

        Ok(bounds.with_footprint(footprint_x, footprint_z))
    }

    pub fn sample<T>(&self, target: &T, bounds: Aabb) -> Result<SampledTerrain>
    where
        T: RaycastTarget + ?Sized,
    {
        self.sample_with_progress(target, bounds, &mut NoProgress)
    }

    /// Sample `target` over `bounds`, reporting each finished row to `progress`.
    ///
    /// Either the whole grid is produced or an error is returned; bounds are
    /// validated before the first ray.
    pub fn sample_with_progress<T, P>(
        &self,
        target: &T,
        bounds: Aabb,
        progress: &mut P,
    ) -> Result<SampledTerrain>
    where
        T: RaycastTarget + ?Sized,
        P: SampleProgress + ?Sized,
    {
        let working = self.working_bounds(&bounds)?;
        let params = &self.params;
        let resolution = params.resolution;

        let source_size = bounds.size();
        let working_size = working.size();
        let size_factor = params.size_factor(source_size.y);
        let step_x = working_size.x / resolution as f32;
        let step_z = working_size.z / resolution as f32;
        let max_distance = working_size.y * 3.0;

        log::debug!(
            "Sampling {}x{} heightmap over {:?} (step {:.4} x {:.4}, mode {}, shift {}, size factor {:.4})",
            resolution, resolution, working, step_x, step_z, params.mode, params.vertical_shift, size_factor
        );

        let start = Instant::now();
        let mut heights = HeightGrid::new(resolution);
        let mut origin = Vec3::new(working.min.x, working.max.y + working_size.y, working.min.z);
        let mut hits = 0usize;

        for z in 0..resolution {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    log::warn!("Heightmap sampling cancelled at row {}/{}", z, resolution);
                    return Err(Error::Cancelled { row: z, total: resolution });
                }
            }

            for x in 0..resolution {
                let height = match target.raycast(&Ray::down(origin), max_distance) {
                    Some(hit) => {
                        hits += 1;
                        let relative = (hit.point.y - working.min.y) / working_size.y;
                        params.normalize(relative, size_factor)
                    }
                    None => 0.0,
                };
                heights.set(z, x, height);
                origin.x += step_x;
            }

            origin.x = working.min.x;
            origin.z += step_z;
            progress.on_progress(z, resolution);
        }

        log::info!(
            "Sampled {}x{} heightmap in {:.2?} ({} of {} rays hit)",
            resolution,
            resolution,
            start.elapsed(),
            hits,
            resolution * resolution
        );

        Ok(SampledTerrain {
            heights,
            size: source_size + params.padding,
            working_bounds: working,
        })
    }
}

/// One-shot helper: validate `params`, then sample with progress.
pub fn sample_heightmap<T, P>(
    target: &T,
    bounds: Aabb,
    params: &SampleParams,
    progress: &mut P,
) -> Result<SampledTerrain>
where
    T: RaycastTarget + ?Sized,
    P: SampleProgress + ?Sized,
{
    HeightmapSampler::new(params.clone())?.sample_with_progress(target, bounds, progress)
}
