//! Mesh to heightmap conversion
//!
//! [`HeightmapSampler`] sweeps a grid of downward rays over a
//! [`RaycastTarget`](crate::geometry::RaycastTarget) and turns the hits into
//! normalized heights. [`object_to_terrain`] wraps it with collider
//! provisioning and hands the result to a [`TerrainSink`].

pub mod params;
pub mod grid;
pub mod progress;
pub mod sampler;
pub mod export;
pub mod pipeline;

pub use params::{NormalizationMode, SampleParams};
pub use grid::HeightGrid;
pub use progress::{CancelToken, NoProgress, ProgressLogger, SampleProgress};
pub use sampler::{sample_heightmap, HeightmapSampler, SampledTerrain, TerrainSummary};
pub use export::{quantize_u16, HeightmapFormat, TerrainExporter, TerrainManifest, TerrainSink};
pub use pipeline::object_to_terrain;
