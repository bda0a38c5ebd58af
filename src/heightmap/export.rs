//! Terrain sinks and heightmap file export

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

use super::grid::HeightGrid;
use super::sampler::SampledTerrain;

/// Current version of the terrain manifest format
pub const MANIFEST_VERSION: u32 = 1;

/// Consumer of finished terrains
pub trait TerrainSink {
    fn accept(&mut self, terrain: SampledTerrain) -> Result<()>;
}

/// Collects terrains in memory
impl TerrainSink for Vec<SampledTerrain> {
    fn accept(&mut self, terrain: SampledTerrain) -> Result<()> {
        self.push(terrain);
        Ok(())
    }
}

/// On-disk heightmap encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightmapFormat {
    /// Headerless little-endian u16, one row after another
    #[default]
    Raw16,
    /// 16-bit grayscale PNG
    Png16,
}

impl HeightmapFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            HeightmapFormat::Raw16 => "r16",
            HeightmapFormat::Png16 => "png",
        }
    }
}

impl fmt::Display for HeightmapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightmapFormat::Raw16 => write!(f, "raw16"),
            HeightmapFormat::Png16 => write!(f, "png16"),
        }
    }
}

impl FromStr for HeightmapFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "raw16" | "r16" => Ok(HeightmapFormat::Raw16),
            "png" | "png16" => Ok(HeightmapFormat::Png16),
            other => Err(Error::InvalidParameter(format!(
                "unknown heightmap format '{}' (expected raw or png)",
                other
            ))),
        }
    }
}

/// Map a normalized height to the full u16 range, saturating outside [0, 1]
pub fn quantize_u16(height: f32) -> u16 {
    (height.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

/// Metadata written next to an exported heightmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainManifest {
    pub version: u32,
    pub name: String,
    pub resolution: usize,
    /// Terrain dimensions in world units
    pub size: [f32; 3],
    pub min_height: f32,
    pub max_height: f32,
    pub format: HeightmapFormat,
    /// Heightmap file name, relative to the manifest
    pub heightmap: String,
}

impl TerrainManifest {
    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Writes each accepted terrain as `<name>.<ext>` plus `<name>.json` into a directory
#[derive(Debug)]
pub struct TerrainExporter {
    dir: PathBuf,
    name: String,
    format: HeightmapFormat,
    written: Vec<PathBuf>,
}

impl TerrainExporter {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, format: HeightmapFormat) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            format,
            written: Vec::new(),
        }
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn heightmap_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, self.format.extension()))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }

    fn write_raw(grid: &HeightGrid, path: &Path) -> Result<()> {
        let bytes: Vec<u8> = grid
            .as_slice()
            .iter()
            .flat_map(|&h| quantize_u16(h).to_le_bytes())
            .collect();
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn write_png(grid: &HeightGrid, path: &Path) -> Result<()> {
        let side = u32::try_from(grid.resolution()).map_err(|_| {
            Error::InvalidParameter(format!("resolution {} too large for PNG", grid.resolution()))
        })?;
        let pixels: Vec<u16> = grid.as_slice().iter().map(|&h| quantize_u16(h)).collect();
        let image = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(side, side, pixels)
            .ok_or_else(|| Error::InvalidParameter("height buffer does not match resolution".into()))?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl TerrainSink for TerrainExporter {
    fn accept(&mut self, terrain: SampledTerrain) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let heightmap_path = self.heightmap_path();
        match self.format {
            HeightmapFormat::Raw16 => Self::write_raw(&terrain.heights, &heightmap_path)?,
            HeightmapFormat::Png16 => Self::write_png(&terrain.heights, &heightmap_path)?,
        }

        let (lo, hi) = terrain.heights.min_max();
        if hi > 1.0 {
            log::warn!("Heights up to {:.3} exceed 1.0 and were saturated in {}", hi, heightmap_path.display());
        }

        let summary = terrain.summary();
        let manifest = TerrainManifest {
            version: MANIFEST_VERSION,
            name: self.name.clone(),
            resolution: summary.resolution,
            size: summary.size.to_array(),
            min_height: lo,
            max_height: hi,
            format: self.format,
            heightmap: format!("{}.{}", self.name, self.format.extension()),
        };
        let manifest_path = self.manifest_path();
        manifest.save_sync(&manifest_path)?;

        log::info!("Wrote {} ({} format)", heightmap_path.display(), self.format);
        self.written.push(heightmap_path);
        self.written.push(manifest_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::math::Aabb;
    use tempfile::TempDir;

    fn terrain() -> SampledTerrain {
        let mut heights = HeightGrid::new(3);
        heights.set(0, 0, 1.0);
        heights.set(0, 1, 0.5);
        heights.set(2, 2, 1.4);
        SampledTerrain {
            heights,
            size: Vec3::new(10.0, 5.0, 10.0),
            working_bounds: Aabb::new(Vec3::ZERO, Vec3::new(10.0, 5.0, 10.0)),
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize_u16(0.0), 0);
        assert_eq!(quantize_u16(1.0), u16::MAX);
        assert_eq!(quantize_u16(0.5), 32768);
        assert_eq!(quantize_u16(-0.5), 0);
        assert_eq!(quantize_u16(3.0), u16::MAX);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("raw".parse::<HeightmapFormat>().unwrap(), HeightmapFormat::Raw16);
        assert_eq!("R16".parse::<HeightmapFormat>().unwrap(), HeightmapFormat::Raw16);
        assert_eq!("png".parse::<HeightmapFormat>().unwrap(), HeightmapFormat::Png16);
        assert!("tiff".parse::<HeightmapFormat>().is_err());
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<SampledTerrain> = Vec::new();
        sink.accept(terrain()).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_export_raw() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let mut exporter = TerrainExporter::new(temp_dir.path().join("out"), "island", HeightmapFormat::Raw16);
        exporter.accept(terrain()).unwrap();
        assert_eq!(exporter.written().len(), 2);

        let bytes = std::fs::read(exporter.heightmap_path()).unwrap();
        assert_eq!(bytes.len(), 9 * 2);
        assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), u16::MAX);
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), 32768);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 0);
        assert_eq!(u16::from_le_bytes([bytes[16], bytes[17]]), u16::MAX);

        let manifest = TerrainManifest::load_sync(&exporter.manifest_path()).unwrap();
        assert_eq!(manifest.name, "island");
        assert_eq!(manifest.resolution, 3);
        assert_eq!(manifest.size, [10.0, 5.0, 10.0]);
        assert_eq!(manifest.max_height, 1.4);
        assert_eq!(manifest.heightmap, "island.r16");
        assert_eq!(manifest.format, HeightmapFormat::Raw16);
    }

    #[test]
    fn test_export_png() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let mut exporter = TerrainExporter::new(temp_dir.path(), "island", HeightmapFormat::Png16);
        exporter.accept(terrain()).unwrap();

        let image = image::open(exporter.heightmap_path()).unwrap().into_luma16();
        assert_eq!(image.dimensions(), (3, 3));
        assert_eq!(image.get_pixel(0, 0).0[0], u16::MAX);
        assert_eq!(image.get_pixel(1, 0).0[0], 32768);
        assert_eq!(image.get_pixel(2, 2).0[0], u16::MAX);
        assert_eq!(image.get_pixel(1, 1).0[0], 0);
    }
}
