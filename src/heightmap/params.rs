//! Sampling parameters

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

/// How sampled heights are fitted into the terrain's vertical range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    /// Scale heights by `size.y / (size.y + padding.y)` so the mesh sits at
    /// the bottom of a taller terrain.
    #[default]
    BottomUp,
    /// Use heights as sampled, only shifted and floored at zero.
    TopDown,
}

impl fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationMode::BottomUp => write!(f, "bottom-up"),
            NormalizationMode::TopDown => write!(f, "top-down"),
        }
    }
}

impl FromStr for NormalizationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "bottom-up" | "bottomup" => Ok(NormalizationMode::BottomUp),
            "top-down" | "topdown" => Ok(NormalizationMode::TopDown),
            other => Err(Error::InvalidParameter(format!(
                "unknown normalization mode '{}' (expected bottom-up or top-down)",
                other
            ))),
        }
    }
}

/// Parameters for one sampling run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleParams {
    /// Grid is `resolution x resolution`
    pub resolution: usize,
    /// Added to the source bounds size. X/Z grow the footprint, Y adds headroom.
    pub padding: Vec3,
    /// Added to every normalized height before the zero floor
    pub vertical_shift: f32,
    pub mode: NormalizationMode,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            padding: Vec3::ZERO,
            vertical_shift: 0.0,
            mode: NormalizationMode::BottomUp,
        }
    }
}

impl SampleParams {
    pub const DEFAULT_RESOLUTION: usize = 512;

    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    pub fn with_padding(mut self, padding: Vec3) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_vertical_shift(mut self, shift: f32) -> Self {
        self.vertical_shift = shift;
        self
    }

    pub fn with_mode(mut self, mode: NormalizationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject parameters that make the grid meaningless
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidParameter("resolution must be at least 1".into()));
        }
        self.resolution.checked_mul(self.resolution).ok_or_else(|| {
            Error::InvalidParameter(format!("resolution {} overflows the sample count", self.resolution))
        })?;
        if !self.padding.is_finite() {
            return Err(Error::InvalidParameter(format!("padding {} is not finite", self.padding)));
        }
        if !self.vertical_shift.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "vertical shift {} is not finite",
                self.vertical_shift
            )));
        }
        Ok(())
    }

    /// Ratio of the source height to the padded terrain height
    pub fn size_factor(&self, source_height: f32) -> f32 {
        source_height / (source_height + self.padding.y)
    }

    /// Turn a hit's relative height (0 at the bottom of the source bounds,
    /// 1 at the top) into the stored heightmap value.
    pub fn normalize(&self, relative_height: f32, size_factor: f32) -> f32 {
        let mut height = relative_height + self.vertical_shift;
        if self.mode == NormalizationMode::BottomUp {
            height *= size_factor;
        }
        // Floor only: shifted heights may exceed 1
        if height < 0.0 { 0.0 } else { height }
    }

    /// Load from a JSON file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        Ok(params)
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let params = SampleParams::default();
        assert_eq!(params.resolution, 512);
        assert_eq!(params.padding, Vec3::ZERO);
        assert_eq!(params.vertical_shift, 0.0);
        assert_eq!(params.mode, NormalizationMode::BottomUp);
    }

    #[test]
    fn test_validate() {
        assert!(SampleParams::new(1).validate().is_ok());
        assert!(matches!(
            SampleParams::new(0).validate(),
            Err(Error::InvalidParameter(_))
        ));
        assert!(SampleParams::new(4).with_vertical_shift(f32::NAN).validate().is_err());
        assert!(SampleParams::new(4)
            .with_padding(Vec3::new(0.0, f32::INFINITY, 0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_overflowing_resolution() {
        assert!(matches!(
            SampleParams::new(usize::MAX / 2).validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_normalize_modes() {
        let top_down = SampleParams::new(4).with_mode(NormalizationMode::TopDown);
        assert_eq!(top_down.normalize(0.5, 0.25), 0.5);

        let bottom_up = SampleParams::new(4).with_mode(NormalizationMode::BottomUp);
        assert_eq!(bottom_up.normalize(0.5, 0.5), 0.25);
    }

    #[test]
    fn test_normalize_floor_without_ceiling() {
        let params = SampleParams::new(4)
            .with_mode(NormalizationMode::TopDown)
            .with_vertical_shift(-0.75);
        assert_eq!(params.normalize(0.5, 1.0), 0.0);

        let params = params.with_vertical_shift(1.0);
        assert_eq!(params.normalize(0.5, 1.0), 1.5);
    }

    #[test]
    fn test_shift_applied_before_scale() {
        let params = SampleParams::new(4).with_vertical_shift(0.5);
        // (0.25 + 0.5) * 0.5
        assert_eq!(params.normalize(0.25, 0.5), 0.375);
    }

    #[test]
    fn test_size_factor() {
        let params = SampleParams::new(4).with_padding(Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(params.size_factor(2.0), 0.25);
        assert_eq!(SampleParams::new(4).size_factor(3.0), 1.0);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("bottom-up".parse::<NormalizationMode>().unwrap(), NormalizationMode::BottomUp);
        assert_eq!("Top_Down".parse::<NormalizationMode>().unwrap(), NormalizationMode::TopDown);
        assert_eq!("topdown".parse::<NormalizationMode>().unwrap(), NormalizationMode::TopDown);
        assert!("sideways".parse::<NormalizationMode>().is_err());
        assert_eq!(NormalizationMode::TopDown.to_string(), "top-down");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: SampleParams = serde_json::from_str(r#"{ "resolution": 33, "mode": "top-down" }"#).unwrap();
        assert_eq!(params.resolution, 33);
        assert_eq!(params.mode, NormalizationMode::TopDown);
        assert_eq!(params.padding, Vec3::ZERO);
    }

    #[test]
    fn test_persistence() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("params.json");

        let params = SampleParams::new(129)
            .with_padding(Vec3::new(10.0, 5.0, 10.0))
            .with_vertical_shift(-0.25)
            .with_mode(NormalizationMode::TopDown);
        params.save_sync(&path).unwrap();

        let loaded = SampleParams::load_sync(&path).unwrap();
        assert_eq!(loaded, params);
    }
}
