//! Renderer configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::ResampleFilter;
use crate::error::{RenderError, Result};
use crate::geometry::{PaddingPolicy, Size};
use crate::presets::Preset;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    #[serde(default)]
    pub filter: ResampleFilter,
    /// RGBA fill for padded canvases
    #[serde(default = "default_background")]
    pub background: [u8; 4],
    #[serde(default)]
    pub padding_policy: PaddingPolicy,
    #[serde(default)]
    pub limits: RenderLimits,
    #[serde(default)]
    pub presets: Vec<Preset>,
}

fn default_background() -> [u8; 4] {
    [255, 255, 255, 0]
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            background: default_background(),
            padding_policy: PaddingPolicy::default(),
            limits: RenderLimits::default(),
            presets: vec![],
        }
    }
}

impl RendererConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLimits {
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    /// Decoded sources above this many pixels are refused
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
    /// Intermediate resampled images above this many pixels are refused
    #[serde(default = "default_max_resample_pixels")]
    pub max_resample_pixels: u64,
}

fn default_max_dimension() -> u32 {
    4096
}

fn default_max_source_pixels() -> u64 {
    100_000_000
}

fn default_max_resample_pixels() -> u64 {
    50_000_000
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            max_source_pixels: default_max_source_pixels(),
            max_resample_pixels: default_max_resample_pixels(),
        }
    }
}

impl RenderLimits {
    pub fn check_target(&self, target: Size) -> Result<()> {
        if target.width > self.max_width || target.height > self.max_height {
            return Err(RenderError::LimitExceeded(format!(
                "target {}x{} exceeds {}x{}",
                target.width, target.height, self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    pub fn check_source(&self, source: Size) -> Result<()> {
        if source.pixels() > self.max_source_pixels {
            return Err(RenderError::LimitExceeded(format!(
                "source {}x{} ({} pixels) exceeds {} pixels",
                source.width,
                source.height,
                source.pixels(),
                self.max_source_pixels
            )));
        }
        Ok(())
    }

    pub fn check_resample(&self, resample: Size) -> Result<()> {
        if resample.pixels() > self.max_resample_pixels {
            return Err(RenderError::LimitExceeded(format!(
                "resample {}x{} ({} pixels) exceeds {} pixels",
                resample.width,
                resample.height,
                resample.pixels(),
                self.max_resample_pixels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RendererConfig::from_json("{}").unwrap();
        assert_eq!(config.filter, ResampleFilter::Bicubic);
        assert_eq!(config.background, [255, 255, 255, 0]);
        assert_eq!(config.padding_policy, PaddingPolicy::Enlarge);
        assert_eq!(config.limits.max_width, 4096);
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = RendererConfig::from_json(
            r#"{"filter": "nearest", "paddingPolicy": "exact_box", "limits": {"maxWidth": 100}}"#,
        )
        .unwrap();
        assert_eq!(config.filter, ResampleFilter::Nearest);
        assert_eq!(config.padding_policy, PaddingPolicy::ExactBox);
        assert_eq!(config.limits.max_width, 100);
        assert_eq!(config.limits.max_height, 4096);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RendererConfig::from_json("{filter"),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RendererConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_limits() {
        let limits = RenderLimits::default();
        assert!(limits.check_target(Size::new(4096, 4096)).is_ok());
        assert!(limits.check_target(Size::new(4097, 1)).is_err());
        assert!(limits.check_source(Size::new(20_000, 20_000)).is_err());
    }

    #[test]
    fn test_resample_budget() {
        let limits = RenderLimits::default();
        assert!(limits.check_resample(Size::new(4096, 4096)).is_ok());
        assert!(matches!(
            limits.check_resample(Size::new(200, 4_000_000)),
            Err(RenderError::LimitExceeded(_))
        ));

        let config = RendererConfig::from_json(r#"{"limits": {"maxResamplePixels": 10}}"#).unwrap();
        assert!(config.limits.check_resample(Size::new(4, 3)).is_err());
    }
}
