//! Raster formats
//!
//! Output keeps the source's raster type unless a target overrides it. Only the
//! GD-era set (GIF, JPEG, PNG, WBMP, XBM) is writable; other decodable types
//! hit the unsupported arm at encode time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Gif,
    Jpeg,
    Png,
    Wbmp,
    Xbm,
    Bmp,
    Tiff,
    WebP,
    Ico,
}

impl RasterFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            RasterFormat::Gif => "image/gif",
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
            RasterFormat::Wbmp => "image/vnd.wap.wbmp",
            RasterFormat::Xbm => "image/xbm",
            RasterFormat::Bmp => "image/bmp",
            RasterFormat::Tiff => "image/tiff",
            RasterFormat::WebP => "image/webp",
            RasterFormat::Ico => "image/vnd.microsoft.icon",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Gif => "gif",
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
            RasterFormat::Wbmp => "wbmp",
            RasterFormat::Xbm => "xbm",
            RasterFormat::Bmp => "bmp",
            RasterFormat::Tiff => "tiff",
            RasterFormat::WebP => "webp",
            RasterFormat::Ico => "ico",
        }
    }

    pub fn is_writable(self) -> bool {
        matches!(
            self,
            RasterFormat::Gif
                | RasterFormat::Jpeg
                | RasterFormat::Png
                | RasterFormat::Wbmp
                | RasterFormat::Xbm
        )
    }

    pub fn supports_transparency(self) -> bool {
        matches!(self, RasterFormat::Gif | RasterFormat::Png)
    }

    /// Map a format detected by the `image` crate. `None` for types this
    /// renderer never decodes.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Gif => Some(RasterFormat::Gif),
            image::ImageFormat::Jpeg => Some(RasterFormat::Jpeg),
            image::ImageFormat::Png => Some(RasterFormat::Png),
            image::ImageFormat::Bmp => Some(RasterFormat::Bmp),
            image::ImageFormat::Tiff => Some(RasterFormat::Tiff),
            image::ImageFormat::WebP => Some(RasterFormat::WebP),
            image::ImageFormat::Ico => Some(RasterFormat::Ico),
            _ => None,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for RasterFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gif" => Ok(RasterFormat::Gif),
            "jpg" | "jpeg" => Ok(RasterFormat::Jpeg),
            "png" => Ok(RasterFormat::Png),
            "wbmp" => Ok(RasterFormat::Wbmp),
            "xbm" => Ok(RasterFormat::Xbm),
            "bmp" => Ok(RasterFormat::Bmp),
            "tif" | "tiff" => Ok(RasterFormat::Tiff),
            "webp" => Ok(RasterFormat::WebP),
            "ico" => Ok(RasterFormat::Ico),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_set() {
        let writable: Vec<_> = [
            RasterFormat::Gif,
            RasterFormat::Jpeg,
            RasterFormat::Png,
            RasterFormat::Wbmp,
            RasterFormat::Xbm,
            RasterFormat::Bmp,
            RasterFormat::Tiff,
            RasterFormat::WebP,
            RasterFormat::Ico,
        ]
        .into_iter()
        .filter(|f| f.is_writable())
        .collect();
        assert_eq!(writable.len(), 5);
        assert!(!RasterFormat::Bmp.is_writable());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("JPG".parse::<RasterFormat>().unwrap(), RasterFormat::Jpeg);
        assert_eq!("tif".parse::<RasterFormat>().unwrap(), RasterFormat::Tiff);
        assert!("svg".parse::<RasterFormat>().is_err());
    }

    #[test]
    fn test_from_image_format() {
        assert_eq!(
            RasterFormat::from_image_format(image::ImageFormat::Png),
            Some(RasterFormat::Png)
        );
        assert_eq!(RasterFormat::from_image_format(image::ImageFormat::Hdr), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RasterFormat::WebP).unwrap();
        assert_eq!(json, r#""webp""#);
    }
}
