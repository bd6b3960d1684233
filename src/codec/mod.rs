//! Codec capability
//!
//! The renderer never touches pixels directly; decode, resample, composite and
//! encode all go through a [`Codec`].

mod bilevel;
mod raster;

use image::imageops::FilterType;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::RasterFormat;
use crate::geometry::{Point, Rect, Size};

pub use bilevel::{decode_wbmp, encode_wbmp, encode_xbm};
pub use raster::RasterCodec;

/// Decoded RGBA8 pixels.
pub type PixelBuffer = RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug)]
pub struct Decoded {
    pub pixels: PixelBuffer,
    pub format: RasterFormat,
}

impl Decoded {
    pub fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }
}

/// Trait for raster codecs
///
/// Implementations must be deterministic: equal inputs give equal outputs.
pub trait Codec: Send + Sync {
    /// Decode raw bytes and detect their raster type
    fn decode(&self, bytes: &[u8]) -> Result<Decoded>;

    fn resample(&self, buffer: &PixelBuffer, size: Size, filter: ResampleFilter) -> PixelBuffer;

    /// Copy `src_window` of `src` onto `dst` at `dst_at`, replacing pixels.
    /// Anything falling outside either buffer is clipped.
    fn composite(
        &self,
        dst: PixelBuffer,
        src: &PixelBuffer,
        dst_at: Point,
        src_window: Rect,
    ) -> PixelBuffer;

    /// Encode to `format`, failing with `UnsupportedFormat` for types that
    /// cannot be written
    fn encode(&self, buffer: &PixelBuffer, format: RasterFormat) -> Result<Vec<u8>>;
}
