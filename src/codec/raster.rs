//! Default codec on the `image` crate

use image::{imageops, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

use super::{bilevel, Codec, Decoded, PixelBuffer, ResampleFilter};
use crate::error::{RenderError, Result};
use crate::format::RasterFormat;
use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Decoded> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RenderError::Decode(e.to_string()))?;

        // WBMP has no magic number, so it is only tried once nothing else matched
        let Some(format) = reader.format() else {
            let pixels = bilevel::decode_wbmp(bytes)
                .ok_or_else(|| RenderError::Decode("unrecognized image data".into()))?;
            return Ok(Decoded {
                pixels,
                format: RasterFormat::Wbmp,
            });
        };
        let format = RasterFormat::from_image_format(format)
            .ok_or_else(|| RenderError::Decode(format!("unsupported source type {:?}", format)))?;

        let image = reader
            .decode()
            .map_err(|e| RenderError::Decode(e.to_string()))?;

        Ok(Decoded {
            pixels: image.to_rgba8(),
            format,
        })
    }

    fn resample(&self, buffer: &PixelBuffer, size: Size, filter: ResampleFilter) -> PixelBuffer {
        if buffer.width() == size.width && buffer.height() == size.height {
            return buffer.clone();
        }
        imageops::resize(buffer, size.width, size.height, filter.filter_type())
    }

    fn composite(
        &self,
        mut dst: PixelBuffer,
        src: &PixelBuffer,
        dst_at: Point,
        src_window: Rect,
    ) -> PixelBuffer {
        // crop_imm clips to src, replace clips to dst
        let window = imageops::crop_imm(
            src,
            src_window.x,
            src_window.y,
            src_window.width,
            src_window.height,
        )
        .to_image();
        imageops::replace(&mut dst, &window, dst_at.x as i64, dst_at.y as i64);
        dst
    }

    fn encode(&self, buffer: &PixelBuffer, format: RasterFormat) -> Result<Vec<u8>> {
        let image_format = match format {
            RasterFormat::Gif => ImageFormat::Gif,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Wbmp => return Ok(bilevel::encode_wbmp(buffer)),
            RasterFormat::Xbm => return Ok(bilevel::encode_xbm(buffer, "image")),
            RasterFormat::Bmp | RasterFormat::Tiff | RasterFormat::WebP | RasterFormat::Ico => {
                return Err(RenderError::UnsupportedFormat(format.mime_type().to_string()));
            }
        };

        let image = DynamicImage::ImageRgba8(buffer.clone());
        // JPEG has no alpha channel
        let image = if format.supports_transparency() {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let mut output = Cursor::new(Vec::new());
        image
            .write_to(&mut output, image_format)
            .map_err(|e| RenderError::encode(format.extension(), e))?;
        Ok(output.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn test_png_round_trip_detects_format() {
        let codec = RasterCodec::new();
        let bytes = codec.encode(&checker(3, 2), RasterFormat::Png).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.format, RasterFormat::Png);
        assert_eq!(decoded.size(), Size::new(3, 2));
    }

    #[test]
    fn test_jpeg_encode_drops_alpha() {
        let codec = RasterCodec::new();
        let bytes = codec.encode(&checker(8, 8), RasterFormat::Jpeg).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_gif_encode() {
        let codec = RasterCodec::new();
        let bytes = codec.encode(&checker(4, 4), RasterFormat::Gif).unwrap();
        assert_eq!(&bytes[0..3], b"GIF");
    }

    #[test]
    fn test_unsupported_output_names_mime() {
        let codec = RasterCodec::new();
        let err = codec.encode(&checker(2, 2), RasterFormat::Bmp).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported image type: image/bmp");
    }

    #[test]
    fn test_wbmp_round_trip_detects_format() {
        let codec = RasterCodec::new();
        let bytes = codec.encode(&checker(10, 3), RasterFormat::Wbmp).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.format, RasterFormat::Wbmp);
        assert_eq!(decoded.size(), Size::new(10, 3));
        assert_eq!(codec.encode(&decoded.pixels, RasterFormat::Wbmp).unwrap(), bytes);
    }

    #[test]
    fn test_decode_truncated_wbmp() {
        let codec = RasterCodec::new();
        assert!(matches!(
            codec.decode(&[0, 0, 16, 2, 0xFF]),
            Err(RenderError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_garbage() {
        let codec = RasterCodec::new();
        assert!(matches!(
            codec.decode(&[0, 1, 2, 3, 4, 5]),
            Err(RenderError::Decode(_))
        ));
    }

    #[test]
    fn test_resample_size() {
        let codec = RasterCodec::new();
        let out = codec.resample(&checker(10, 10), Size::new(4, 7), ResampleFilter::Bicubic);
        assert_eq!(out.dimensions(), (4, 7));
    }

    #[test]
    fn test_composite_clips_window() {
        let codec = RasterCodec::new();
        let dst = PixelBuffer::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        let src = PixelBuffer::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let window = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let out = codec.composite(dst, &src, Point { x: 3, y: 1 }, window);
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(3, 1), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(3, 2), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(2, 1), &Rgba([255, 255, 255, 0]));
        assert_eq!(out.get_pixel(3, 3), &Rgba([255, 255, 255, 0]));
    }
}
