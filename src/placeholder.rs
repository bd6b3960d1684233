//! "Image not found" placeholder
//!
//! White canvas with a black X from corner to corner. Always PNG.

use image::Rgba;

use crate::codec::{Codec, PixelBuffer, RasterCodec};
use crate::error::{RenderError, Result};
use crate::format::RasterFormat;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Bresenham line, both endpoints inclusive
fn draw_line(buffer: &mut PixelBuffer, from: (i64, i64), to: (i64, i64), color: Rgba<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as u32) < buffer.width() && (y as u32) < buffer.height() {
            buffer.put_pixel(x as u32, y as u32, color);
        }
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

pub fn not_found_image(width: u32, height: u32) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(RenderError::geometry(format!(
            "placeholder must be positive, got {}x{}",
            width, height
        )));
    }

    let mut buffer = PixelBuffer::from_pixel(width, height, WHITE);
    let (w, h) = (width as i64 - 1, height as i64 - 1);
    draw_line(&mut buffer, (0, 0), (w, h), BLACK);
    draw_line(&mut buffer, (w, 0), (0, h), BLACK);
    Ok(buffer)
}

pub fn render_not_found_with(codec: &impl Codec, width: u32, height: u32) -> Result<Vec<u8>> {
    let buffer = not_found_image(width, height)?;
    codec.encode(&buffer, RasterFormat::Png)
}

/// PNG bytes of the placeholder, via the default codec
pub fn render_not_found(width: u32, height: u32) -> Result<Vec<u8>> {
    render_not_found_with(&RasterCodec::new(), width, height)
}
