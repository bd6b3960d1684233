//! WBMP and XBM codecs
//!
//! Both are one bit per pixel. A pixel is dark when it is mostly opaque and its
//! luma is below 128; transparent pixels are light.

use image::Rgba;

use super::PixelBuffer;

const WBMP_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WBMP_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn is_dark(pixel: &image::Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    if a < 128 {
        return false;
    }
    // ITU-R 601 luma, integer weights summing to 1000
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    luma < 128
}

/// WAP multi-byte integer: 7 bits per byte, high bit set on all but the last.
fn push_multibyte(out: &mut Vec<u8>, mut value: u32) {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.into_iter().rev());
}

/// Read a WAP multi-byte integer, returning it and the bytes consumed.
fn read_multibyte(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        // a u32 never needs more than five groups
        if i == 5 || value > (u32::MAX >> 7) {
            return None;
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Decode WBMP type 0.
///
/// Returns `None` unless the bytes are exactly one well-formed type-0 image:
/// no extension headers, non-zero dimensions and a data section of exactly
/// `height * ceil(width / 8)` bytes.
pub fn decode_wbmp(bytes: &[u8]) -> Option<PixelBuffer> {
    let [0x00, 0x00, rest @ ..] = bytes else {
        return None;
    };
    let (width, used) = read_multibyte(rest)?;
    let rest = &rest[used..];
    let (height, used) = read_multibyte(rest)?;
    let data = &rest[used..];
    if width == 0 || height == 0 {
        return None;
    }

    let row_bytes = (width as usize).div_ceil(8);
    if row_bytes.checked_mul(height as usize)? != data.len() {
        return None;
    }

    Some(PixelBuffer::from_fn(width, height, |x, y| {
        let byte = data[y as usize * row_bytes + x as usize / 8];
        if byte & (0x80 >> (x % 8)) != 0 {
            WBMP_WHITE
        } else {
            WBMP_BLACK
        }
    }))
}

/// Encode as WBMP type 0. Bits are MSB first, 1 is white.
pub fn encode_wbmp(buffer: &PixelBuffer) -> Vec<u8> {
    let (width, height) = buffer.dimensions();
    let row_bytes = (width as usize).div_ceil(8);

    let mut out = vec![0x00, 0x00];
    push_multibyte(&mut out, width);
    push_multibyte(&mut out, height);

    for y in 0..height {
        let mut row = vec![0u8; row_bytes];
        for x in 0..width {
            if !is_dark(buffer.get_pixel(x, y)) {
                row[x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&row);
    }
    out
}

/// Encode as X11 bitmap source. Bits are LSB first, 1 is black.
pub fn encode_xbm(buffer: &PixelBuffer, name: &str) -> Vec<u8> {
    let (width, height) = buffer.dimensions();
    let row_bytes = (width as usize).div_ceil(8);
    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let mut bytes = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height {
        let mut row = vec![0u8; row_bytes];
        for x in 0..width {
            if is_dark(buffer.get_pixel(x, y)) {
                row[x as usize / 8] |= 1 << (x % 8);
            }
        }
        bytes.extend_from_slice(&row);
    }

    let mut out = format!(
        "#define {name}_width {width}\n#define {name}_height {height}\n\
         static unsigned char {name}_bits[] = {{"
    );
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if i % 12 == 0 {
            out.push_str("\n  ");
        } else {
            out.push(' ');
        }
        out.push_str(&format!("0x{:02x}", byte));
    }
    out.push_str("};\n");
    out.into_bytes()
}
