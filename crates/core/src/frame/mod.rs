//! Raw sample to canonical image reconstruction.
//!
//! Pulled media samples arrive as bare byte buffers with the geometry and
//! pixel format declared by the upstream capabilities. [`decode`] checks the
//! buffer against that declaration and converts it to 3-channel interleaved
//! BGR, the layout the compositor draws.
//!
//! | Format | Expected length | Conversion |
//! |--------|-----------------|------------|
//! | [`Rgb24`](PixelFormatTag::Rgb24) | `w*h*3` | R/B swap |
//! | [`Gray8`](PixelFormatTag::Gray8) | `w*h` | replicate to 3 channels |
//! | [`Nv12Padded`](PixelFormatTag::Nv12Padded) | `pw*ph*3/2` | crop + BT.601 YUV→BGR |
//!
//! A buffer that does not match is an error, never a blank frame; whether
//! to show a placeholder is the caller's call.

pub mod caps;

use crate::error::DecodeError;

pub use caps::SampleCaps;

/// Pixel layout of a raw sample, as declared by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormatTag {
    /// Packed 8-bit R, G, B.
    Rgb24,
    /// NV12 stored in a buffer padded to `padded_width` x `padded_height`
    /// (hardware decoders align to 16 or 32 lines). The visible picture is
    /// the top-left `width` x `height` region.
    Nv12Padded { padded_width: u32, padded_height: u32 },
    /// 8-bit luma only.
    Gray8,
}

/// A decoded picture in interleaved BGR order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major, B G R per pixel.
    pub bytes: Vec<u8>,
}

impl DecodedFrame {
    /// BGR triple at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.bytes.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }
}

/// Reconstruct a BGR frame from a raw buffer.
pub fn decode(
    buffer: &[u8],
    width: u32,
    height: u32,
    format: PixelFormatTag,
) -> Result<DecodedFrame, DecodeError> {
    let pixels = pixel_count(width, height)?;
    let bytes = match format {
        PixelFormatTag::Rgb24 => rgb_to_bgr(buffer, expected_len(pixels, 3, width, height)?)?,
        PixelFormatTag::Gray8 => gray_to_bgr(buffer, pixels)?,
        PixelFormatTag::Nv12Padded {
            padded_width,
            padded_height,
        } => nv12_to_bgr(buffer, width, height, padded_width, padded_height)?,
    };

    Ok(DecodedFrame {
        width,
        height,
        bytes,
    })
}

fn pixel_count(width: u32, height: u32) -> Result<usize, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width,
            height,
            reason: "zero-sized frame",
        });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(DecodeError::InvalidDimensions {
            width,
            height,
            reason: "dimensions overflow",
        })
}

fn expected_len(
    pixels: usize,
    bytes_per_pixel: usize,
    width: u32,
    height: u32,
) -> Result<usize, DecodeError> {
    pixels
        .checked_mul(bytes_per_pixel)
        .ok_or(DecodeError::InvalidDimensions {
            width,
            height,
            reason: "dimensions overflow",
        })
}

fn check_len(buffer: &[u8], expected: usize) -> Result<(), DecodeError> {
    if buffer.len() != expected {
        tracing::debug!(expected, actual = buffer.len(), "raw frame size mismatch");
        return Err(DecodeError::SizeMismatch {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}

fn rgb_to_bgr(buffer: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    check_len(buffer, expected)?;
    let mut out = Vec::with_capacity(expected);
    for px in buffer.chunks_exact(3) {
        out.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    Ok(out)
}

fn gray_to_bgr(buffer: &[u8], pixels: usize) -> Result<Vec<u8>, DecodeError> {
    check_len(buffer, pixels)?;
    let mut out = Vec::with_capacity(pixels * 3);
    for &g in buffer {
        out.extend_from_slice(&[g, g, g]);
    }
    Ok(out)
}

fn nv12_to_bgr(
    buffer: &[u8],
    width: u32,
    height: u32,
    padded_width: u32,
    padded_height: u32,
) -> Result<Vec<u8>, DecodeError> {
    let invalid = |reason: &'static str| DecodeError::InvalidDimensions {
        width,
        height,
        reason,
    };
    if width > padded_width || height > padded_height {
        return Err(invalid("visible region exceeds padded buffer"));
    }
    if padded_width % 2 != 0 || padded_height % 2 != 0 {
        return Err(invalid("NV12 padded dimensions must be even"));
    }

    let stride = padded_width as usize;
    let y_plane = pixel_count(padded_width, padded_height)?;
    let expected = y_plane
        .checked_add(y_plane / 2)
        .ok_or(invalid("dimensions overflow"))?;
    check_len(buffer, expected)?;

    let (luma, chroma) = buffer.split_at(y_plane);
    let (w, h) = (width as usize, height as usize);
    let mut out = Vec::with_capacity(w * h * 3);

    for row in 0..h {
        let y_row = &luma[row * stride..row * stride + w];
        let uv_row = &chroma[(row / 2) * stride..(row / 2) * stride + stride];
        for (col, &y) in y_row.iter().enumerate() {
            let u = uv_row[col & !1];
            let v = uv_row[(col & !1) + 1];
            out.extend_from_slice(&yuv_to_bgr(y, u, v));
        }
    }

    Ok(out)
}

/// BT.601 limited-range YUV to BGR.
fn yuv_to_bgr(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = 1.164_f32 * (y as f32 - 16.0);
    let d = u as f32 - 128.0;
    let e = v as f32 - 128.0;

    let r = c + 1.596 * e;
    let g = c - 0.391 * d - 0.813 * e;
    let b = c + 2.018 * d;

    [clamp_to_u8(b), clamp_to_u8(g), clamp_to_u8(r)]
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
