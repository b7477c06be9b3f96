//! Normalization of decoded texture data into 8-bit RGBA.
//!
//! Decoded buffers keep each format's native channel layout; OpenGL-era
//! consumers could upload many of those directly, but everything else wants
//! one canonical layout. Sub-byte channels rescale with rounding so the
//! extremes map exactly (a 5-bit 31 becomes 255), luminance formats gain an
//! opaque alpha, and alpha-only formats gain a white color.

use super::TextureFormat;
use crate::error::DecodeError;

/// Rescale an `n`-bit channel value to 8 bits, rounding.
#[inline]
fn expand_bits(value: u16, bits: u32) -> u8 {
	let max = (1_u32 << bits) - 1;
	((value as u32 * 255 + max / 2) / max) as u8
}

pub(super) fn unpack(decoded: &[u8], width: u32, height: u32, format: TextureFormat) -> Result<Vec<u8>, DecodeError> {
	let pixels = width as usize * height as usize;
	debug_assert_eq!(decoded.len(), pixels * format.decoded_bytes_per_pixel());

	let mut rgba = vec![0_u8; pixels * 4];
	use TextureFormat::*;
	match format {
		Rgba8888 | Etc1A4 => rgba.copy_from_slice(&decoded[..pixels * 4]),
		Rgb888 | Etc1 => {
			for i in 0..pixels {
				rgba[i * 4..i * 4 + 3].copy_from_slice(&decoded[i * 3..i * 3 + 3]);
				rgba[i * 4 + 3] = 255;
			}
		}
		Rgba5551 => {
			for i in 0..pixels {
				let word = u16::from_le_bytes([decoded[i * 2], decoded[i * 2 + 1]]);
				rgba[i * 4] = expand_bits((word >> 11) & 0x1f, 5);
				rgba[i * 4 + 1] = expand_bits((word >> 6) & 0x1f, 5);
				rgba[i * 4 + 2] = expand_bits((word >> 1) & 0x1f, 5);
				rgba[i * 4 + 3] = expand_bits(word & 0x1, 1);
			}
		}
		Rgb565 => {
			for i in 0..pixels {
				let word = u16::from_le_bytes([decoded[i * 2], decoded[i * 2 + 1]]);
				rgba[i * 4] = expand_bits((word >> 11) & 0x1f, 5);
				rgba[i * 4 + 1] = expand_bits((word >> 5) & 0x3f, 6);
				rgba[i * 4 + 2] = expand_bits(word & 0x1f, 5);
				rgba[i * 4 + 3] = 255;
			}
		}
		Rgba4444 => {
			for i in 0..pixels {
				let word = u16::from_le_bytes([decoded[i * 2], decoded[i * 2 + 1]]);
				rgba[i * 4] = expand_bits(word >> 12, 4);
				rgba[i * 4 + 1] = expand_bits((word >> 8) & 0xf, 4);
				rgba[i * 4 + 2] = expand_bits((word >> 4) & 0xf, 4);
				rgba[i * 4 + 3] = expand_bits(word & 0xf, 4);
			}
		}
		La88 => {
			for i in 0..pixels {
				let (l, a) = (decoded[i * 2], decoded[i * 2 + 1]);
				rgba[i * 4..i * 4 + 4].copy_from_slice(&[l, l, l, a]);
			}
		}
		La44 => {
			// luminance in the high nibble
			for i in 0..pixels {
				let l = (decoded[i] >> 4) * 0x11;
				let a = (decoded[i] & 0xf) * 0x11;
				rgba[i * 4..i * 4 + 4].copy_from_slice(&[l, l, l, a]);
			}
		}
		L8 | L4 => {
			for i in 0..pixels {
				let l = decoded[i];
				rgba[i * 4..i * 4 + 4].copy_from_slice(&[l, l, l, 255]);
			}
		}
		A8 | A4 => {
			for i in 0..pixels {
				rgba[i * 4..i * 4 + 4].copy_from_slice(&[255, 255, 255, decoded[i]]);
			}
		}
		// HL8's channel semantics have no RGBA interpretation
		Hl8 => return Err(DecodeError::UnsupportedUnpack(format)),
	}
	Ok(rgba)
}
