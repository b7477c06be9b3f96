//! Decoding of raw tiled texture data into each format's native layout.
//!
//! Every format stores its pixels through the 8x8-tile addressing in
//! [`super::tile`]; what varies per family is the per-texel payload: byte
//! order, packed 16-bit words, nibbles, or ETC1 blocks. The output here is
//! row-major from the top-left corner but still in the format's own channel
//! layout; [`super::unpack`] normalizes it to RGBA8.

use std::io;

use super::{etc1, tile, TextureFormat};
use crate::error::DecodeError;

pub(super) fn decode(raw: &[u8], width: u32, height: u32, format: TextureFormat) -> Result<Vec<u8>, DecodeError> {
	if width == 0 || height == 0 || width % 8 != 0 || height % 8 != 0 {
		return Err(DecodeError::InvalidDimensions { width, height });
	}

	let (w, h) = (width as usize, height as usize);
	if raw.len() < w * h * format.encoded_bits_per_pixel() / 8 {
		return Err(DecodeError::TruncatedData(io::ErrorKind::UnexpectedEof.into()));
	}

	use TextureFormat::*;
	let decoded = match format {
		// direct formats store their texel bytes channel-reversed
		Rgba8888 => detile(raw, w, h, 4, true),
		Rgb888 => detile(raw, w, h, 3, true),
		// 16-bit packed words keep their byte order
		Rgba5551 | Rgb565 | Rgba4444 => detile(raw, w, h, 2, false),
		// the luminance-alpha family swaps its two bytes
		La88 | Hl8 => detile(raw, w, h, 2, true),
		L8 | A8 | La44 => detile(raw, w, h, 1, false),
		L4 | A4 => detile_nibbles(raw, w, h),
		Etc1 => detile_etc1(raw, w, h, false),
		Etc1A4 => detile_etc1(raw, w, h, true),
	};
	Ok(decoded)
}

/// De-swizzle a direct format of `bpp` bytes per texel, optionally reversing
/// each texel's bytes.
fn detile(raw: &[u8], w: usize, h: usize, bpp: usize, reversed: bool) -> Vec<u8> {
	let mut decoded = vec![0_u8; w * h * bpp];
	for y in 0..h {
		for x in 0..w {
			let entry = tile::tile_index(x, y, w) * 64 + tile::TILE_ORDER[(y % 8) * 8 + x % 8];
			let src = entry * bpp;
			let dst = (y * w + x) * bpp;
			for k in 0..bpp {
				decoded[dst + k] = if reversed { raw[src + bpp - 1 - k] } else { raw[src + k] };
			}
		}
	}
	decoded
}

/// De-swizzle a 4-bit format, expanding each nibble to a byte by replication.
/// Texels at even storage offsets sit in the low nibble.
fn detile_nibbles(raw: &[u8], w: usize, h: usize) -> Vec<u8> {
	let mut decoded = vec![0_u8; w * h];
	for y in 0..h {
		for x in 0..w {
			let entry = tile::tile_index(x, y, w) * 64 + tile::TILE_ORDER[(y % 8) * 8 + x % 8];
			let byte = raw[entry / 2];
			let value = if entry % 2 == 0 { byte & 0xf } else { byte >> 4 };
			decoded[y * w + x] = value * 0x11;
		}
	}
	decoded
}

/// Decompress an ETC1 texture, with or without the interleaved 4-bit alpha
/// plane. Output is row-major RGB8, or RGBA8 when the alpha plane is present.
fn detile_etc1(raw: &[u8], w: usize, h: usize, with_alpha: bool) -> Vec<u8> {
	// each 4x4 block is 8 bytes of ETC1 data; the alpha variant prefixes
	// every block with 8 bytes of 4-bit alpha
	let block_size = if with_alpha { 16 } else { 8 };

	let mut rgb = vec![0_u8; w * h * 3];
	let mut alpha = vec![0_u8; if with_alpha { w * h } else { 0 }];
	for by in (0..h).step_by(4) {
		for bx in (0..w).step_by(4) {
			let block = tile::tile_index(bx, by, w) * 4 + tile::subblock_index(bx % 8, by % 8);
			let offset = block * block_size;

			// the 64-bit block is stored little-endian; the standard's two
			// big-endian words are its high and low halves
			let data = &raw[offset + block_size - 8..offset + block_size];
			let word = u64::from_le_bytes(data.try_into().unwrap());
			etc1::decompress_block((word >> 32) as u32, word as u32, &mut rgb, w, bx, by);

			if with_alpha {
				// the alpha plane is column-major within the block, low
				// nibble first
				for px in 0..4 {
					for py in 0..4 {
						let byte = raw[offset + px * 2 + py / 2];
						let value = if py % 2 == 0 { byte & 0xf } else { byte >> 4 };
						alpha[(by + py) * w + bx + px] = value * 0x11;
					}
				}
			}
		}
	}

	if !with_alpha {
		return rgb;
	}

	let mut decoded = vec![0_u8; w * h * 4];
	for i in 0..w * h {
		decoded[i * 4..i * 4 + 3].copy_from_slice(&rgb[i * 3..i * 3 + 3]);
		decoded[i * 4 + 3] = alpha[i];
	}
	decoded
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Swizzle a marker value per texel into tile storage order, the inverse
	/// of what the decoder performs.
	fn swizzled_markers(w: usize, h: usize) -> Vec<u8> {
		let mut raw = vec![0_u8; w * h];
		for y in 0..h {
			for x in 0..w {
				let entry = tile::tile_index(x, y, w) * 64 + tile::TILE_ORDER[(y % 8) * 8 + x % 8];
				raw[entry] = (y * w + x) as u8;
			}
		}
		raw
	}

	#[test]
	fn l8_markers_recover_raster_order() {
		let raw = swizzled_markers(16, 8);
		let decoded = decode(&raw, 16, 8, TextureFormat::L8).unwrap();
		for (i, &value) in decoded.iter().enumerate() {
			assert_eq!(value as usize, i);
		}
	}

	#[test]
	fn rgba8888_reverses_texel_bytes() {
		// one tile, texel markers stored as (a, b, g, r)
		let mut raw = vec![0_u8; 8 * 8 * 4];
		for y in 0..8 {
			for x in 0..8 {
				let entry = tile::TILE_ORDER[y * 8 + x];
				let marker = (y * 8 + x) as u8;
				raw[entry * 4..entry * 4 + 4].copy_from_slice(&[4, 3, 2, marker]);
			}
		}

		let decoded = decode(&raw, 8, 8, TextureFormat::Rgba8888).unwrap();
		for i in 0..64 {
			assert_eq!(decoded[i * 4..i * 4 + 4], [i as u8, 2, 3, 4]);
		}
	}

	#[test]
	fn la88_swaps_bytes() {
		let mut raw = vec![0_u8; 8 * 8 * 2];
		for entry in 0..64 {
			raw[entry * 2] = 0x11; // alpha stored first
			raw[entry * 2 + 1] = 0x22;
		}

		let decoded = decode(&raw, 8, 8, TextureFormat::La88).unwrap();
		for i in 0..64 {
			assert_eq!(decoded[i * 2..i * 2 + 2], [0x22, 0x11]);
		}
	}

	#[test]
	fn rgb565_keeps_word_byte_order() {
		let mut raw = vec![0_u8; 8 * 8 * 2];
		for entry in 0..64 {
			raw[entry * 2] = 0xcd;
			raw[entry * 2 + 1] = 0xab;
		}

		let decoded = decode(&raw, 8, 8, TextureFormat::Rgb565).unwrap();
		assert_eq!(decoded[..2], [0xcd, 0xab]);
	}

	#[test]
	fn l4_nibbles_expand_by_replication() {
		// texel at morton offset 0 in the low nibble, offset 1 in the high
		let mut raw = vec![0_u8; 8 * 8 / 2];
		raw[0] = 0xf5;

		let decoded = decode(&raw, 8, 8, TextureFormat::L4).unwrap();
		// morton offsets 0 and 1 are raster positions (0, 0) and (1, 0)
		assert_eq!(decoded[0], 0x55);
		assert_eq!(decoded[1], 0xff);
		assert_eq!(decoded[2], 0x00);
	}

	#[test]
	fn etc1_uniform_tile() {
		// four identical sub-blocks: individual mode, bases 0x8/0x4,
		// tables 0, all indices +2
		let word = (0x8484_8400_u64 << 32) | 0;
		let mut raw = vec![0_u8; 8 * 8 / 2];
		for block in 0..4 {
			raw[block * 8..block * 8 + 8].copy_from_slice(&word.to_le_bytes());
		}

		let decoded = decode(&raw, 8, 8, TextureFormat::Etc1).unwrap();
		for y in 0..8 {
			for x in 0..8 {
				let expected = if x % 4 < 2 { 138 } else { 70 };
				let offset = (y * 8 + x) * 3;
				assert_eq!(decoded[offset..offset + 3], [expected; 3], "({x}, {y})");
			}
		}
	}

	#[test]
	fn etc1_a4_interleaves_alpha() {
		let word = (0x8484_8400_u64 << 32) | 0;
		let mut raw = vec![0_u8; 8 * 8];
		for block in 0..4 {
			// 8 bytes of alpha nibbles (all 0xa), then the color block
			raw[block * 16..block * 16 + 8].copy_from_slice(&[0xaa; 8]);
			raw[block * 16 + 8..block * 16 + 16].copy_from_slice(&word.to_le_bytes());
		}

		let decoded = decode(&raw, 8, 8, TextureFormat::Etc1A4).unwrap();
		for i in 0..64 {
			assert_eq!(decoded[i * 4 + 3], 0xaa);
		}
		assert_eq!(decoded[..3], [138; 3]);
	}

	#[test]
	fn non_multiple_of_8_dimensions_are_rejected() {
		let raw = vec![0_u8; 4 * 4 * 4];
		assert!(matches!(
			decode(&raw, 4, 4, TextureFormat::Rgba8888),
			Err(DecodeError::InvalidDimensions { width: 4, height: 4 })
		));
		assert!(matches!(
			decode(&raw, 0, 8, TextureFormat::L8),
			Err(DecodeError::InvalidDimensions { .. })
		));
	}

	#[test]
	fn short_input_is_truncated_data() {
		let raw = vec![0_u8; 8 * 8 * 4 - 1];
		assert!(matches!(
			decode(&raw, 8, 8, TextureFormat::Rgba8888),
			Err(DecodeError::TruncatedData(_))
		));
	}
}
