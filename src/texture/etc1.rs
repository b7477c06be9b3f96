//! ETC1 block decompression.
//!
//! Port of the block decode described by the published Ericsson Texture
//! Compression (ETC1) specification: each 4x4 block carries two base colors
//! (individually at 4 bits per channel, or differentially at 5+3 bits), two
//! modifier-table codewords, and a flip bit selecting whether the two
//! sub-blocks are side by side or stacked. Per-pixel 2-bit indices pick a
//! luminance modifier applied to the sub-block's base color.

/// Luminance modifier magnitudes, indexed by table codeword. The low bit of
/// a pixel's index selects the magnitude and the high bit negates it.
const MODIFIER_TABLE: [[i32; 2]; 8] = [
	[2, 8],
	[5, 17],
	[9, 29],
	[13, 42],
	[18, 60],
	[24, 80],
	[33, 106],
	[47, 183],
];

/// Widen a 4-bit channel to 8 bits by replication.
#[inline]
fn extend_4(value: u32) -> i32 {
	(value * 0x11) as i32
}

/// Widen a 5-bit channel to 8 bits by replicating the top bits.
#[inline]
fn extend_5(value: u32) -> i32 {
	((value << 3) | (value >> 2)) as i32
}

/// 3-bit two's complement delta.
#[inline]
fn delta_3(bits: u32) -> u32 {
	if bits >= 4 {
		bits.wrapping_sub(8)
	} else {
		bits
	}
}

/// Decompress one ETC1 block into the 4x4 RGB patch at `(x, y)` of a
/// row-major RGB buffer `width` pixels wide.
///
/// `word_hi` holds the base colors and control bits, `word_lo` the per-pixel
/// index bits (most significant halves in the upper 16 bits, pixels ordered
/// column-major within the block).
pub fn decompress_block(word_hi: u32, word_lo: u32, dst: &mut [u8], width: usize, x: usize, y: usize) {
	let flip = word_hi & 0x1 != 0;
	let diff = word_hi & 0x2 != 0;
	let tables = [((word_hi >> 5) & 0x7) as usize, ((word_hi >> 2) & 0x7) as usize];

	let base: [[i32; 3]; 2] = if diff {
		let r = (word_hi >> 27) & 0x1f;
		let g = (word_hi >> 19) & 0x1f;
		let b = (word_hi >> 11) & 0x1f;
		let r2 = r.wrapping_add(delta_3((word_hi >> 24) & 0x7)) & 0x1f;
		let g2 = g.wrapping_add(delta_3((word_hi >> 16) & 0x7)) & 0x1f;
		let b2 = b.wrapping_add(delta_3((word_hi >> 8) & 0x7)) & 0x1f;
		[
			[extend_5(r), extend_5(g), extend_5(b)],
			[extend_5(r2), extend_5(g2), extend_5(b2)],
		]
	} else {
		[
			[
				extend_4((word_hi >> 28) & 0xf),
				extend_4((word_hi >> 20) & 0xf),
				extend_4((word_hi >> 12) & 0xf),
			],
			[
				extend_4((word_hi >> 24) & 0xf),
				extend_4((word_hi >> 16) & 0xf),
				extend_4((word_hi >> 8) & 0xf),
			],
		]
	};

	for px in 0..4 {
		for py in 0..4 {
			// index bits are laid out column-major within the block
			let bit = px * 4 + py;
			let sub = if flip { (py >= 2) as usize } else { (px >= 2) as usize };

			let magnitude = MODIFIER_TABLE[tables[sub]][((word_lo >> bit) & 1) as usize];
			let modifier = if (word_lo >> (16 + bit)) & 1 != 0 {
				-magnitude
			} else {
				magnitude
			};

			let offset = ((y + py) * width + x + px) * 3;
			for channel in 0..3 {
				dst[offset + channel] = (base[sub][channel] + modifier).clamp(0, 255) as u8;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode_one(word_hi: u32, word_lo: u32) -> Vec<u8> {
		let mut dst = vec![0_u8; 4 * 4 * 3];
		decompress_block(word_hi, word_lo, &mut dst, 4, 0, 0);
		dst
	}

	fn pixel(dst: &[u8], width: usize, x: usize, y: usize) -> [u8; 3] {
		let offset = (y * width + x) * 3;
		[dst[offset], dst[offset + 1], dst[offset + 2]]
	}

	#[test]
	fn individual_mode_flat_subblocks() {
		// base colors 0x8 -> 136 and 0x4 -> 68, both tables 0, all pixel
		// indices select the +2 modifier, no flip
		let dst = decode_one(0x8484_8400, 0);
		for py in 0..4 {
			for px in 0..4 {
				let expected = if px < 2 { 138 } else { 70 };
				assert_eq!(pixel(&dst, 4, px, py), [expected; 3], "({px}, {py})");
			}
		}
	}

	#[test]
	fn differential_mode_modifiers() {
		// base 5-bit 16 -> 132 with zero deltas, left table [9, 29],
		// right table [2, 8]; pixel (0, 0) selects -29, the rest +9/+2
		let word_hi = (16 << 27) | (16 << 19) | (16 << 11) | (2 << 5) | 0x2;
		let word_lo = 0x0001_0001;
		let dst = decode_one(word_hi, word_lo);
		for py in 0..4 {
			for px in 0..4 {
				let expected = match (px, py) {
					(0, 0) => 103,
					(px, _) if px < 2 => 141,
					_ => 134,
				};
				assert_eq!(pixel(&dst, 4, px, py), [expected; 3], "({px}, {py})");
			}
		}
	}

	#[test]
	fn flip_bit_stacks_subblocks() {
		// same colors as the individual test but flipped: the split runs
		// horizontally, top rows from base 1 and bottom rows from base 2
		let dst = decode_one(0x8484_8401, 0);
		for py in 0..4 {
			for px in 0..4 {
				let expected = if py < 2 { 138 } else { 70 };
				assert_eq!(pixel(&dst, 4, px, py), [expected; 3], "({px}, {py})");
			}
		}
	}

	#[test]
	fn modifier_clamps_to_byte_range() {
		// base colors 0xf -> 255 and 0x0 -> 0 with table 7 ([47, 183]);
		// +183 must clamp at 255 and -183 at 0
		let word_hi = 0xf0f0_f0e0 | (7 << 2);
		let word_lo = 0xffff_0000; // all indices negative, magnitude small
		let dst = decode_one(word_hi, word_lo);
		assert_eq!(pixel(&dst, 4, 0, 0), [255 - 47; 3]);
		assert_eq!(pixel(&dst, 4, 2, 0), [0; 3]);

		let dst = decode_one(word_hi, 0x0000_ffff); // all indices +183
		assert_eq!(pixel(&dst, 4, 0, 0), [255; 3]);
		assert_eq!(pixel(&dst, 4, 2, 0), [183; 3]);
	}

	#[test]
	fn writes_patch_at_destination_offset() {
		let mut dst = vec![0_u8; 8 * 8 * 3];
		decompress_block(0x8484_8400, 0, &mut dst, 8, 4, 4);

		// untouched outside the patch
		assert_eq!(pixel(&dst, 8, 0, 0), [0; 3]);
		assert_eq!(pixel(&dst, 8, 3, 7), [0; 3]);
		// patch contents at the offset
		assert_eq!(pixel(&dst, 8, 4, 4), [138; 3]);
		assert_eq!(pixel(&dst, 8, 7, 7), [70; 3]);
	}
}
