//! `SPR` sprite atlases: a list of embedded CTPK texture packages plus the
//! named screen rectangles ("SCRs") that carve sprites out of them.

use glam::Vec2;

use super::ctpk::Ctpk;
use super::{ParseError, Reader};
use crate::source::ByteSource;

/// Allocated size of a CTPK name field.
const CTPK_NAME_SIZE: usize = 32;

/// Allocated size of an SCR name field.
const SCR_NAME_SIZE: usize = 71;

/// Size of one SCR table entry.
const SCR_ENTRY_SIZE: u64 = 96;

/// A named sprite: a UV rectangle within one of the atlas's texture
/// packages.
#[derive(Clone, Debug)]
pub struct Scr {
	pub name: String,
	/// Index of the CTPK the rectangle addresses.
	pub ctpk_index: u8,
	pub top_left: Vec2,
	pub bottom_right: Vec2,
}

#[derive(Clone, Debug)]
pub struct Spr {
	pub ctpks: Vec<Ctpk>,
	pub ctpk_names: Vec<String>,
	pub scrs: Vec<Scr>,
}

impl Spr {
	pub fn parse<S: ByteSource + ?Sized>(source: &S) -> Result<Spr, ParseError> {
		let mut reader = Reader::new(source, 0);
		if reader.read_n::<4>()? != [0; 4] {
			return Err(ParseError::BadMagic("SPR"));
		}

		// the only table whose pointer precedes its count
		let ctpks_pointer = reader.read_u32()? as u64;
		let num_ctpks = reader.read_u32()? as usize;
		let ctpk_names_pointer = reader.read_u32()? as u64;

		reader.skip(8); // padding

		let num_scrs = reader.read_u32()? as usize;
		let scrs_pointer = reader.read_u32()? as u64;

		// packages are variable-length, so each one starts where the
		// previous package's last texture ended
		let mut ctpks = Vec::with_capacity(num_ctpks);
		let mut ctpk_names = Vec::with_capacity(num_ctpks);
		let mut ctpk_pointer = ctpks_pointer;
		for i in 0..num_ctpks {
			// +4 skips the flags preceding each package
			let ctpk = Ctpk::parse(source, ctpk_pointer + 4)?;

			let mut names = reader.fork(ctpk_names_pointer + (i * CTPK_NAME_SIZE) as u64);
			let name = names.read_fixed_string(CTPK_NAME_SIZE)?;

			let last = ctpk.textures.last().ok_or(ParseError::EmptyTexturePackage)?;
			ctpk_pointer = last.data_offset + last.data_size as u64;

			ctpks.push(ctpk);
			ctpk_names.push(name);
		}

		let mut scrs = Vec::with_capacity(num_scrs);
		for i in 0..num_scrs {
			let mut entry = reader.fork(scrs_pointer + i as u64 * SCR_ENTRY_SIZE);
			let ctpk_index = entry.read_u8()?;
			let name = entry.read_fixed_string(SCR_NAME_SIZE)?;
			let top_left = entry.read_vec2()?;
			let bottom_right = entry.read_vec2()?;
			if bottom_right.x <= top_left.x || bottom_right.y <= top_left.y {
				return Err(ParseError::InvalidSpriteBounds);
			}

			scrs.push(Scr {
				name,
				ctpk_index,
				top_left,
				bottom_right,
			});
		}

		Ok(Spr {
			ctpks,
			ctpk_names,
			scrs,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn synthetic_spr() -> Vec<u8> {
		let mut data = vec![0_u8; 4]; // zeroed signature
		let header_fields = data.len();
		data.extend_from_slice(&[0_u8; 28]); // patched below

		// one embedded package behind a 4-byte flags field
		let ctpk_pointer = data.len() as u32;
		data.extend_from_slice(&0_u32.to_le_bytes());
		let package = super::super::ctpk::tests::synthetic_ctpk(&[(0x10, 0, 0x7, 8, 8)], 0x44);
		data.extend_from_slice(&package);
		data.extend_from_slice(&[0_u8; 0x10]); // texture data

		let names_pointer = data.len() as u32;
		let mut name = [0_u8; CTPK_NAME_SIZE];
		name[..5].copy_from_slice(b"atlas");
		data.extend_from_slice(&name);

		let scrs_pointer = data.len() as u32;
		data.push(0); // ctpk index
		let mut name = [0_u8; SCR_NAME_SIZE];
		name[..6].copy_from_slice(b"button");
		data.extend_from_slice(&name);
		for value in [0.25_f32, 0.5, 0.75, 1.0] {
			data.extend_from_slice(&value.to_le_bytes());
		}
		data.extend_from_slice(&[0_u8; 8]);

		let mut header = Vec::new();
		header.extend_from_slice(&ctpk_pointer.to_le_bytes());
		header.extend_from_slice(&1_u32.to_le_bytes());
		header.extend_from_slice(&names_pointer.to_le_bytes());
		header.extend_from_slice(&[0_u8; 8]);
		header.extend_from_slice(&1_u32.to_le_bytes());
		header.extend_from_slice(&scrs_pointer.to_le_bytes());
		data[header_fields..header_fields + 28].copy_from_slice(&header);
		data
	}

	#[test]
	fn atlases_resolve_packages_names_and_rects() {
		let data = synthetic_spr();
		let spr = Spr::parse(&data).unwrap();

		assert_eq!(spr.ctpks.len(), 1);
		assert_eq!(spr.ctpk_names, ["atlas"]);
		assert_eq!(spr.ctpks[0].textures.len(), 1);

		assert_eq!(spr.scrs.len(), 1);
		let scr = &spr.scrs[0];
		assert_eq!(scr.name, "button");
		assert_eq!(scr.ctpk_index, 0);
		assert_eq!(scr.top_left, Vec2::new(0.25, 0.5));
		assert_eq!(scr.bottom_right, Vec2::new(0.75, 1.0));
	}

	#[test]
	fn inverted_sprite_bounds_are_refused() {
		let mut data = synthetic_spr();
		// swap the rect's x extents
		let scr_rect = data.len() - 8 - 16;
		data[scr_rect..scr_rect + 4].copy_from_slice(&1.0_f32.to_le_bytes());
		data[scr_rect + 8..scr_rect + 12].copy_from_slice(&0.25_f32.to_le_bytes());

		assert!(matches!(Spr::parse(&data), Err(ParseError::InvalidSpriteBounds)));
	}

	#[test]
	fn an_empty_embedded_package_is_an_error() {
		let mut data = synthetic_spr();
		// zero the package's texture count
		let count_field = 4 + 28 + 4 + 6;
		data[count_field..count_field + 2].copy_from_slice(&0_u16.to_le_bytes());

		assert!(matches!(Spr::parse(&data), Err(ParseError::EmptyTexturePackage)));
	}
}
