//! `CTPK` texture packages: a flat table of texture entries whose data
//! pointers are relative to the package's own data base.

use super::{ParseError, Reader};
use crate::source::ByteSource;
use crate::texture::{Texture, TextureFormat};

/// Size of the package header, up to the first entry.
const HEADER_SIZE: u64 = 32;

/// Size of one texture entry in the entry table.
const ENTRY_SIZE: u64 = 36;

#[derive(Clone, Debug)]
pub struct Ctpk {
	pub textures: Vec<Texture>,
}

impl Ctpk {
	/// Parse a package starting at `base` within the source. Packages embed
	/// into larger files, so texture data offsets resolve against `base`.
	pub fn parse<S: ByteSource + ?Sized>(source: &S, base: u64) -> Result<Ctpk, ParseError> {
		let mut reader = Reader::new(source, base);
		reader.expect_magic("CTPK")?;
		reader.skip(2); // version

		let num_textures = reader.read_u16()? as usize;
		let data_base = reader.read_u32()? as u64;

		// total data size, hash section pointer, conversion info pointer,
		// and padding fill out the header

		let mut textures = Vec::with_capacity(num_textures);
		for i in 0..num_textures {
			let mut entry = Reader::new(source, base + HEADER_SIZE + i as u64 * ENTRY_SIZE);
			entry.skip(4); // file path pointer

			let data_size = entry.read_u32()? as usize;
			let data_pointer = entry.read_u32()? as u64;
			let format = TextureFormat::try_from(entry.read_u32()?)?;
			let width = entry.read_u16()? as u32;
			let height = entry.read_u16()? as u32;

			// mip level, type, cube map info, bitmap size pointer, timestamp
			textures.push(Texture {
				width,
				height,
				data_size,
				data_offset: base + data_base + data_pointer,
				format,
			});
		}

		Ok(Ctpk { textures })
	}
}
