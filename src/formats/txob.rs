//! `TXOB` texture objects: the named texture metadata blocks inside a CGFX
//! container's texture dictionary.

use super::{ParseError, Reader};
use crate::source::ByteSource;
use crate::texture::{Texture, TextureFormat};

/// A texture resolved from a container's dictionary.
#[derive(Clone, Debug)]
pub struct NamedTexture {
	pub name: String,
	pub texture: Texture,
}

pub(crate) fn parse<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<NamedTexture, ParseError> {
	reader.skip(4); // type flags
	reader.expect_magic("TXOB")?;
	reader.skip(4); // format revision

	let name_pointer = reader.read_rel_ptr()?;
	let name = reader.read_cstr_at(name_pointer)?;

	reader.skip(4 + 4); // user data count and pointer

	// height precedes width
	let height = reader.read_u32()?;
	let width = reader.read_u32()?;

	// gl format, gl type, mipmap levels, texture object, location flags
	reader.skip(4 * 5);
	let format = TextureFormat::try_from(reader.read_u32()?)?;
	reader.skip(4 * 3); // unknown

	let data_size = reader.read_u32()? as usize;
	let data_offset = reader.read_rel_ptr()?;

	Ok(NamedTexture {
		name,
		texture: Texture {
			width,
			height,
			data_size,
			data_offset,
			format,
		},
	})
}
