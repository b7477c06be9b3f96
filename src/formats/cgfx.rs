//! `CGFX` containers: the top-level archive tying models, textures, and a
//! dozen other resource kinds together through dictionaries in its `DATA`
//! section.

use super::dict::Dict;
use super::txob::NamedTexture;
use super::{cmdl, txob, ParseError, Reader};
use crate::model::Model;
use crate::source::ByteSource;

/// A parsed CGFX container. Holds descriptors only; texture and vertex data
/// stay in the byte source until decoded.
#[derive(Clone, Debug)]
pub struct Cgfx {
	pub models: Vec<Model>,
	pub textures: Vec<NamedTexture>,
}

impl Cgfx {
	pub fn parse<S: ByteSource + ?Sized>(source: &S) -> Result<Cgfx, ParseError> {
		let mut reader = Reader::new(source, 0);
		reader.expect_magic("CGFX")?;
		// byte order mark, header size, revision, file size, entry count
		reader.skip(2 + 2 + 4 + 4 + 4);

		reader.expect_magic("DATA")?;
		reader.skip(4); // section size

		// the DATA section carries fifteen dictionaries; models and textures
		// come first, and the rest (lookup tables, materials, shaders,
		// cameras, lights, fogs, scenes, animations, emitters) only matter
		// to the runtime
		let models_dict = Dict::parse(&mut reader)?;
		let textures_dict = Dict::parse(&mut reader)?;

		let mut models = Vec::with_capacity(models_dict.entries.len());
		for entry in &models_dict.entries {
			models.push(cmdl::parse(&mut reader.fork(entry.data_pointer))?);
		}

		let mut textures = Vec::with_capacity(textures_dict.entries.len());
		for entry in &textures_dict.entries {
			textures.push(txob::parse(&mut reader.fork(entry.data_pointer))?);
		}

		Ok(Cgfx { models, textures })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_magic_is_checked() {
		let data = b"XGFX".repeat(16);
		assert!(matches!(Cgfx::parse(&data), Err(ParseError::BadMagic("CGFX"))));
	}

	#[test]
	fn empty_container_parses() {
		let mut data = Vec::new();
		data.extend_from_slice(b"CGFX");
		data.extend_from_slice(&[0_u8; 16]);
		data.extend_from_slice(b"DATA");
		data.extend_from_slice(&0_u32.to_le_bytes());
		// empty model and texture dictionaries
		for _ in 0..2 {
			data.extend_from_slice(&0_u32.to_le_bytes());
			data.extend_from_slice(&0_u32.to_le_bytes());
		}

		let cgfx = Cgfx::parse(&data).unwrap();
		assert!(cgfx.models.is_empty());
		assert!(cgfx.textures.is_empty());
	}
}
