//! `DICT` named-entry dictionaries.
//!
//! CGFX indexes every resource list through a dictionary block: a patricia
//! tree whose nodes carry a name pointer and a data pointer. Only the
//! name-to-pointer mapping matters for extraction, so the tree navigation
//! fields are skipped.

use super::{ParseError, Reader};
use crate::source::ByteSource;

#[derive(Clone, Debug)]
pub struct DictEntry {
	pub name: String,
	/// Absolute position of the entry's data block.
	pub data_pointer: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Dict {
	pub entries: Vec<DictEntry>,
}

impl Dict {
	/// Parse the inline entry count and dictionary pointer at the reader's
	/// position, then the `DICT` block it points to. The reader is left just
	/// past the inline fields.
	pub(crate) fn parse<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Dict, ParseError> {
		let num_entries = reader.read_u32()? as usize;
		let dict_pointer = reader.read_rel_ptr()?;

		// an empty dictionary has no block behind its pointer at all
		if num_entries == 0 {
			return Ok(Dict::default());
		}

		let mut dict = reader.fork(dict_pointer);
		dict.expect_magic("DICT")?;
		dict.skip(4); // section size
		let count = dict.read_u32()? as usize;
		dict.skip(16); // root node

		let mut entries = Vec::with_capacity(count);
		for _ in 0..count {
			// patricia tree fields: reference bit, left and right node
			dict.skip(8);
			let name_pointer = dict.read_rel_ptr()?;
			let data_pointer = dict.read_rel_ptr()?;
			let name = dict.read_cstr_at(name_pointer)?;
			entries.push(DictEntry { name, data_pointer });
		}
		Ok(Dict { entries })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Build a buffer holding the inline count and pointer at offset 0,
	/// followed by a DICT block with the given named entries.
	fn synthetic_dict(names: &[&str]) -> Vec<u8> {
		let mut data = Vec::new();
		data.extend_from_slice(&(names.len() as u32).to_le_bytes());
		data.extend_from_slice(&4_u32.to_le_bytes()); // block follows the pointer field

		// block header
		data.extend_from_slice(b"DICT");
		data.extend_from_slice(&0_u32.to_le_bytes());
		data.extend_from_slice(&(names.len() as u32).to_le_bytes());
		data.extend_from_slice(&[0_u8; 16]);

		// entries, name pointers patched afterwards
		let entries_start = data.len();
		for _ in names {
			data.extend_from_slice(&[0_u8; 8]);
			data.extend_from_slice(&0_u32.to_le_bytes()); // name pointer
			data.extend_from_slice(&0xbeef_u32.to_le_bytes()); // data pointer
		}
		for (i, name) in names.iter().enumerate() {
			let field = entries_start + i * 16 + 8;
			let offset = (data.len() - field) as u32;
			data[field..field + 4].copy_from_slice(&offset.to_le_bytes());
			data.extend_from_slice(name.as_bytes());
			data.push(0);
		}
		data
	}

	#[test]
	fn entries_resolve_names_and_pointers() {
		let data = synthetic_dict(&["skin", "eyes"]);
		let dict = Dict::parse(&mut Reader::new(&data, 0)).unwrap();

		assert_eq!(dict.entries.len(), 2);
		assert_eq!(dict.entries[0].name, "skin");
		assert_eq!(dict.entries[1].name, "eyes");

		// data pointers resolve relative to their field
		let entries_start = 8 + 28;
		assert_eq!(dict.entries[0].data_pointer, (entries_start + 12 + 0xbeef) as u64);
	}

	#[test]
	fn empty_dictionaries_read_nothing() {
		// count 0 with a dangling pointer that must never be followed
		let mut data = Vec::new();
		data.extend_from_slice(&0_u32.to_le_bytes());
		data.extend_from_slice(&0xffff_u32.to_le_bytes());

		let mut reader = Reader::new(&data, 0);
		let dict = Dict::parse(&mut reader).unwrap();
		assert!(dict.entries.is_empty());

		// the reader sits just past the inline fields
		assert!(reader.read_u8().is_err());
	}

	#[test]
	fn bad_magic_is_rejected() {
		let mut data = synthetic_dict(&["skin"]);
		data[8..12].copy_from_slice(b"DATA");
		assert!(matches!(
			Dict::parse(&mut Reader::new(&data, 0)),
			Err(ParseError::BadMagic("DICT"))
		));
	}
}
