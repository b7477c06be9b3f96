//! `CMDL` model blocks: transforms plus pointer tables of the SOBJ entries
//! forming the model's objects, meshes, and skeleton.

use super::sobj::{self, Sobj};
use super::{ParseError, Reader};
use crate::model::Model;
use crate::source::ByteSource;

pub(crate) fn parse<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Model, ParseError> {
	// bit 7 of the preceding flags marks a skeleton entry
	let flags = reader.read_u32()?;
	let has_skeleton = flags & 0x80 != 0;

	reader.expect_magic("CMDL")?;
	reader.skip(4); // unknown

	let name_pointer = reader.read_rel_ptr()?;
	let name = reader.read_cstr_at(name_pointer)?;

	reader.skip(24); // unknown
	reader.skip(8); // animation types dictionary, not interpreted

	let transform_scale = reader.read_vec3()?;
	let transform_rotation = reader.read_vec3()?;
	let transform_translation = reader.read_vec3()?;
	let transform_local = reader.read_mat4x3()?;
	let transform_world = reader.read_mat4x3()?;

	let num_objects = reader.read_u32()? as usize;
	let objects_pointer = reader.read_rel_ptr()?;

	reader.skip(8); // materials dictionary; material payloads are not interpreted

	let num_meshes = reader.read_u32()? as usize;
	let meshes_pointer = reader.read_rel_ptr()?;

	reader.skip(8); // object nodes dictionary

	let flags = reader.read_u32()?;
	let is_visible = flags & 0x1 != 0;

	reader.skip(4 + 4); // culling mode, layer id

	if has_skeleton {
		// presence is all that is surfaced; skeleton payloads are
		// undocumented upstream
		reader.read_rel_ptr()?;
	}

	let mut objects = Vec::with_capacity(num_objects);
	for i in 0..num_objects {
		let pointer = reader.fork(objects_pointer + i as u64 * 4).read_rel_ptr()?;
		match sobj::parse(&mut reader.fork(pointer))? {
			Sobj::Object(object) => objects.push(object),
			_ => return Err(ParseError::UnexpectedSobjKind),
		}
	}

	let mut meshes = Vec::with_capacity(num_meshes);
	for i in 0..num_meshes {
		let pointer = reader.fork(meshes_pointer + i as u64 * 4).read_rel_ptr()?;
		match sobj::parse(&mut reader.fork(pointer))? {
			Sobj::Mesh(mesh) => meshes.push(mesh),
			_ => return Err(ParseError::UnexpectedSobjKind),
		}
	}

	Ok(Model {
		name,
		transform_scale,
		transform_rotation,
		transform_translation,
		transform_local,
		transform_world,
		is_visible,
		objects,
		meshes,
		has_skeleton,
	})
}
