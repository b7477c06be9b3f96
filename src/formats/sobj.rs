//! `SOBJ` data objects: the polymorphic blocks a CMDL points at for its
//! objects, meshes, and skeleton. Mesh blocks carry the face groups and
//! vertex group descriptors that feed the vertex decoder.

use tracing::debug;

use super::{ParseError, Reader};
use crate::mesh::{AttributeType, FaceGroup, Mesh, Object, VertexAttribute, VertexComponent, VertexGroup};
use crate::source::ByteSource;

/// The kind of vertex group that interleaves per-vertex attributes; the only
/// kind with a documented layout.
const VERTEX_GROUP_INTERLEAVED: u32 = 0x4000_0002;

/// Signature shared by every vertex component declaration.
const COMPONENT_SIGNATURE: u32 = 0x4000_0001;

pub(crate) enum Sobj {
	Object(Object),
	Mesh(Mesh),
	/// Present in the container but with an undocumented payload.
	Skeleton,
}

pub(crate) fn parse<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Sobj, ParseError> {
	// the kind flags are combined with other bits, so they cannot map
	// directly onto an enum
	let flags = reader.read_u32()?;
	let is_object = flags & (1 << 24) != 0;
	let is_skeleton = flags & (1 << 25) != 0;
	let is_mesh = flags & (1 << 28) != 0;

	reader.expect_magic("SOBJ")?;
	reader.skip(4); // unknown

	// points into the string block, but no known file names its sobjs
	reader.read_rel_ptr()?;
	reader.skip(8); // unknown

	if is_object {
		Ok(Sobj::Object(parse_object(reader)?))
	} else if is_skeleton {
		Ok(Sobj::Skeleton)
	} else if is_mesh {
		Ok(Sobj::Mesh(parse_mesh(reader)?))
	} else {
		Err(ParseError::UnknownSobjKind(flags))
	}
}

fn parse_object<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Object, ParseError> {
	let mesh_index = reader.read_u32()?;
	let material_index = reader.read_u32()?;
	reader.skip(4); // owner model offset, unused by every known consumer

	let flags = reader.read_u8()?;
	let is_visible = flags & 0x1 != 0;
	let rendering_priority = reader.read_u8()?;

	// the remaining fields (visibility dictionary index, current primitive
	// index) go unused
	Ok(Object {
		mesh_index,
		material_index,
		is_visible,
		rendering_priority,
	})
}

fn parse_mesh<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Mesh, ParseError> {
	reader.skip(4 + 4); // flags, bounding box pointer

	let translation = reader.read_vec3()?;

	let num_face_groups = reader.read_u32()? as usize;
	let face_groups_pointer = reader.read_rel_ptr()?;

	reader.skip(4); // unknown

	let num_vertex_groups = reader.read_u32()? as usize;
	let vertex_groups_pointer = reader.read_rel_ptr()?;

	let mut face_groups = Vec::with_capacity(num_face_groups);
	for i in 0..num_face_groups {
		let pointer = reader.fork(face_groups_pointer + i as u64 * 4).read_rel_ptr()?;
		face_groups.push(parse_face_group(&mut reader.fork(pointer))?);
	}

	// groups of undocumented kinds are skipped without leaving gaps
	let mut vertex_groups = Vec::new();
	for i in 0..num_vertex_groups {
		let pointer = reader.fork(vertex_groups_pointer + i as u64 * 4).read_rel_ptr()?;
		if let Some(group) = parse_vertex_group(&mut reader.fork(pointer))? {
			vertex_groups.push(group);
		}
	}

	Ok(Mesh {
		translation,
		face_groups,
		vertex_groups,
	})
}

/// Faces are grouped twice over: first-level groups each point at an index
/// array of either 8- or 16-bit indices. They are flattened into one
/// widened list here.
fn parse_face_group<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<FaceGroup, ParseError> {
	// bone node count and pointer, skinning mode
	reader.skip(4 + 4 + 4);

	let num_groups = reader.read_u32()? as usize;
	let groups_pointer = reader.read_rel_ptr()?;

	let mut indices = Vec::new();
	for g in 0..num_groups {
		let pointer = reader.fork(groups_pointer + g as u64 * 4).read_rel_ptr()?;
		let mut group = reader.fork(pointer);

		let _num_faces = group.read_u32()?;
		let faces_pointer = group.read_rel_ptr()?;

		// the face data sits behind one more level of indirection
		let descriptor_pointer = reader.fork(faces_pointer).read_rel_ptr()?;
		let mut descriptor = reader.fork(descriptor_pointer);

		// bit 1 of the format word selects 16-bit indices
		let format = descriptor.read_u32()?;
		let wide_indices = format & 0x2 != 0;

		descriptor.skip(4); // unknown

		// size of the index array in bytes, not a count
		let indices_size = descriptor.read_u32()? as usize;
		let indices_pointer = descriptor.read_rel_ptr()?;
		if indices_size == 0 {
			continue;
		}

		let mut data = reader.fork(indices_pointer);
		if wide_indices {
			indices.reserve(indices_size / 2);
			for _ in 0..indices_size / 2 {
				indices.push(data.read_u16()?);
			}
		} else {
			indices.reserve(indices_size);
			for _ in 0..indices_size {
				indices.push(data.read_u8()? as u16);
			}
		}
	}

	Ok(FaceGroup { indices })
}

fn parse_vertex_group<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<Option<VertexGroup>, ParseError> {
	let kind = reader.read_u32()?;
	if kind != VERTEX_GROUP_INTERLEAVED {
		debug!("skipping vertex group of undocumented kind {kind:#010x}");
		return Ok(None);
	}

	reader.skip(4 * 4); // unknown

	let data_size = reader.read_u32()? as usize;
	let data_offset = reader.read_rel_ptr()?;

	reader.skip(4 + 4); // unknown

	let stride = reader.read_u32()? as usize;
	let num_components = reader.read_u32()? as usize;
	let components_pointer = reader.read_rel_ptr()?;

	if stride == 0 || data_size % stride != 0 {
		return Err(ParseError::MisalignedVertexData { size: data_size, stride });
	}

	let mut components = Vec::with_capacity(num_components);
	for i in 0..num_components {
		let pointer = reader.fork(components_pointer + i as u64 * 4).read_rel_ptr()?;
		let component = parse_component(&mut reader.fork(pointer))?;

		let end = component.offset + component.count * component.ty.size();
		if end > stride {
			return Err(ParseError::ComponentOutOfBounds { end, stride });
		}
		components.push(component);
	}

	Ok(Some(VertexGroup {
		num_vertices: data_size / stride,
		stride,
		data_size,
		data_offset,
		components,
	}))
}

fn parse_component<S: ByteSource + ?Sized>(reader: &mut Reader<S>) -> Result<VertexComponent, ParseError> {
	if reader.read_u32()? != COMPONENT_SIGNATURE {
		return Err(ParseError::BadMagic("vertex component"));
	}

	let attribute = VertexAttribute::try_from(reader.read_u32()?)?;
	reader.skip(4 * 7); // unknown

	let ty = AttributeType::try_from(reader.read_u8()?)?;
	reader.skip(3); // unknown

	let count = reader.read_u32()? as usize;
	let multiplier = reader.read_f32()?;
	let offset = reader.read_u32()? as usize;

	Ok(VertexComponent {
		attribute,
		ty,
		count,
		multiplier,
		offset,
	})
}
