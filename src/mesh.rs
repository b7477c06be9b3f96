use glam::Vec3;

use crate::error::DecodeError;
use crate::source::ByteSource;

/// What a vertex component's values mean. Decoding never interprets these;
/// they exist so consumers can route components to shader inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum VertexAttribute {
	Position = 0x0,
	Normal = 0x1,
	Tangent = 0x2,
	Color = 0x3,
	TexCoord0 = 0x4,
	TexCoord1 = 0x5,
	TexCoord2 = 0x6,
	BoneIndex = 0x7,
	BoneWeight = 0x8,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown vertex attribute ({0:#x})")]
pub struct UnknownAttribute(pub u32);

impl TryFrom<u32> for VertexAttribute {
	type Error = UnknownAttribute;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		Ok(match value {
			0x0 => Self::Position,
			0x1 => Self::Normal,
			0x2 => Self::Tangent,
			0x3 => Self::Color,
			0x4 => Self::TexCoord0,
			0x5 => Self::TexCoord1,
			0x6 => Self::TexCoord2,
			0x7 => Self::BoneIndex,
			0x8 => Self::BoneWeight,
			n => return Err(UnknownAttribute(n)),
		})
	}
}

/// Storage type of the values within a vertex component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AttributeType {
	S8 = 0x0,
	U8 = 0x1,
	S16 = 0x2,
	U16 = 0x3,
	S32 = 0x4,
	U32 = 0x5,
	F32 = 0x6,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown vertex attribute type ({0:#x})")]
pub struct UnknownAttributeType(pub u8);

impl TryFrom<u8> for AttributeType {
	type Error = UnknownAttributeType;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0x0 => Self::S8,
			0x1 => Self::U8,
			0x2 => Self::S16,
			0x3 => Self::U16,
			0x4 => Self::S32,
			0x5 => Self::U32,
			0x6 => Self::F32,
			n => return Err(UnknownAttributeType(n)),
		})
	}
}

impl AttributeType {
	/// Size of one value of this type, in bytes.
	pub fn size(&self) -> usize {
		match self {
			Self::S8 | Self::U8 => 1,
			Self::S16 | Self::U16 => 2,
			Self::S32 | Self::U32 | Self::F32 => 4,
		}
	}
}

/// One attribute's layout within a vertex's stride.
#[derive(Clone, Debug)]
pub struct VertexComponent {
	pub attribute: VertexAttribute,
	pub ty: AttributeType,
	/// Number of values, e.g. 3 for an XYZ position.
	pub count: usize,
	/// Scale applied after widening each value to `f32`. Colors stored as
	/// bytes carry `1.0 / 255.0` here.
	pub multiplier: f32,
	/// Byte offset of the first value within the vertex.
	pub offset: usize,
}

/// A fixed-stride vertex buffer's layout and location.
///
/// Built by the container parsers, which guarantee that `data_size` is an
/// exact multiple of `stride` and that every component fits within it.
#[derive(Clone, Debug)]
pub struct VertexGroup {
	pub num_vertices: usize,
	/// Bytes between consecutive vertices in the encoded data.
	pub stride: usize,
	pub data_size: usize,
	/// Absolute offset of the vertex data within its source.
	pub data_offset: u64,
	/// Components in the order their values appear in the decoded output.
	pub components: Vec<VertexComponent>,
}

impl VertexGroup {
	/// Number of `f32`s one decoded vertex occupies.
	pub fn decoded_values_per_vertex(&self) -> usize {
		self.components.iter().map(|component| component.count).sum()
	}

	/// Bytes between consecutive vertices in the decoded output.
	pub fn decoded_stride(&self) -> usize {
		self.decoded_values_per_vertex() * std::mem::size_of::<f32>()
	}

	/// Read and decode the vertex data into a flat `f32` array, vertex by
	/// vertex, components in declaration order.
	pub fn decode<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Vec<f32>, DecodeError> {
		let mut raw = vec![0_u8; self.data_size];
		source.read_at(self.data_offset, &mut raw)?;
		decode_attributes(&raw, self.num_vertices, self.stride, &self.components)
	}
}

/// Decode a fixed-stride attribute buffer into floats.
///
/// Each value is read at its component's offset, widened to `f32` by numeric
/// conversion, and scaled by the component's multiplier. Component layouts
/// are validated against the stride when the descriptor is parsed; only the
/// buffer length is checked here.
pub fn decode_attributes(
	raw: &[u8],
	num_vertices: usize,
	stride: usize,
	components: &[VertexComponent],
) -> Result<Vec<f32>, DecodeError> {
	if raw.len() != num_vertices * stride {
		return Err(DecodeError::BufferSizeMismatch {
			expected: num_vertices * stride,
			actual: raw.len(),
		});
	}

	let values_per_vertex: usize = components.iter().map(|component| component.count).sum();
	let mut decoded = Vec::with_capacity(num_vertices * values_per_vertex);
	for v in 0..num_vertices {
		let vertex = &raw[v * stride..(v + 1) * stride];
		for component in components {
			debug_assert!(component.offset + component.count * component.ty.size() <= stride);
			for i in 0..component.count {
				let at = component.offset + i * component.ty.size();
				let value = match component.ty {
					AttributeType::S8 => vertex[at] as i8 as f32,
					AttributeType::U8 => vertex[at] as f32,
					AttributeType::S16 => i16::from_le_bytes([vertex[at], vertex[at + 1]]) as f32,
					AttributeType::U16 => u16::from_le_bytes([vertex[at], vertex[at + 1]]) as f32,
					AttributeType::S32 => {
						i32::from_le_bytes([vertex[at], vertex[at + 1], vertex[at + 2], vertex[at + 3]]) as f32
					}
					AttributeType::U32 => {
						u32::from_le_bytes([vertex[at], vertex[at + 1], vertex[at + 2], vertex[at + 3]]) as f32
					}
					AttributeType::F32 => {
						f32::from_le_bytes([vertex[at], vertex[at + 1], vertex[at + 2], vertex[at + 3]])
					}
				};
				decoded.push(value * component.multiplier);
			}
		}
	}
	Ok(decoded)
}

/// A run of face indices into a mesh's vertex groups. Source data splits
/// these over nested groups with 8- or 16-bit indices; parsing flattens them
/// to one widened list.
#[derive(Clone, Debug, Default)]
pub struct FaceGroup {
	pub indices: Vec<u16>,
}

/// Raw geometry: vertex groups plus the face groups indexing into them.
#[derive(Clone, Debug)]
pub struct Mesh {
	pub translation: Vec3,
	pub face_groups: Vec<FaceGroup>,
	/// Vertex groups of the documented kind, invalid entries already
	/// filtered out.
	pub vertex_groups: Vec<VertexGroup>,
}

/// The top-level entry tying a mesh to a material within a model.
#[derive(Clone, Debug)]
pub struct Object {
	pub mesh_index: u32,
	pub material_index: u32,
	pub is_visible: bool,
	/// Draw order relative to other objects; greater renders later.
	pub rendering_priority: u8,
}
