//! Parsers for the pointer-linked binary container formats.
//!
//! Containers locate their payloads through name dictionaries and
//! relative-offset pointer chains; the parsers here walk those chains with
//! per-call [`Reader`] cursors over a shared [`ByteSource`] and hand the
//! resolved texture and vertex descriptors to the decode pipeline.

pub mod cgfx;
pub mod cmdl;
pub mod ctpk;
pub mod dict;
pub mod sobj;
pub mod spr;
pub mod txob;

use std::io;
use std::string::FromUtf8Error;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::error::DecodeError;
use crate::mesh::{UnknownAttribute, UnknownAttributeType};
use crate::source::ByteSource;

/// Longest null-terminated name the parsers will read.
const MAX_NAME_LENGTH: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("magic bytes do not match, expected {0:?}")]
	BadMagic(&'static str),
	#[error("string is not valid UTF-8")]
	Utf8(#[from] FromUtf8Error),
	#[error("unterminated string at {0:#x}")]
	UnterminatedString(u64),
	#[error(transparent)]
	UnknownAttribute(#[from] UnknownAttribute),
	#[error(transparent)]
	UnknownAttributeType(#[from] UnknownAttributeType),
	#[error("data object is not of the expected kind")]
	UnexpectedSobjKind,
	#[error("data object flags {0:#010x} name no known kind")]
	UnknownSobjKind(u32),
	#[error("vertex component ends at byte {end} but the stride is {stride}")]
	ComponentOutOfBounds { end: usize, stride: usize },
	#[error("vertex data size {size} is not a multiple of the stride {stride}")]
	MisalignedVertexData { size: usize, stride: usize },
	#[error("texture package contains no textures")]
	EmptyTexturePackage,
	#[error("sprite rectangle has inverted bounds")]
	InvalidSpriteBounds,
	#[error(transparent)]
	Decode(#[from] DecodeError),
	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Sequential reader over a positioned byte source.
///
/// The position is local to the reader and nothing is shared between
/// readers, so any number can be live over one source at a time; pointer
/// chases fork a child reader instead of seeking away and back.
pub(crate) struct Reader<'s, S: ByteSource + ?Sized> {
	source: &'s S,
	position: u64,
}

impl<'s, S: ByteSource + ?Sized> Reader<'s, S> {
	pub fn new(source: &'s S, position: u64) -> Self {
		Self { source, position }
	}

	/// A new reader over the same source at an absolute position.
	pub fn fork(&self, position: u64) -> Reader<'s, S> {
		Reader::new(self.source, position)
	}

	pub fn skip(&mut self, bytes: u64) {
		self.position += bytes;
	}

	pub fn read_n<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
		let mut buf = [0_u8; N];
		self.source.read_at(self.position, &mut buf)?;
		self.position += N as u64;
		Ok(buf)
	}

	pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>, ParseError> {
		let mut buf = vec![0_u8; n];
		self.source.read_at(self.position, &mut buf)?;
		self.position += n as u64;
		Ok(buf)
	}

	pub fn read_u8(&mut self) -> Result<u8, ParseError> {
		Ok(self.read_n::<1>()?[0])
	}

	pub fn read_u16(&mut self) -> Result<u16, ParseError> {
		Ok(u16::from_le_bytes(self.read_n::<2>()?))
	}

	pub fn read_u32(&mut self) -> Result<u32, ParseError> {
		Ok(u32::from_le_bytes(self.read_n::<4>()?))
	}

	pub fn read_f32(&mut self) -> Result<f32, ParseError> {
		Ok(f32::from_le_bytes(self.read_n::<4>()?))
	}

	pub fn expect_magic(&mut self, magic: &'static str) -> Result<(), ParseError> {
		let bytes = self.read_n::<4>()?;
		if bytes != magic.as_bytes() {
			return Err(ParseError::BadMagic(magic));
		}
		Ok(())
	}

	/// Read a pointer stored as a `u32` offset relative to the position of
	/// the offset field itself, yielding the absolute position.
	pub fn read_rel_ptr(&mut self) -> Result<u64, ParseError> {
		let base = self.position;
		let offset = self.read_u32()?;
		Ok(base + offset as u64)
	}

	/// Null-terminated string at an absolute position, without moving this
	/// reader.
	pub fn read_cstr_at(&self, position: u64) -> Result<String, ParseError> {
		let mut reader = self.fork(position);
		let mut bytes = Vec::new();
		loop {
			if bytes.len() >= MAX_NAME_LENGTH {
				return Err(ParseError::UnterminatedString(position));
			}
			match reader.read_u8()? {
				0 => break,
				c => bytes.push(c),
			}
		}
		Ok(String::from_utf8(bytes)?)
	}

	/// String stored in a fixed-size field, null bytes squeezed out.
	pub fn read_fixed_string(&mut self, size: usize) -> Result<String, ParseError> {
		let bytes = self.read_vec(size)?;
		Ok(String::from_utf8(bytes.into_iter().filter(|&c| c != 0).collect())?)
	}

	pub fn read_vec2(&mut self) -> Result<Vec2, ParseError> {
		Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
	}

	pub fn read_vec3(&mut self) -> Result<Vec3, ParseError> {
		Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
	}

	/// A 4x3 row-major affine matrix, the bottom row implied.
	pub fn read_mat4x3(&mut self) -> Result<Mat4, ParseError> {
		let mut m = [0_f32; 12];
		for value in &mut m {
			*value = self.read_f32()?;
		}
		Ok(Mat4::from_cols(
			Vec4::new(m[0], m[4], m[8], 0.0),
			Vec4::new(m[1], m[5], m[9], 0.0),
			Vec4::new(m[2], m[6], m[10], 0.0),
			Vec4::new(m[3], m[7], m[11], 1.0),
		))
	}
}
