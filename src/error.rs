use std::io;

use crate::texture::TextureFormat;

/// Errors produced by the texture and vertex decode pipeline.
///
/// A decode call either fully succeeds or fails with one of these; there is
/// no partial output and nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("unknown texture format tag {0:#x}")]
	UnsupportedFormat(u32),
	#[error("{0:?} textures cannot be unpacked to RGBA")]
	UnsupportedUnpack(TextureFormat),
	#[error("{width}x{height} is not a positive multiple of 8 in both dimensions")]
	InvalidDimensions { width: u32, height: u32 },
	#[error("byte source ended before the declared data size")]
	TruncatedData(#[from] io::Error),
	#[error("vertex buffer is {actual} bytes but the descriptor declares {expected}")]
	BufferSizeMismatch { expected: usize, actual: usize },
}
