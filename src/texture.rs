use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::error;

use crate::error::DecodeError;
use crate::source::ByteSource;

mod decode;
pub mod etc1;
pub mod tile;
mod unpack;

/// The encodings a texture's data can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TextureFormat {
	/// Eight bits per channel, four channels.
	Rgba8888 = 0x0,
	/// Eight bits per channel, no alpha.
	Rgb888 = 0x1,
	/// Five bits per color channel and one alpha bit.
	Rgba5551 = 0x2,
	/// Five bits for red and blue, six for green.
	Rgb565 = 0x3,
	/// Four bits per channel.
	Rgba4444 = 0x4,
	/// Eight bits each for luminance and alpha.
	La88 = 0x5,
	/// Eight bits each for hue and luminance. Decodable but not
	/// representable as RGBA.
	Hl8 = 0x6,
	/// Eight bits of luminance.
	L8 = 0x7,
	/// Eight bits of alpha.
	A8 = 0x8,
	/// Four bits each for luminance and alpha.
	La44 = 0x9,
	/// Four bits of luminance, decoded to eight by replication.
	L4 = 0xa,
	/// Four bits of alpha, decoded to eight by replication.
	A4 = 0xb,
	/// Ericsson Texture Compression, decoded to RGB8.
	Etc1 = 0xc,
	/// ETC1 with an interleaved 4-bit alpha plane, decoded to RGBA8.
	Etc1A4 = 0xd,
}

impl TryFrom<u32> for TextureFormat {
	type Error = DecodeError;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		Ok(match value {
			0x0 => Self::Rgba8888,
			0x1 => Self::Rgb888,
			0x2 => Self::Rgba5551,
			0x3 => Self::Rgb565,
			0x4 => Self::Rgba4444,
			0x5 => Self::La88,
			0x6 => Self::Hl8,
			0x7 => Self::L8,
			0x8 => Self::A8,
			0x9 => Self::La44,
			0xa => Self::L4,
			0xb => Self::A4,
			0xc => Self::Etc1,
			0xd => Self::Etc1A4,
			n => return Err(DecodeError::UnsupportedFormat(n)),
		})
	}
}

impl TextureFormat {
	/// Bits one pixel occupies in the encoded data.
	pub fn encoded_bits_per_pixel(&self) -> usize {
		match self {
			Self::Rgba8888 => 32,
			Self::Rgb888 => 24,
			Self::Rgba5551 | Self::Rgb565 | Self::Rgba4444 | Self::La88 | Self::Hl8 => 16,
			Self::L8 | Self::A8 | Self::La44 | Self::Etc1A4 => 8,
			Self::L4 | Self::A4 | Self::Etc1 => 4,
		}
	}

	/// Bytes one pixel occupies in the decoded, still format-native data.
	pub fn decoded_bytes_per_pixel(&self) -> usize {
		match self {
			Self::Rgba8888 | Self::Etc1A4 => 4,
			Self::Rgb888 | Self::Etc1 => 3,
			Self::Rgba5551 | Self::Rgb565 | Self::Rgba4444 | Self::La88 | Self::Hl8 => 2,
			Self::L8 | Self::A8 | Self::La44 | Self::L4 | Self::A4 => 1,
		}
	}
}

/// Metadata locating one texture's encoded data within a byte source.
///
/// Constructed by the container parsers; immutable afterwards. Decoding
/// holds no state beyond the call, so one descriptor can decode from any
/// number of sources, concurrently.
#[derive(Clone, Debug)]
pub struct Texture {
	/// Width in pixels. Multiples of 8 for every tiled format.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// Size of the encoded data, in bytes.
	pub data_size: usize,
	/// Absolute offset of the encoded data within its source.
	pub data_offset: u64,
	pub format: TextureFormat,
}

impl Texture {
	/// Size of the decoded, format-native data, in bytes.
	pub fn decoded_size(&self) -> usize {
		self.width as usize * self.height as usize * self.format.decoded_bytes_per_pixel()
	}

	/// Size of the RGBA8 unpacked data, in bytes.
	pub fn unpacked_size(&self) -> usize {
		self.width as usize * self.height as usize * 4
	}

	/// Read and decode the texture into its format-native layout, row-major
	/// from the top-left corner.
	pub fn decode<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Vec<u8>, DecodeError> {
		let mut raw = vec![0_u8; self.data_size];
		source.read_at(self.data_offset, &mut raw)?;
		decode::decode(&raw, self.width, self.height, self.format)
	}

	/// Read, decode, and unpack the texture to RGBA8.
	pub fn decode_rgba<S: ByteSource + ?Sized>(&self, source: &S) -> Result<RgbaTexture, DecodeError> {
		let decoded = self.decode(source)?;
		let data = unpack::unpack(&decoded, self.width, self.height, self.format)?;
		Ok(RgbaTexture {
			width: self.width,
			height: self.height,
			data,
		})
	}
}

/// An unpacked RGBA8 image, `width * height * 4` bytes, row-major from the
/// top-left corner.
pub struct RgbaTexture {
	width: u32,
	height: u32,
	data: Vec<u8>,
}

impl RgbaTexture {
	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn pixels(&self) -> &[u8] {
		&self.data
	}

	pub fn into_image(self) -> image::RgbaImage {
		// the buffer is width * height * 4 bytes by construction
		image::RgbaImage::from_raw(self.width, self.height, self.data).unwrap()
	}
}

/// Decode a batch of textures to RGBA8 in parallel.
///
/// Failures are logged and yielded as `None` so one broken texture does not
/// shift the positions of the rest.
pub fn decode_textures<S>(textures: &[Texture], source: &S) -> Vec<Option<RgbaTexture>>
where
	S: ByteSource + Sync + ?Sized,
{
	textures
		.par_iter()
		.map(|texture| match texture.decode_rgba(source) {
			Ok(decoded) => Some(decoded),
			Err(e) => {
				error!("{}", e);
				None
			}
		})
		.collect()
}
