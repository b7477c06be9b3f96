//! Native Rust decoder for the binary graphics asset containers used by the
//! Nintendo 3DS ("CTR"): CGFX model/texture containers, CTPK texture
//! packages, and SPR sprite atlases.
//!
//! The decode pipeline turns the console's tiled, block-compressed texture
//! storage and fixed-stride vertex buffers into linear RGBA8 and `f32`
//! buffers ready for GPU upload. Container parsing resolves the name
//! dictionaries and relative-pointer chains that locate that data.

pub mod error;
pub mod formats;
pub mod mesh;
pub mod model;
pub mod source;
pub mod texture;

pub use error::DecodeError;
pub use source::ByteSource;
