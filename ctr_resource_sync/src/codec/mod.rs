//! PICA200 texture codec
//!
//! Converts resource payloads to top-down RGBA8 `PixelBuffer`s and back,
//! including mip-chain regeneration. All functions are pure and reentrant.

mod format;
mod pixel_buffer;
mod pixel;
mod etc1;
mod swizzle;
mod mipmap;
mod codec;

pub use format::TextureFormat;
pub use pixel_buffer::PixelBuffer;
pub use swizzle::TILE_SIZE;
pub use mipmap::{max_mip_count, mip_extent, validate_mip_count, downsample, generate_chain};
pub use codec::{
    decode, decode_level, decode_faces,
    encode, encode_payload,
    level_offset, face_size, aligned_mip_count,
};
