/// Texture codec: payload bytes <-> top-down RGBA8 pixel buffers
///
/// Stored payloads are bottom-up (first stored row is the bottom of the image)
/// while `PixelBuffer` is top-down. `decode_level` flips once after unpacking
/// and `encode` flips every level once before packing, so a decode / edit /
/// encode round trip mirrors nothing.
///
/// Mip levels of one face are stored back to back, largest first. Inside a
/// level texels (or ETC1 blocks) are in the PICA200 8x8 tile order described
/// in `swizzle`.
///
/// Every encoded or decoded level must be a multiple of the 8x8 tile on both
/// sides, which also keeps ETC1 levels aligned to their 4x4 blocks.
/// Misaligned levels are rejected with `InvalidDimensions`; nothing is padded.

use crate::error::{Error, Result};
use crate::resource::{Payload, Resource, ResourceKind, CUBE_FACE_COUNT};
use super::etc1;
use super::format::TextureFormat;
use super::mipmap::{generate_chain, max_mip_count, mip_extent, validate_mip_count};
use super::pixel;
use super::pixel_buffer::PixelBuffer;
use super::swizzle::{self, TILE_SIZE};

/// Byte offset of mip `level` inside one face
pub fn level_offset(format: TextureFormat, width: u32, height: u32, level: u32) -> usize {
    (0..level)
        .map(|l| {
            let extent = mip_extent(width, height, l);
            format.level_size(extent.x, extent.y)
        })
        .sum()
}

/// Byte size of one face holding `mip_count` levels
pub fn face_size(format: TextureFormat, width: u32, height: u32, mip_count: u32) -> usize {
    level_offset(format, width, height, mip_count)
}

#[inline]
fn is_tile_aligned(width: u32, height: u32) -> bool {
    width > 0 && height > 0 && width % TILE_SIZE == 0 && height % TILE_SIZE == 0
}

/// Longest chain whose levels are all tile aligned (0 if the base is not)
pub fn aligned_mip_count(width: u32, height: u32) -> u32 {
    (0..max_mip_count(width, height))
        .take_while(|&level| {
            let extent = mip_extent(width, height, level);
            is_tile_aligned(extent.x, extent.y)
        })
        .count() as u32
}

/// Check tile alignment of every level in the chain
fn check_alignment(format: TextureFormat, width: u32, height: u32, mip_count: u32) -> Result<()> {
    for level in 0..mip_count {
        let extent = mip_extent(width, height, level);
        if !is_tile_aligned(extent.x, extent.y) {
            return Err(Error::InvalidDimensions(format!(
                "{:?} needs {}x{} tiles, mip level {} is {}x{}",
                format, TILE_SIZE, TILE_SIZE, level, extent.x, extent.y
            )));
        }
    }
    Ok(())
}

fn check_decodable(resource: &Resource) -> Result<()> {
    if resource.kind == ResourceKind::Lut || !resource.format.is_supported() {
        return Err(Error::UnsupportedFormat(resource.format));
    }
    Ok(())
}

/// Decode the base level of one face
///
/// # Errors
///
/// - `UnsupportedFormat` for lookup tables and unknown formats
/// - `IndexOutOfRange` for a face the payload does not have
/// - `InvalidDimensions` if the payload is too short for the base level
pub fn decode(resource: &Resource, face: usize) -> Result<PixelBuffer> {
    decode_level(resource, face, 0)
}

/// Decode one mip level of one face
pub fn decode_level(resource: &Resource, face: usize, level: u32) -> Result<PixelBuffer> {
    check_decodable(resource)?;

    let data = resource.payload.face(face).ok_or(Error::IndexOutOfRange {
        what: "face",
        index: face,
        len: resource.payload.face_count(),
    })?;
    if level >= resource.mip_count {
        return Err(Error::IndexOutOfRange {
            what: "mip level",
            index: level as usize,
            len: resource.mip_count as usize,
        });
    }
    if resource.width == 0 || resource.height == 0 {
        return Err(Error::InvalidDimensions(format!(
            "'{}' is {}x{}", resource.name, resource.width, resource.height
        )));
    }

    let format = resource.format;
    let extent = mip_extent(resource.width, resource.height, level);
    if !is_tile_aligned(extent.x, extent.y) {
        return Err(Error::InvalidDimensions(format!(
            "{:?} level {} of '{}' is {}x{}, not a multiple of {}",
            format, level, resource.name, extent.x, extent.y, TILE_SIZE
        )));
    }

    let offset = level_offset(format, resource.width, resource.height, level);
    let size = format.level_size(extent.x, extent.y);
    let bytes = data.get(offset..offset + size).ok_or_else(|| Error::InvalidDimensions(format!(
        "'{}' face {} holds {} bytes, level {} needs {}..{}",
        resource.name, face, data.len(), level, offset, offset + size
    )))?;

    let (w, h) = (extent.x as usize, extent.y as usize);
    let rgba = match format {
        TextureFormat::Etc1 => etc1::decode(bytes, w, h, false),
        TextureFormat::Etc1A4 => etc1::decode(bytes, w, h, true),
        _ => {
            let tiled = pixel::unpack(format, bytes, w * h);
            swizzle::untile(bytemuck::cast_slice::<u8, [u8; 4]>(&tiled), w, h).concat()
        }
    };

    let mut pixels = PixelBuffer::new(extent.x, extent.y, rgba)?;
    pixels.flip_vertical();
    Ok(pixels)
}

/// Decode the base level of every face, in face order
pub fn decode_faces(resource: &Resource) -> Result<Vec<PixelBuffer>> {
    (0..resource.payload.face_count())
        .map(|face| decode(resource, face))
        .collect()
}

/// Encode one level that is already in storage orientation
fn encode_level(format: TextureFormat, level: &PixelBuffer) -> Vec<u8> {
    let (w, h) = (level.width() as usize, level.height() as usize);
    match format {
        TextureFormat::Etc1 => etc1::encode(level.as_bytes(), w, h, false),
        TextureFormat::Etc1A4 => etc1::encode(level.as_bytes(), w, h, true),
        _ => pixel::pack(format, &swizzle::tile(level.pixels(), w, h)),
    }
}

/// Encode a top-down image with a regenerated mip chain
///
/// Level 0 is `pixels`; each following level is a 2x2 box downsample of the
/// previous one. All levels are concatenated.
///
/// # Errors
///
/// - `UnsupportedFormat` if `format` is unknown
/// - `InvalidDimensions` if `mip_count` is 0 or longer than the full chain,
///   or if a level is not a multiple of the 8x8 tile
pub fn encode(pixels: &PixelBuffer, format: TextureFormat, mip_count: u32) -> Result<Vec<u8>> {
    if !format.is_supported() {
        return Err(Error::UnsupportedFormat(format));
    }
    let (width, height) = pixels.dimensions();
    validate_mip_count(width, height, mip_count)?;
    check_alignment(format, width, height, mip_count)?;

    let chain = generate_chain(pixels, mip_count)?;
    let mut out = Vec::with_capacity(face_size(format, width, height, mip_count));
    for mut level in chain {
        level.flip_vertical();
        out.extend_from_slice(&encode_level(format, &level));
    }
    Ok(out)
}

/// Encode one face (single buffer) or six faces (cubemap) into a payload
///
/// # Errors
///
/// `InvalidDimensions` for any other face count, `DimensionMismatch` if cube
/// faces differ in size, plus everything `encode` reports.
pub fn encode_payload(faces: &[PixelBuffer], format: TextureFormat, mip_count: u32) -> Result<Payload> {
    match faces {
        [single] => Ok(Payload::Single(encode(single, format, mip_count)?)),
        _ if faces.len() == CUBE_FACE_COUNT => {
            let expected = faces[0].dimensions();
            if let Some(face) = faces.iter().find(|f| f.dimensions() != expected) {
                return Err(Error::DimensionMismatch { expected, actual: face.dimensions() });
            }
            let mut encoded: [Vec<u8>; CUBE_FACE_COUNT] = Default::default();
            for (slot, face) in encoded.iter_mut().zip(faces) {
                *slot = encode(face, format, mip_count)?;
            }
            Ok(Payload::Cube(Box::new(encoded)))
        }
        _ => Err(Error::InvalidDimensions(format!(
            "payload needs 1 or {} faces, got {}", CUBE_FACE_COUNT, faces.len()
        ))),
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
