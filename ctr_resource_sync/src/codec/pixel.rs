/// Per-pixel (non block-compressed) PICA200 formats
///
/// Both directions work on one mip level as a plain texel stream, in the order
/// it is stored. Tiling and orientation are handled by the caller.

use super::format::TextureFormat;

/// Expand an n-bit channel to 8 bits by replicating its high bits
#[inline]
pub(crate) fn expand(value: u32, bits: u32) -> u8 {
    match bits {
        4 => (value * 0x11) as u8,
        5 => ((value << 3) | (value >> 2)) as u8,
        6 => ((value << 2) | (value >> 4)) as u8,
        _ => value as u8,
    }
}

/// Quantize an 8-bit channel to n bits, rounding to nearest
#[inline]
pub(crate) fn quantize(value: u8, bits: u32) -> u32 {
    let max = (1u32 << bits) - 1;
    (value as u32 * max + 127) / 255
}

/// Rec.601 luminance with integer weights, rounded
#[inline]
pub(crate) fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// Unpack `count` pixels of `format` into RGBA8
///
/// `src` must hold at least `format.level_size(...)` bytes for `count` pixels.
pub(crate) fn unpack(format: TextureFormat, src: &[u8], count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * 4);
    for i in 0..count {
        let px = match format {
            TextureFormat::Rgba8 => {
                let s = &src[i * 4..i * 4 + 4];
                [s[3], s[2], s[1], s[0]]
            }
            TextureFormat::Rgb8 => {
                let s = &src[i * 3..i * 3 + 3];
                [s[2], s[1], s[0], 0xFF]
            }
            TextureFormat::Rgba5551 => {
                let v = read_u16(src, i);
                [
                    expand((v >> 11) & 0x1F, 5),
                    expand((v >> 6) & 0x1F, 5),
                    expand((v >> 1) & 0x1F, 5),
                    if v & 1 == 1 { 0xFF } else { 0 },
                ]
            }
            TextureFormat::Rgb565 => {
                let v = read_u16(src, i);
                [
                    expand((v >> 11) & 0x1F, 5),
                    expand((v >> 5) & 0x3F, 6),
                    expand(v & 0x1F, 5),
                    0xFF,
                ]
            }
            TextureFormat::Rgba4 => {
                let v = read_u16(src, i);
                [
                    expand((v >> 12) & 0xF, 4),
                    expand((v >> 8) & 0xF, 4),
                    expand((v >> 4) & 0xF, 4),
                    expand(v & 0xF, 4),
                ]
            }
            TextureFormat::La8 => {
                let (a, l) = (src[i * 2], src[i * 2 + 1]);
                [l, l, l, a]
            }
            TextureFormat::HiLo8 => {
                let (g, r) = (src[i * 2], src[i * 2 + 1]);
                [r, g, 0, 0xFF]
            }
            TextureFormat::L8 => {
                let l = src[i];
                [l, l, l, 0xFF]
            }
            TextureFormat::A8 => [0xFF, 0xFF, 0xFF, src[i]],
            TextureFormat::La4 => {
                let v = src[i] as u32;
                let l = expand(v >> 4, 4);
                [l, l, l, expand(v & 0xF, 4)]
            }
            TextureFormat::L4 => {
                let l = expand(read_nibble(src, i), 4);
                [l, l, l, 0xFF]
            }
            TextureFormat::A4 => [0xFF, 0xFF, 0xFF, expand(read_nibble(src, i), 4)],
            // Block formats and unknown ids never reach this path
            TextureFormat::Etc1 | TextureFormat::Etc1A4 | TextureFormat::Unknown(_) => [0, 0, 0, 0],
        };
        out.extend_from_slice(&px);
    }
    out
}

/// Pack RGBA8 pixels into `format`
pub(crate) fn pack(format: TextureFormat, rgba: &[[u8; 4]]) -> Vec<u8> {
    let mut out = vec![0u8; format.level_size(rgba.len() as u32, 1)];
    for (i, &[r, g, b, a]) in rgba.iter().enumerate() {
        match format {
            TextureFormat::Rgba8 => out[i * 4..i * 4 + 4].copy_from_slice(&[a, b, g, r]),
            TextureFormat::Rgb8 => out[i * 3..i * 3 + 3].copy_from_slice(&[b, g, r]),
            TextureFormat::Rgba5551 => {
                let v = quantize(r, 5) << 11
                    | quantize(g, 5) << 6
                    | quantize(b, 5) << 1
                    | (a >= 0x80) as u32;
                write_u16(&mut out, i, v);
            }
            TextureFormat::Rgb565 => {
                let v = quantize(r, 5) << 11 | quantize(g, 6) << 5 | quantize(b, 5);
                write_u16(&mut out, i, v);
            }
            TextureFormat::Rgba4 => {
                let v = quantize(r, 4) << 12
                    | quantize(g, 4) << 8
                    | quantize(b, 4) << 4
                    | quantize(a, 4);
                write_u16(&mut out, i, v);
            }
            TextureFormat::La8 => {
                out[i * 2] = a;
                out[i * 2 + 1] = luminance(r, g, b);
            }
            TextureFormat::HiLo8 => {
                out[i * 2] = g;
                out[i * 2 + 1] = r;
            }
            TextureFormat::L8 => out[i] = luminance(r, g, b),
            TextureFormat::A8 => out[i] = a,
            TextureFormat::La4 => {
                out[i] = (quantize(luminance(r, g, b), 4) << 4 | quantize(a, 4)) as u8;
            }
            TextureFormat::L4 => write_nibble(&mut out, i, quantize(luminance(r, g, b), 4)),
            TextureFormat::A4 => write_nibble(&mut out, i, quantize(a, 4)),
            TextureFormat::Etc1 | TextureFormat::Etc1A4 | TextureFormat::Unknown(_) => {}
        }
    }
    out
}

#[inline]
fn read_u16(src: &[u8], index: usize) -> u32 {
    u16::from_le_bytes([src[index * 2], src[index * 2 + 1]]) as u32
}

#[inline]
fn write_u16(dst: &mut [u8], index: usize, value: u32) {
    dst[index * 2..index * 2 + 2].copy_from_slice(&(value as u16).to_le_bytes());
}

// Two pixels per byte, low nibble first
#[inline]
fn read_nibble(src: &[u8], index: usize) -> u32 {
    let byte = src[index / 2] as u32;
    if index % 2 == 0 { byte & 0xF } else { byte >> 4 }
}

#[inline]
fn write_nibble(dst: &mut [u8], index: usize, value: u32) {
    let shift = if index % 2 == 0 { 0 } else { 4 };
    dst[index / 2] |= ((value & 0xF) << shift) as u8;
}
