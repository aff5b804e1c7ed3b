/// ETC1 / ETC1A4 block codec
///
/// Each 4x4 block is a little-endian u64. Bit layout of the color word:
///
/// - bits 63..40: base colors (individual: R1 R2 G1 G2 B1 B2 as 4-bit pairs;
///   differential: R 5 + dR 3, G 5 + dG 3, B 5 + dB 3)
/// - bits 39..37 / 36..34: modifier table of sub-block 1 / 2
/// - bit 33: differential flag, bit 32: flip flag
/// - bits 31..16 / 15..0: MSB / LSB of the 2-bit pixel indices
///
/// Pixel indices are column-major (`x * 4 + y`). ETC1A4 prefixes every block
/// with a u64 of 4-bit alphas in the same column-major order. Blocks of a level
/// are stored 2x2 per 8x8 tile (see `swizzle::block_position`), so both level
/// sides must be multiples of 8.
///
/// Decoding handles both base-color modes; the encoder emits individual mode.

use super::pixel::{expand, quantize};
use super::swizzle::block_position;

const MODIFIERS: [[i32; 2]; 8] = [
    [2, 8],
    [5, 17],
    [9, 29],
    [13, 42],
    [18, 60],
    [24, 80],
    [33, 106],
    [47, 183],
];

/// Index value -> signed modifier: 0 = +small, 1 = +large, 2 = -small, 3 = -large
#[inline]
fn modifier(table: usize, index: usize) -> i32 {
    let [small, large] = MODIFIERS[table];
    match index {
        0 => small,
        1 => large,
        2 => -small,
        _ => -large,
    }
}

/// Whether pixel (x, y) belongs to the second sub-block
#[inline]
fn in_second_subblock(flip: bool, x: usize, y: usize) -> bool {
    if flip { y >= 2 } else { x >= 2 }
}

#[inline]
fn apply(base: [i32; 3], delta: i32) -> [u8; 3] {
    [
        (base[0] + delta).clamp(0, 255) as u8,
        (base[1] + delta).clamp(0, 255) as u8,
        (base[2] + delta).clamp(0, 255) as u8,
    ]
}

/// Sign-extend a 3-bit two's complement delta
#[inline]
fn delta3(bits: u64) -> i32 {
    let v = (bits & 0x7) as i32;
    if v >= 4 { v - 8 } else { v }
}

/// Decode one color block into 16 RGB texels, indexed `y * 4 + x`
fn decode_block(word: u64) -> [[u8; 3]; 16] {
    let diff = (word >> 33) & 1 == 1;
    let flip = (word >> 32) & 1 == 1;
    let table1 = ((word >> 37) & 0x7) as usize;
    let table2 = ((word >> 34) & 0x7) as usize;

    let (base1, base2) = if diff {
        let r = (word >> 59) & 0x1F;
        let g = (word >> 51) & 0x1F;
        let b = (word >> 43) & 0x1F;
        let r2 = (r as i32 + delta3(word >> 56)).clamp(0, 31) as u32;
        let g2 = (g as i32 + delta3(word >> 48)).clamp(0, 31) as u32;
        let b2 = (b as i32 + delta3(word >> 40)).clamp(0, 31) as u32;
        (
            [expand(r as u32, 5) as i32, expand(g as u32, 5) as i32, expand(b as u32, 5) as i32],
            [expand(r2, 5) as i32, expand(g2, 5) as i32, expand(b2, 5) as i32],
        )
    } else {
        let nib = |shift: u32| expand(((word >> shift) & 0xF) as u32, 4) as i32;
        ([nib(60), nib(52), nib(44)], [nib(56), nib(48), nib(40)])
    };

    let mut out = [[0u8; 3]; 16];
    for x in 0..4 {
        for y in 0..4 {
            let bit = x * 4 + y;
            let msb = ((word >> (16 + bit)) & 1) as usize;
            let lsb = ((word >> bit) & 1) as usize;
            let index = (msb << 1) | lsb;
            let (base, table) = if in_second_subblock(flip, x, y) {
                (base2, table2)
            } else {
                (base1, table1)
            };
            out[y * 4 + x] = apply(base, modifier(table, index));
        }
    }
    out
}

/// Best (table, indices, squared error) for one sub-block around `base`
fn fit_subblock(texels: &[[u8; 4]; 16], flip: bool, second: bool, base: [i32; 3]) -> (usize, [usize; 16], u64) {
    let mut best = (0usize, [0usize; 16], u64::MAX);
    for table in 0..MODIFIERS.len() {
        let mut indices = [0usize; 16];
        let mut total = 0u64;
        for x in 0..4 {
            for y in 0..4 {
                if in_second_subblock(flip, x, y) != second {
                    continue;
                }
                let px = texels[y * 4 + x];
                let mut best_index = 0;
                let mut best_err = u64::MAX;
                for index in 0..4 {
                    let c = apply(base, modifier(table, index));
                    let err: u64 = (0..3)
                        .map(|ch| {
                            let d = c[ch] as i64 - px[ch] as i64;
                            (d * d) as u64
                        })
                        .sum();
                    if err < best_err {
                        best_err = err;
                        best_index = index;
                    }
                }
                indices[x * 4 + y] = best_index;
                total += best_err;
            }
        }
        if total < best.2 {
            best = (table, indices, total);
        }
    }
    best
}

/// Average color of one sub-block, quantized to 4 bits per channel
fn subblock_base(texels: &[[u8; 4]; 16], flip: bool, second: bool) -> [u32; 3] {
    let mut sum = [0u32; 3];
    for x in 0..4 {
        for y in 0..4 {
            if in_second_subblock(flip, x, y) == second {
                let px = texels[y * 4 + x];
                for ch in 0..3 {
                    sum[ch] += px[ch] as u32;
                }
            }
        }
    }
    // 8 texels per sub-block
    sum.map(|s| quantize(((s + 4) / 8) as u8, 4))
}

/// Encode 16 RGBA texels (indexed `y * 4 + x`) as an individual-mode block
fn encode_block(texels: &[[u8; 4]; 16]) -> u64 {
    let mut best_word = 0u64;
    let mut best_err = u64::MAX;

    for flip in [false, true] {
        let q1 = subblock_base(texels, flip, false);
        let q2 = subblock_base(texels, flip, true);
        let base1 = q1.map(|v| expand(v, 4) as i32);
        let base2 = q2.map(|v| expand(v, 4) as i32);
        let (table1, idx1, err1) = fit_subblock(texels, flip, false, base1);
        let (table2, idx2, err2) = fit_subblock(texels, flip, true, base2);

        let err = err1 + err2;
        if err >= best_err {
            continue;
        }
        best_err = err;

        let mut word = (q1[0] as u64) << 60
            | (q2[0] as u64) << 56
            | (q1[1] as u64) << 52
            | (q2[1] as u64) << 48
            | (q1[2] as u64) << 44
            | (q2[2] as u64) << 40
            | (table1 as u64) << 37
            | (table2 as u64) << 34
            | (flip as u64) << 32;
        for x in 0..4 {
            for y in 0..4 {
                let bit = x * 4 + y;
                let index = (if in_second_subblock(flip, x, y) { idx2[bit] } else { idx1[bit] }) as u64;
                word |= (index >> 1) << (16 + bit);
                word |= (index & 1) << bit;
            }
        }
        best_word = word;
    }
    best_word
}

/// Gather the 4x4 texels of block (bx, by) from a linear RGBA8 level
fn gather(rgba: &[u8], width: usize, bx: usize, by: usize) -> [[u8; 4]; 16] {
    let mut texels = [[0u8; 4]; 16];
    for y in 0..4 {
        for x in 0..4 {
            let offset = ((by * 4 + y) * width + bx * 4 + x) * 4;
            texels[y * 4 + x].copy_from_slice(&rgba[offset..offset + 4]);
        }
    }
    texels
}

/// Decode one ETC1 / ETC1A4 level (dimensions multiple of 8) into RGBA8
pub(crate) fn decode(src: &[u8], width: usize, height: usize, with_alpha: bool) -> Vec<u8> {
    let block_bytes = if with_alpha { 16 } else { 8 };
    let block_count = (width / 4) * (height / 4);
    let mut out = vec![0u8; width * height * 4];

    for (block_index, block) in src.chunks_exact(block_bytes).take(block_count).enumerate() {
        let (bx, by) = block_position(block_index, width);
        let (alpha_word, color_bytes) = if with_alpha {
            let mut a = [0u8; 8];
            a.copy_from_slice(&block[..8]);
            (Some(u64::from_le_bytes(a)), &block[8..])
        } else {
            (None, block)
        };
        let mut c = [0u8; 8];
        c.copy_from_slice(color_bytes);
        let texels = decode_block(u64::from_le_bytes(c));

        for y in 0..4 {
            for x in 0..4 {
                let alpha = match alpha_word {
                    Some(word) => expand(((word >> ((x * 4 + y) * 4)) & 0xF) as u32, 4),
                    None => 0xFF,
                };
                let [r, g, b] = texels[y * 4 + x];
                let offset = ((by * 4 + y) * width + bx * 4 + x) * 4;
                out[offset..offset + 4].copy_from_slice(&[r, g, b, alpha]);
            }
        }
    }
    out
}

/// Encode one RGBA8 level (dimensions multiple of 8) as ETC1 / ETC1A4
pub(crate) fn encode(rgba: &[u8], width: usize, height: usize, with_alpha: bool) -> Vec<u8> {
    let block_bytes = if with_alpha { 16 } else { 8 };
    let block_count = (width / 4) * (height / 4);
    let mut out = Vec::with_capacity(block_count * block_bytes);

    for block_index in 0..block_count {
        let (bx, by) = block_position(block_index, width);
        let texels = gather(rgba, width, bx, by);
        if with_alpha {
            let mut alpha_word = 0u64;
            for x in 0..4 {
                for y in 0..4 {
                    let a = quantize(texels[y * 4 + x][3], 4) as u64;
                    alpha_word |= a << ((x * 4 + y) * 4);
                }
            }
            out.extend_from_slice(&alpha_word.to_le_bytes());
        }
        out.extend_from_slice(&encode_block(&texels).to_le_bytes());
    }
    out
}

#[cfg(test)]
#[path = "etc1_tests.rs"]
mod tests;
