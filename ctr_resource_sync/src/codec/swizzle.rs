/// PICA200 tiled texel order
///
/// Every level is stored as 8x8 tiles in raster order (in storage rows, so the
/// first tile row is the bottom of the image). Inside a tile texels follow a
/// Z-order curve: index bits interleave x0 y0 x1 y1 x2 y2 from the lowest bit.
/// ETC1 levels group their 4x4 blocks 2x2 per tile, in the same Z order.

/// Side of a storage tile, in texels
pub const TILE_SIZE: u32 = 8;

const TILE: usize = TILE_SIZE as usize;
const TILE_TEXELS: usize = TILE * TILE;

/// Z-order index of (x, y) inside one tile
#[inline]
pub(crate) fn morton(x: usize, y: usize) -> usize {
    let mut index = 0;
    for bit in 0..3 {
        index |= ((x >> bit) & 1) << (2 * bit);
        index |= ((y >> bit) & 1) << (2 * bit + 1);
    }
    index
}

/// Position in the tiled stream of texel (x, y) of a `width`-wide level
#[inline]
pub(crate) fn tiled_index(width: usize, x: usize, y: usize) -> usize {
    let tile = (y / TILE) * (width / TILE) + x / TILE;
    tile * TILE_TEXELS + morton(x % TILE, y % TILE)
}

/// Reorder a tiled texel stream into rows. Sides must be multiples of 8.
pub(crate) fn untile<T: Copy + Default>(tiled: &[T], width: usize, height: usize) -> Vec<T> {
    let mut linear = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            linear[y * width + x] = tiled[tiled_index(width, x, y)];
        }
    }
    linear
}

/// Reorder rows of texels into the tiled stream. Sides must be multiples of 8.
pub(crate) fn tile<T: Copy + Default>(linear: &[T], width: usize, height: usize) -> Vec<T> {
    let mut tiled = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            tiled[tiled_index(width, x, y)] = linear[y * width + x];
        }
    }
    tiled
}

/// Block coordinates (in 4x4 blocks) of the `index`-th ETC1 block
#[inline]
pub(crate) fn block_position(index: usize, width: usize) -> (usize, usize) {
    let tiles_x = width / TILE;
    let (tile, within) = (index / 4, index % 4);
    let (tx, ty) = (tile % tiles_x, tile / tiles_x);
    (tx * 2 + (within & 1), ty * 2 + (within >> 1))
}
