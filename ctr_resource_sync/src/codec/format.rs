/// PICA200 texture formats

/// Texture format as stored in the container
///
/// Ids match the PICA200 hardware format codes. `Unknown` carries ids the
/// container library reported but this codec cannot decode or produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, stored A,B,G,R
    Rgba8,
    /// 8-bit RGB, stored B,G,R
    Rgb8,
    /// 5-5-5-1 packed little-endian u16
    Rgba5551,
    /// 5-6-5 packed little-endian u16
    Rgb565,
    /// 4-4-4-4 packed little-endian u16
    Rgba4,
    /// 8-bit luminance + alpha, stored A,L
    La8,
    /// Two 8-bit channels (normal maps), stored G,R
    HiLo8,
    /// 8-bit luminance
    L8,
    /// 8-bit alpha
    A8,
    /// 4-bit luminance + 4-bit alpha in one byte
    La4,
    /// 4-bit luminance, two pixels per byte
    L4,
    /// 4-bit alpha, two pixels per byte
    A4,
    /// ETC1 block compression (4x4 blocks, 8 bytes each)
    Etc1,
    /// ETC1 with a 4-bit explicit alpha block (16 bytes per 4x4 block)
    Etc1A4,
    /// Format id not understood by this codec
    Unknown(u32),
}

impl TextureFormat {
    /// Every format the codec can decode and encode
    pub const SUPPORTED: [TextureFormat; 14] = [
        TextureFormat::Rgba8,
        TextureFormat::Rgb8,
        TextureFormat::Rgba5551,
        TextureFormat::Rgb565,
        TextureFormat::Rgba4,
        TextureFormat::La8,
        TextureFormat::HiLo8,
        TextureFormat::L8,
        TextureFormat::A8,
        TextureFormat::La4,
        TextureFormat::L4,
        TextureFormat::A4,
        TextureFormat::Etc1,
        TextureFormat::Etc1A4,
    ];

    /// Map a hardware format id to a format
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => TextureFormat::Rgba8,
            1 => TextureFormat::Rgb8,
            2 => TextureFormat::Rgba5551,
            3 => TextureFormat::Rgb565,
            4 => TextureFormat::Rgba4,
            5 => TextureFormat::La8,
            6 => TextureFormat::HiLo8,
            7 => TextureFormat::L8,
            8 => TextureFormat::A8,
            9 => TextureFormat::La4,
            10 => TextureFormat::L4,
            11 => TextureFormat::A4,
            12 => TextureFormat::Etc1,
            13 => TextureFormat::Etc1A4,
            other => TextureFormat::Unknown(other),
        }
    }

    /// Hardware format id
    pub fn id(&self) -> u32 {
        match self {
            TextureFormat::Rgba8 => 0,
            TextureFormat::Rgb8 => 1,
            TextureFormat::Rgba5551 => 2,
            TextureFormat::Rgb565 => 3,
            TextureFormat::Rgba4 => 4,
            TextureFormat::La8 => 5,
            TextureFormat::HiLo8 => 6,
            TextureFormat::L8 => 7,
            TextureFormat::A8 => 8,
            TextureFormat::La4 => 9,
            TextureFormat::L4 => 10,
            TextureFormat::A4 => 11,
            TextureFormat::Etc1 => 12,
            TextureFormat::Etc1A4 => 13,
            TextureFormat::Unknown(id) => *id,
        }
    }

    /// Bits used per pixel (0 for unknown formats)
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8 => 32,
            TextureFormat::Rgb8 => 24,
            TextureFormat::Rgba5551
            | TextureFormat::Rgb565
            | TextureFormat::Rgba4
            | TextureFormat::La8
            | TextureFormat::HiLo8 => 16,
            TextureFormat::L8 | TextureFormat::A8 | TextureFormat::La4 => 8,
            TextureFormat::L4 | TextureFormat::A4 => 4,
            TextureFormat::Etc1 => 4,
            TextureFormat::Etc1A4 => 8,
            TextureFormat::Unknown(_) => 0,
        }
    }

    /// Side of the square compression block (1 for per-pixel formats)
    pub fn block_size(&self) -> u32 {
        match self {
            TextureFormat::Etc1 | TextureFormat::Etc1A4 => 4,
            _ => 1,
        }
    }

    /// Whether the format is block compressed
    pub fn is_block_compressed(&self) -> bool {
        self.block_size() > 1
    }

    /// Whether decode(encode(decode(x))) reproduces decode(x) exactly
    pub fn is_lossless(&self) -> bool {
        !self.is_block_compressed() && self.is_supported()
    }

    /// Whether this codec can decode and encode the format
    pub fn is_supported(&self) -> bool {
        !matches!(self, TextureFormat::Unknown(_))
    }

    /// Whether the format stores an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            TextureFormat::Rgba8
                | TextureFormat::Rgba5551
                | TextureFormat::Rgba4
                | TextureFormat::La8
                | TextureFormat::A8
                | TextureFormat::La4
                | TextureFormat::A4
                | TextureFormat::Etc1A4
        )
    }

    /// Byte size of one level of `width` x `height` pixels
    ///
    /// For 4-bit formats with an odd pixel count the trailing nibble is padded
    /// to a full byte.
    pub fn level_size(&self, width: u32, height: u32) -> usize {
        let bits = width as usize * height as usize * self.bits_per_pixel() as usize;
        bits.div_ceil(8)
    }
}
