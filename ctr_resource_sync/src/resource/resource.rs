/// Resource records: textures and lookup tables owned by an open file.
///
/// A `Resource` is the unit every cache tier is keyed on. Its payload sits
/// behind an `Arc` so that renaming re-inserts the very same bytes under the
/// new name instead of copying them.

use std::sync::Arc;
use crate::codec::TextureFormat;

// ===== TRAIT =====

/// Anything addressed by a unique name within its container
pub trait Named {
    /// Unique name (non-empty)
    fn name(&self) -> &str;

    /// Change the name; content is left untouched
    fn set_name(&mut self, name: String);
}

// ===== DATA TYPES =====

/// What kind of asset a resource is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Image texture (2D or cubemap)
    Texture,
    /// Fragment lighting lookup table
    Lut,
}

impl ResourceKind {
    /// Base name used for blank resources created by `add_blank`
    pub fn blank_base_name(&self) -> &'static str {
        match self {
            ResourceKind::Texture => "NewTexture",
            ResourceKind::Lut => "NewLut",
        }
    }
}

/// Number of faces of a cubemap payload
pub const CUBE_FACE_COUNT: usize = 6;

/// Number of entries of a lookup table
pub const LUT_ENTRY_COUNT: u32 = 256;

/// Format id reported for lookup tables (no pixel codec)
pub const LUT_FORMAT_ID: u32 = 0xFFFF_FFFF;

/// Encoded resource bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// One buffer holding every mip level back to back
    Single(Vec<u8>),
    /// Six independently encoded faces (+X, -X, +Y, -Y, +Z, -Z)
    Cube(Box<[Vec<u8>; CUBE_FACE_COUNT]>),
}

impl Payload {
    /// 1 for single buffers, 6 for cubemaps
    pub fn face_count(&self) -> usize {
        match self {
            Payload::Single(_) => 1,
            Payload::Cube(_) => CUBE_FACE_COUNT,
        }
    }

    /// Whether this payload is a cubemap
    pub fn is_cube(&self) -> bool {
        matches!(self, Payload::Cube(_))
    }

    /// Bytes of one face (`None` if out of range)
    pub fn face(&self, index: usize) -> Option<&[u8]> {
        match self {
            Payload::Single(data) if index == 0 => Some(data),
            Payload::Single(_) => None,
            Payload::Cube(faces) => faces.get(index).map(|f| f.as_slice()),
        }
    }

    /// Total byte size over all faces
    pub fn byte_len(&self) -> usize {
        match self {
            Payload::Single(data) => data.len(),
            Payload::Cube(faces) => faces.iter().map(|f| f.len()).sum(),
        }
    }
}

/// A named texture or lookup table
///
/// For lookup tables `width` is the entry count, `height` is 1 and `format`
/// is `Unknown(LUT_FORMAT_ID)`.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Unique name, also the cross-file lookup key
    pub name: String,
    /// Texture or lookup table
    pub kind: ResourceKind,
    /// Base level width in pixels
    pub width: u32,
    /// Base level height in pixels
    pub height: u32,
    /// Storage format of the payload
    pub format: TextureFormat,
    /// Number of mip levels stored per face
    pub mip_count: u32,
    /// Encoded bytes, shared between tiers
    pub payload: Arc<Payload>,
}

impl Resource {
    /// Build a texture record
    pub fn texture(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: TextureFormat,
        mip_count: u32,
        payload: Payload,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ResourceKind::Texture,
            width,
            height,
            format,
            mip_count,
            payload: Arc::new(payload),
        }
    }

    /// Build a lookup table record from its raw sampler bytes
    pub fn lut(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind: ResourceKind::Lut,
            width: LUT_ENTRY_COUNT,
            height: 1,
            format: TextureFormat::Unknown(LUT_FORMAT_ID),
            mip_count: 1,
            payload: Arc::new(Payload::Single(data)),
        }
    }

    /// Whether the payload is a cubemap
    pub fn is_cube(&self) -> bool {
        self.payload.is_cube()
    }

    /// Whether `other` shares this record's payload object
    pub fn shares_payload(&self, other: &Resource) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }

    /// Same record under another name (payload shared, not copied)
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Named for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Tag of the open file (owning collection) that contributed a global entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub(crate) u64);

impl OwnerId {
    /// Wrap a raw tag (normally allocated by `Runtime::allocate_owner`)
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw tag value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}
