//! Resource records and their owning collection
//!
//! Provides the `Resource` record shared by every cache tier and the
//! per-file `ResourceCollection` that owns them.

mod resource;
mod collection;

pub use resource::{
    Named, Resource, ResourceKind, Payload, OwnerId,
    CUBE_FACE_COUNT, LUT_ENTRY_COUNT, LUT_FORMAT_ID,
};
pub use collection::{ResourceCollection, ResourceKey};
