//! Cache tiers
//!
//! Three independent name-keyed tiers (global index, render table, thumbnail
//! cache) and the `ResourceCacheSet` that keeps one owner's view of them
//! consistent.

mod tier;
mod global_index;
mod render_table;
mod thumbnail_cache;
mod cache_set;

pub use tier::NamedTier;
pub use global_index::{GlobalIndex, SharedGlobalIndex};
pub use render_table::RenderTable;
pub use thumbnail_cache::{ThumbnailCache, ThumbnailProvider, fit_preview};
pub use cache_set::{ResourceCacheSet, PreparedEntry, Tiers};
