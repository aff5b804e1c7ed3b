/*!
# CTR Resource Sync

Core of the CTR (PICA200) container editor: the texture codec pipeline and the
named-resource cache synchronization protocol.

Resources (textures and lookup tables) are owned by a per-file collection, while
three independent caches hold derived views keyed by name. Every lifecycle
operation (import, replace, rename, remove) keeps those caches name-consistent.

## Architecture

- **codec**: PICA200 pixel formats, ETC1, mip-chain generation
- **compositor**: channel-selective compositing (color only / alpha only)
- **cache**: global index, render-binding table, thumbnail cache
- **lifecycle**: the controller driving codec, compositor and caches
- **Runtime**: process-wide singleton holding the global indices and the logger

Collaborators (renderer, thumbnail UI) are reached through the `Renderer` and
`ThumbnailProvider` traits.
*/

// Internal modules
mod error;
mod runtime;
pub mod log;
pub mod config;
pub mod codec;
pub mod compositor;
pub mod resource;
pub mod renderer;
pub mod cache;
pub mod lifecycle;

// Main ctr namespace module
pub mod ctr {
    // Error types
    pub use crate::error::{Error, Result};

    // Runtime singleton
    pub use crate::runtime::Runtime;

    // Configuration
    pub use crate::config::{CacheConfig, BatchConfig};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, FilteredLogger};
    }

    // Codec sub-module
    pub mod codec {
        pub use crate::codec::*;
    }

    // Compositor sub-module
    pub mod compositor {
        pub use crate::compositor::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Renderer collaborator sub-module
    pub mod render {
        pub use crate::renderer::*;
    }

    // Cache tiers sub-module
    pub mod cache {
        pub use crate::cache::*;
    }

    // Lifecycle sub-module
    pub mod lifecycle {
        pub use crate::lifecycle::*;
    }
}

// Re-export image crate at crate root (previews are `image::RgbaImage`)
pub use image;
