//! Resource lifecycle
//!
//! The controller that applies import / replace / rename / remove / add /
//! clear / load / close / export to one file's resources, the batch import
//! pipeline, and image file I/O.

mod controller;
mod batch;
mod name_lock;
mod image_io;

pub use controller::{ResourceLifecycleController, ImportOutcome};
pub use batch::{
    ImportRequest, CancelToken, BatchProgress, BatchPlan, EncodedBatch, BatchReport,
};
pub use name_lock::{NameLocks, NameGuard};
pub use image_io::{SourceImage, load_image, save_image};
