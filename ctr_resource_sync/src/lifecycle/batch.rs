//! Import requests and the parallel encode stage of batch imports
//!
//! A batch runs in three steps:
//!
//! 1. `ResourceLifecycleController::plan_batch` validates every request,
//!    snapshots the records being replaced and locks their names.
//! 2. `BatchPlan::run` decodes, composites and encodes on a rayon pool. It
//!    only reads snapshots, so the controller is free meanwhile.
//! 3. `ResourceLifecycleController::commit_batch` publishes the results on
//!    the controller's thread and releases the locks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use rayon::prelude::*;
use crate::codec::{self, PixelBuffer, TextureFormat};
use crate::compositor::{composite, EditMode};
use crate::config::BatchConfig;
use crate::error::{Error, Result};
use crate::resource::{OwnerId, Resource};
use super::image_io::SourceImage;
use super::name_lock::NameGuard;

/// New content for one texture
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Target name (created if absent, replaced if present)
    pub name: String,
    /// Replacement content
    pub image: SourceImage,
    /// Channels taken from `image`
    pub mode: EditMode,
    /// Storage format (default: existing format, then the image hint, then
    /// the configured default)
    pub format: Option<TextureFormat>,
    /// Mip levels (default: existing count, then the configured default)
    pub mip_count: Option<u32>,
}

impl ImportRequest {
    /// Full replacement of `name` by `image`
    pub fn new(name: impl Into<String>, image: SourceImage) -> Self {
        Self {
            name: name.into(),
            image,
            mode: EditMode::Default,
            format: None,
            mip_count: None,
        }
    }

    /// Touch only the channels selected by `mode`
    pub fn with_mode(mut self, mode: EditMode) -> Self {
        self.mode = mode;
        self
    }

    /// Force the storage format
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Force the mip count
    pub fn with_mip_count(mut self, mip_count: u32) -> Self {
        self.mip_count = Some(mip_count);
        self
    }
}

/// Cooperative cancellation flag shared with a running batch
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Progress report sent after each encoded item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Items finished so far (successfully or not)
    pub completed: usize,
    /// Items in the batch
    pub total: usize,
}

/// Fully resolved encode work for one name
#[derive(Debug, Clone)]
pub(crate) struct EncodeJob {
    pub(crate) name: String,
    pub(crate) image: SourceImage,
    pub(crate) mode: EditMode,
    pub(crate) format: TextureFormat,
    pub(crate) mip_count: u32,
    /// Snapshot of the record being replaced, when channels are kept from it
    pub(crate) base: Option<Resource>,
}

impl EncodeJob {
    /// Composite against the snapshot (if any) and encode
    pub(crate) fn encode(&self) -> Result<Resource> {
        let faces = match &self.base {
            Some(base) if self.mode != EditMode::Default => self.composite_faces(base)?,
            _ => self.image.faces().to_vec(),
        };
        let payload = codec::encode_payload(&faces, self.format, self.mip_count)?;
        // Size of the faces actually encoded
        let (width, height) = faces[0].dimensions();
        Ok(Resource::texture(
            self.name.clone(),
            width,
            height,
            self.format,
            self.mip_count,
            payload,
        ))
    }

    // Face i of the new image is combined with face i of the old content.
    fn composite_faces(&self, base: &Resource) -> Result<Vec<PixelBuffer>> {
        let old_faces = codec::decode_faces(base)?;
        if old_faces.len() != self.image.face_count() {
            return Err(Error::InvalidDimensions(format!(
                "'{}' has {} face(s), replacement has {}",
                self.name, old_faces.len(), self.image.face_count()
            )));
        }
        old_faces
            .iter()
            .zip(self.image.faces())
            .map(|(old, new)| composite(old, new, self.mode))
            .collect()
    }
}

/// Validated batch, holding the locks on its names
pub struct BatchPlan {
    pub(crate) owner: OwnerId,
    pub(crate) jobs: Vec<EncodeJob>,
    pub(crate) guards: Vec<NameGuard>,
}

impl BatchPlan {
    /// Number of items
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Names in request order
    pub fn names(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.name.as_str()).collect()
    }

    /// Encode every item on a worker pool
    ///
    /// `progress` is called from worker threads after each item. Per-item
    /// failures are kept in the result; the batch as a whole only fails when
    /// the pool cannot be built or `cancel` fires. A cancelled batch drops
    /// its locks and nothing is committed.
    ///
    /// # Errors
    ///
    /// `Cancelled`, or the pool errors of `BatchConfig::build_pool`.
    pub fn run<F>(self, config: &BatchConfig, cancel: &CancelToken, progress: F) -> Result<EncodedBatch>
    where
        F: Fn(BatchProgress) + Sync,
    {
        let pool = config.build_pool()?;
        let total = self.jobs.len();
        let completed = AtomicUsize::new(0);

        crate::ctr_debug!("ctr::Batch", "Encoding {} item(s) on {} thread(s)",
            total, pool.current_num_threads());

        let results: Vec<(String, Result<Resource>)> = pool.install(|| {
            self.jobs
                .par_iter()
                .map(|job| {
                    if cancel.is_cancelled() {
                        return (job.name.clone(), Err(Error::Cancelled));
                    }
                    let result = job.encode();
                    let done = completed.fetch_add(1, Ordering::AcqRel) + 1;
                    progress(BatchProgress { completed: done, total });
                    (job.name.clone(), result)
                })
                .collect()
        });

        if cancel.is_cancelled() {
            crate::ctr_info!("ctr::Batch", "Batch of {} item(s) cancelled", total);
            return Err(Error::Cancelled);
        }

        Ok(EncodedBatch {
            owner: self.owner,
            results,
            guards: self.guards,
        })
    }
}

/// Encode results waiting to be committed
pub struct EncodedBatch {
    pub(crate) owner: OwnerId,
    pub(crate) results: Vec<(String, Result<Resource>)>,
    pub(crate) guards: Vec<NameGuard>,
}

impl EncodedBatch {
    /// Number of items
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of items that failed to encode
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|(_, result)| result.is_err()).count()
    }
}

/// Outcome of a committed batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Names that did not exist before
    pub created: Vec<String>,
    /// Names whose content was replaced
    pub replaced: Vec<String>,
    /// Names left untouched, with the reason
    pub failed: Vec<(String, Error)>,
}

impl BatchReport {
    /// Whether every item was committed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of committed items
    pub fn committed(&self) -> usize {
        self.created.len() + self.replaced.len()
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
