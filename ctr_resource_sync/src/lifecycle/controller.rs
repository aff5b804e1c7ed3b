//! Resource lifecycle controller
//!
//! Owns one file's resource collection of one kind and drives every edit
//! through codec, compositor and the cache tiers. Each operation validates
//! and computes everything fallible first (decode, composite, encode, render
//! binding, preview), then commits to the collection and the tiers. Either
//! the whole operation is visible afterwards or none of it is.

use std::path::Path;
use std::sync::{Arc, Mutex};
use crate::cache::{PreparedEntry, ResourceCacheSet, SharedGlobalIndex, ThumbnailProvider, Tiers};
use crate::codec::{self, aligned_mip_count, PixelBuffer, TextureFormat};
use crate::compositor::{extract, EditMode};
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::resource::{OwnerId, Resource, ResourceCollection, ResourceKind, LUT_ENTRY_COUNT, LUT_FORMAT_ID};
use crate::runtime::Runtime;
use super::batch::{BatchPlan, BatchReport, EncodeJob, EncodedBatch, ImportRequest};
use super::image_io;
use super::name_lock::{NameGuard, NameLocks};

/// Bytes per lookup-table entry (one f32 sample)
const LUT_ENTRY_SIZE: usize = 4;

/// Whether an import created a new record or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The name did not exist
    Created,
    /// The name existed and its content was replaced
    Replaced,
}

/// One open file's resources of one kind, kept in sync with the caches
pub struct ResourceLifecycleController {
    kind: ResourceKind,
    config: CacheConfig,
    collection: ResourceCollection<Resource>,
    cache: ResourceCacheSet,
    locks: NameLocks,
}

impl ResourceLifecycleController {
    /// Create a controller over an explicit global index and owner tag
    pub fn new(
        kind: ResourceKind,
        owner: OwnerId,
        global: SharedGlobalIndex,
        renderer: Arc<Mutex<dyn Renderer>>,
        config: CacheConfig,
    ) -> Self {
        let cache = ResourceCacheSet::new(kind, owner, global, renderer, &config);
        Self {
            kind,
            config,
            collection: ResourceCollection::new(),
            cache,
            locks: NameLocks::new(),
        }
    }

    /// Create a controller for a newly opened file, using the runtime's
    /// global index and a fresh owner tag
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the runtime is not initialized.
    pub fn open(kind: ResourceKind, renderer: Arc<Mutex<dyn Renderer>>, config: CacheConfig) -> Result<Self> {
        let global = Runtime::global_index(kind)?;
        let owner = Runtime::allocate_owner()?;
        Ok(Self::new(kind, owner, global, renderer, config))
    }

    /// Forward thumbnail changes to a UI provider
    pub fn with_thumbnail_provider(mut self, provider: Box<dyn ThumbnailProvider>) -> Self {
        self.cache.set_thumbnail_provider(provider);
        self
    }

    fn source(&self) -> &'static str {
        match self.kind {
            ResourceKind::Texture => "ctr::TextureFolder",
            ResourceKind::Lut => "ctr::LutFolder",
        }
    }

    // ===== ACCESSORS =====

    /// Resource kind handled by this controller
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Owner tag of this file
    pub fn owner(&self) -> OwnerId {
        self.cache.owner()
    }

    /// Settings in use
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cache tiers of this file
    pub fn cache(&self) -> &ResourceCacheSet {
        &self.cache
    }

    /// Names held by in-flight batches
    pub fn locks(&self) -> &NameLocks {
        &self.locks
    }

    /// Record named `name`
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.collection.get(name)
    }

    /// Whether `name` exists in this file
    pub fn contains(&self, name: &str) -> bool {
        self.collection.contains(name)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Whether the file holds no record of this kind
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Names in collection order
    pub fn names(&self) -> Vec<&str> {
        self.collection.names()
    }

    /// Records in collection order, as they would be serialized
    pub fn resources(&self) -> Vec<Resource> {
        self.collection.iter().cloned().collect()
    }

    // ===== IMPORT / REPLACE =====

    /// Import `request.image` under `request.name`
    ///
    /// An existing name is replaced (see `replace`); a new one is created.
    ///
    /// # Errors
    ///
    /// `NameBusy`, `InvalidName`, codec, compositor and renderer errors.
    /// Nothing is changed on error.
    pub fn import(&mut self, request: ImportRequest) -> Result<ImportOutcome> {
        let source = self.source();
        let name = request.name.clone();
        let _guard = self.locks.try_lock(&name).map_err(|e| crate::ctr_err!(source, e))?;

        let job = self.plan_job(request).map_err(|e| crate::ctr_err!(source, e))?;
        let resource = job.encode().map_err(|e| crate::ctr_err!(source, e))?;
        let outcome = self.commit_resource(resource)?;

        crate::ctr_info!(source, "{} '{}'", match outcome {
            ImportOutcome::Created => "Imported",
            ImportOutcome::Replaced => "Replaced",
        }, name);
        Ok(outcome)
    }

    /// Replace the content of an existing record
    ///
    /// Channels not selected by `request.mode` are kept from the previous
    /// content, face by face. The storage format is kept unless the request
    /// names one.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if `request.name` does not exist,
    /// `DimensionMismatch` if a partial edit changes the size, plus the
    /// errors of `import`.
    pub fn replace(&mut self, request: ImportRequest) -> Result<()> {
        if !self.collection.contains(&request.name) {
            crate::ctr_bail!(self.source(), Error::ResourceNotFound(request.name));
        }
        self.import(request).map(|_| ())
    }

    /// Read `path` and import it under `name`
    ///
    /// # Errors
    ///
    /// `ImageIo` plus the errors of `import`.
    pub fn import_file(&mut self, name: &str, path: impl AsRef<Path>, mode: EditMode) -> Result<ImportOutcome> {
        let image = image_io::load_image(path).map_err(|e| crate::ctr_err!(self.source(), e))?;
        self.import(ImportRequest::new(name, image).with_mode(mode))
    }

    /// Import an already encoded record as is, bypassing the codec
    ///
    /// The record keeps its own name, format and payload. A record in a
    /// format this codec cannot decode is accepted without a preview, as on
    /// `load`; any other record must decode.
    ///
    /// # Errors
    ///
    /// `UnsupportedFormat` for a record of the other kind, `InvalidName`,
    /// `NameBusy`, decode and renderer errors. Nothing is changed on error.
    pub fn import_record(&mut self, record: Resource) -> Result<ImportOutcome> {
        let source = self.source();
        if record.kind != self.kind {
            crate::ctr_bail!(source, Error::UnsupportedFormat(record.format));
        }
        if record.name.is_empty() {
            crate::ctr_bail!(source, Error::InvalidName("resource name cannot be empty".to_string()));
        }
        let name = record.name.clone();
        let _guard = self.locks.try_lock(&name).map_err(|e| crate::ctr_err!(source, e))?;

        let prepared = if record.kind == ResourceKind::Texture && !record.format.is_supported() {
            self.cache.prepare_lenient(record)
        } else {
            self.cache.prepare(record)
        };
        let prepared = prepared.map_err(|e| crate::ctr_err!(source, e))?;
        let outcome = self.commit_prepared(prepared)?;

        crate::ctr_info!(source, "{} '{}' from a raw record", match outcome {
            ImportOutcome::Created => "Imported",
            ImportOutcome::Replaced => "Replaced",
        }, name);
        Ok(outcome)
    }

    /// Replace `name` with an already encoded record
    ///
    /// The record takes the target's name whatever name it carried.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if `name` does not exist, plus the errors of
    /// `import_record`.
    pub fn replace_record(&mut self, name: &str, mut record: Resource) -> Result<()> {
        if !self.collection.contains(name) {
            crate::ctr_bail!(self.source(), Error::ResourceNotFound(name.to_string()));
        }
        record.name = name.to_string();
        self.import_record(record).map(|_| ())
    }

    /// Resolve a request against the current state (no side effect)
    pub(crate) fn plan_job(&self, request: ImportRequest) -> Result<EncodeJob> {
        if self.kind == ResourceKind::Lut {
            return Err(Error::UnsupportedFormat(TextureFormat::Unknown(LUT_FORMAT_ID)));
        }
        if request.name.is_empty() {
            return Err(Error::InvalidName("resource name cannot be empty".to_string()));
        }

        let existing = self.collection.get(&request.name);
        let image = request.image;
        let (width, height) = image.dimensions();
        // Longest chain whose levels stay tile aligned
        let max_mips = aligned_mip_count(width, height);

        let format = request
            .format
            .or(existing.map(|old| old.format))
            .or(image.format_hint())
            .unwrap_or(self.config.default_format);

        // Inherited counts are clamped to what the new size allows; an
        // explicit count is validated by the encoder.
        let mip_count = match request.mip_count {
            Some(count) => count,
            None => existing
                .map_or(self.config.default_mip_count, |old| old.mip_count)
                .min(max_mips)
                .max(1),
        };

        let base = match request.mode {
            EditMode::Default => None,
            _ => existing.cloned(),
        };

        Ok(EncodeJob {
            name: request.name,
            image,
            mode: request.mode,
            format,
            mip_count,
            base,
        })
    }

    /// Publish an encoded record, replacing any record of the same name
    fn commit_resource(&mut self, resource: Resource) -> Result<ImportOutcome> {
        let prepared = self.cache.prepare(resource).map_err(|e| crate::ctr_err!(self.source(), e))?;
        self.commit_prepared(prepared)
    }

    fn commit_prepared(&mut self, prepared: PreparedEntry) -> Result<ImportOutcome> {
        let source = self.source();
        let name = prepared.resource.name.clone();
        let record = prepared.resource.clone();

        // Collection first: the tier writes below cannot fail.
        let outcome = if self.collection.contains(&name) {
            self.collection.replace(record).map_err(|e| crate::ctr_err!(source, e))?;
            self.cache.purge(&name);
            ImportOutcome::Replaced
        } else {
            self.collection.insert(record).map_err(|e| crate::ctr_err!(source, e))?;
            ImportOutcome::Created
        };
        self.cache.insert_prepared(prepared);
        Ok(outcome)
    }

    // ===== BATCH =====

    /// Validate `requests`, snapshot their targets and lock their names
    ///
    /// # Errors
    ///
    /// `NameCollision` for a name requested twice, `NameBusy` for a name
    /// held by another batch, plus the validation errors of `import`. No lock
    /// is kept on error.
    pub fn plan_batch(&self, requests: Vec<ImportRequest>) -> Result<BatchPlan> {
        let source = self.source();
        let mut guards: Vec<NameGuard> = Vec::with_capacity(requests.len());
        let mut jobs = Vec::with_capacity(requests.len());

        for request in requests {
            if guards.iter().any(|guard| guard.name() == request.name) {
                crate::ctr_bail!(source, Error::NameCollision(request.name));
            }
            guards.push(self.locks.try_lock(&request.name).map_err(|e| crate::ctr_err!(source, e))?);
            jobs.push(self.plan_job(request).map_err(|e| crate::ctr_err!(source, e))?);
        }

        crate::ctr_debug!(source, "Planned batch of {} item(s)", jobs.len());
        Ok(BatchPlan {
            owner: self.owner(),
            jobs,
            guards,
        })
    }

    /// Publish the results of `BatchPlan::run` and release its locks
    ///
    /// Items that failed to encode, or whose render binding cannot be created,
    /// are reported and left untouched; the others are committed.
    ///
    /// # Errors
    ///
    /// `InvalidName` if the batch was planned by another controller.
    pub fn commit_batch(&mut self, batch: EncodedBatch) -> Result<BatchReport> {
        let source = self.source();
        if batch.owner != self.owner() {
            crate::ctr_bail!(source, Error::InvalidName(format!(
                "batch planned by {} cannot be committed by {}", batch.owner, self.owner()
            )));
        }

        let EncodedBatch { results, guards, .. } = batch;
        let mut report = BatchReport::default();
        for (name, result) in results {
            match result.and_then(|resource| self.commit_resource(resource)) {
                Ok(ImportOutcome::Created) => report.created.push(name),
                Ok(ImportOutcome::Replaced) => report.replaced.push(name),
                Err(err) => {
                    crate::ctr_warn!(source, "Batch item '{}' skipped: {}", name, err);
                    report.failed.push((name, err));
                }
            }
        }
        drop(guards);

        crate::ctr_info!(source, "Batch committed: {} created, {} replaced, {} failed",
            report.created.len(), report.replaced.len(), report.failed.len());
        Ok(report)
    }

    // ===== RENAME / REMOVE / ADD =====

    /// Rename `old` to `new` in the collection and every tier
    ///
    /// Payload, render binding and preview are carried over unchanged.
    /// Renaming to the same name is a no-op.
    ///
    /// # Errors
    ///
    /// `NameBusy`, `InvalidName` (empty `new`), `ResourceNotFound` (`old`
    /// missing), `NameCollision` (`new` taken in this file).
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let source = self.source();
        self.locks.check(old).map_err(|e| crate::ctr_err!(source, e))?;
        self.locks.check(new).map_err(|e| crate::ctr_err!(source, e))?;

        // Validates and performs the collection rename; nothing else is
        // touched if it fails.
        self.collection.rename(old, new).map_err(|e| crate::ctr_err!(source, e))?;
        if old == new {
            return Ok(());
        }

        if let Some(record) = self.collection.get(new) {
            let renamed = record.clone();
            self.cache.rename(old, renamed);
        }
        crate::ctr_info!(source, "Renamed '{}' -> '{}'", old, new);
        Ok(())
    }

    /// Remove `name` from the collection and every tier
    ///
    /// Returns the tiers that held it. Removing an unknown name is a no-op
    /// returning no tier.
    ///
    /// # Errors
    ///
    /// `NameBusy` if a batch holds the name.
    pub fn remove(&mut self, name: &str) -> Result<Tiers> {
        let source = self.source();
        self.locks.check(name).map_err(|e| crate::ctr_err!(source, e))?;

        let existed = self.collection.remove(name).is_some();
        let tiers = self.cache.purge(name);
        if existed {
            crate::ctr_info!(source, "Removed '{}'", name);
        } else {
            crate::ctr_debug!(source, "Nothing to remove under '{}'", name);
        }
        Ok(tiers)
    }

    /// Add a blank record under the first free `NewTexture` / `NewLut` name
    ///
    /// Blank textures are transparent black in the default format; blank
    /// lookup tables are all zero.
    ///
    /// # Errors
    ///
    /// Codec and renderer errors.
    pub fn add_blank(&mut self) -> Result<String> {
        let source = self.source();
        let name = self.collection.unique_name(self.kind.blank_base_name());

        let resource = match self.kind {
            ResourceKind::Texture => {
                let size = self.config.blank_size;
                let pixels = PixelBuffer::filled(size, size, [0; 4])
                    .map_err(|e| crate::ctr_err!(source, e))?;
                let format = self.config.default_format;
                let payload = codec::encode_payload(&[pixels], format, 1)
                    .map_err(|e| crate::ctr_err!(source, e))?;
                Resource::texture(name.clone(), size, size, format, 1, payload)
            }
            ResourceKind::Lut => {
                Resource::lut(name.clone(), vec![0; LUT_ENTRY_COUNT as usize * LUT_ENTRY_SIZE])
            }
        };

        self.commit_resource(resource)?;
        crate::ctr_info!(source, "Added blank '{}'", name);
        Ok(name)
    }

    /// Remove every record, returning how many were removed
    ///
    /// # Errors
    ///
    /// `NameBusy` if a batch holds any of the names; nothing is removed then.
    pub fn clear(&mut self) -> Result<usize> {
        let source = self.source();
        for name in self.collection.names() {
            self.locks.check(name).map_err(|e| crate::ctr_err!(source, e))?;
        }

        let removed = self.collection.drain();
        for record in &removed {
            self.cache.purge(&record.name);
        }
        crate::ctr_info!(source, "Cleared {} record(s)", removed.len());
        Ok(removed.len())
    }

    // ===== FILE OPEN / CLOSE =====

    /// Populate from records read out of a file
    ///
    /// Records of another kind are skipped. When a name repeats, the first
    /// record wins. Names already provided by another open file stay
    /// resolved to that file. Returns the number of records loaded.
    ///
    /// # Errors
    ///
    /// `InvalidName` for an empty name, renderer errors. Nothing is loaded
    /// on error.
    pub fn load(&mut self, records: Vec<Resource>) -> Result<usize> {
        let source = self.source();
        let mut accepted: Vec<Resource> = Vec::with_capacity(records.len());
        for record in records {
            if record.kind != self.kind {
                crate::ctr_warn!(source, "Skipping '{}': {:?} in a {:?} section",
                    record.name, record.kind, self.kind);
                continue;
            }
            if record.name.is_empty() {
                crate::ctr_bail!(source, Error::InvalidName("record with an empty name".to_string()));
            }
            if self.collection.contains(&record.name) || accepted.iter().any(|r| r.name == record.name) {
                crate::ctr_warn!(source, "Duplicate '{}' ignored, keeping the first", record.name);
                continue;
            }
            accepted.push(record);
        }

        let prepared = accepted
            .into_iter()
            .map(|record| self.cache.prepare_lenient(record))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| crate::ctr_err!(source, e))?;

        let count = prepared.len();
        for entry in prepared {
            // Names were checked against the collection and each other above
            if let Err(err) = self.collection.insert(entry.resource.clone()) {
                crate::ctr_warn!(source, "'{}' not loaded: {}", entry.resource.name, err);
                continue;
            }
            self.cache.register_prepared(entry);
        }
        crate::ctr_info!(source, "Loaded {} record(s)", count);
        Ok(count)
    }

    /// Release every cache entry of this file and empty the collection
    ///
    /// Global entries of other files are untouched; names this file was
    /// shadowing become resolvable to them again.
    pub fn close(&mut self) {
        let names: Vec<String> = self.collection.names().into_iter().map(str::to_string).collect();
        self.cache.teardown(names.iter().map(String::as_str));
        self.collection.drain();
        crate::ctr_info!(self.source(), "Closed ({} record(s) released)", names.len());
    }

    // ===== EXPORT =====

    /// Decode face `face` of `name` and isolate the channels of `mode`
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, plus the decode errors of the codec.
    pub fn export(&self, name: &str, face: usize, mode: EditMode) -> Result<PixelBuffer> {
        let source = self.source();
        let record = self.collection.get(name)
            .ok_or_else(|| crate::ctr_err!(source, Error::ResourceNotFound(name.to_string())))?;
        let pixels = codec::decode(record, face).map_err(|e| crate::ctr_err!(source, e))?;
        Ok(extract(&pixels, mode))
    }

    /// Export face 0 of `name` to an image file
    ///
    /// # Errors
    ///
    /// The errors of `export`, plus `ImageIo`.
    pub fn export_file(&self, name: &str, path: impl AsRef<Path>, mode: EditMode) -> Result<()> {
        let pixels = self.export(name, 0, mode)?;
        image_io::save_image(path, &pixels).map_err(|e| crate::ctr_err!(self.source(), e))
    }
}

impl Drop for ResourceLifecycleController {
    fn drop(&mut self) {
        if !self.collection.is_empty() {
            self.close();
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
