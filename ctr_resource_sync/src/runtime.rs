/// CTR runtime - process-wide singleton for shared cache state
///
/// Holds the global resource indices (one per resource kind) shared by every
/// open file, hands out owner tags to open files, and routes log entries to
/// the installed logger. Storage is thread-safe static state guarded by
/// RwLock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::cache::{GlobalIndex, SharedGlobalIndex};
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::resource::{OwnerId, ResourceKind};

// ===== INTERNAL STATE =====

/// Global runtime state storage
static RUNTIME_STATE: OnceLock<RuntimeState> = OnceLock::new();

/// Installed logger, `DefaultLogger` until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Indices shared by all open files
struct GlobalIndices {
    textures: SharedGlobalIndex,
    luts: SharedGlobalIndex,
}

/// Internal state structure holding the runtime singletons
struct RuntimeState {
    /// Global indices (None between shutdown and the next initialize)
    indices: RwLock<Option<GlobalIndices>>,
    /// Next owner tag
    next_owner: AtomicU64,
}

impl RuntimeState {
    /// Create a new empty runtime state
    fn new() -> Self {
        Self {
            indices: RwLock::new(None),
            next_owner: AtomicU64::new(1),
        }
    }
}

// ===== PUBLIC API =====

/// Process-wide runtime
///
/// # Example
///
/// ```no_run
/// use ctr_resource_sync::ctr::Runtime;
/// use ctr_resource_sync::ctr::resource::ResourceKind;
///
/// Runtime::initialize()?;
/// let textures = Runtime::global_index(ResourceKind::Texture)?;
/// let owner = Runtime::allocate_owner()?;
/// // ... open files, edit resources ...
/// Runtime::shutdown();
/// # Ok::<(), ctr_resource_sync::ctr::Error>(())
/// ```
pub struct Runtime;

impl Runtime {
    /// Log `error` under `source` and hand it back for `Err(...)`
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::ctr_error!("ctr::Runtime", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::ctr_error!("ctr::Runtime", "Backend error: {}", msg);
            }
            _ => {
                crate::ctr_error!("ctr::Runtime", "Runtime error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static RuntimeState> {
        RUNTIME_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Runtime not initialized. Call Runtime::initialize() first.".to_string())
        ))
    }

    /// Initialize the runtime and create the global indices
    ///
    /// Idempotent: indices that already exist are kept.
    ///
    /// # Errors
    ///
    /// `BackendError` if the state lock is poisoned.
    pub fn initialize() -> Result<()> {
        let state = RUNTIME_STATE.get_or_init(RuntimeState::new);
        let mut indices = state.indices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Runtime lock poisoned".to_string())
            ))?;

        if indices.is_none() {
            *indices = Some(GlobalIndices {
                textures: GlobalIndex::shared(),
                luts: GlobalIndex::shared(),
            });
            crate::ctr_info!("ctr::Runtime", "Runtime initialized");
        }
        Ok(())
    }

    /// Drop the global indices
    ///
    /// Handles obtained earlier stay valid but are no longer shared with new
    /// files. Call `initialize()` again before opening files.
    pub fn shutdown() {
        if let Some(state) = RUNTIME_STATE.get() {
            if let Ok(mut indices) = state.indices.write() {
                if indices.take().is_some() {
                    crate::ctr_info!("ctr::Runtime", "Runtime shut down");
                }
            }
        }
    }

    /// Whether `initialize()` has run and `shutdown()` has not
    pub fn is_initialized() -> bool {
        RUNTIME_STATE
            .get()
            .and_then(|state| state.indices.read().ok().map(|i| i.is_some()))
            .unwrap_or(false)
    }

    /// Global index of one resource kind
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the runtime is not initialized.
    pub fn global_index(kind: ResourceKind) -> Result<SharedGlobalIndex> {
        let state = Self::state()?;
        let lock = state.indices.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Runtime lock poisoned".to_string())
            ))?;

        let indices = lock.as_ref().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Global indices not created. Call Runtime::initialize() first.".to_string())
        ))?;

        Ok(match kind {
            ResourceKind::Texture => indices.textures.clone(),
            ResourceKind::Lut => indices.luts.clone(),
        })
    }

    /// Allocate a fresh owner tag for a newly opened file
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the runtime is not initialized.
    pub fn allocate_owner() -> Result<OwnerId> {
        let state = Self::state()?;
        Ok(OwnerId::new(state.next_owner.fetch_add(1, Ordering::Relaxed)))
    }

    /// Reset the global indices for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = RUNTIME_STATE.get() {
            if let Ok(mut indices) = state.indices.write() {
                *indices = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Route every later entry to `logger`
    ///
    /// Replace the default logger with a custom implementation (editor
    /// console, file logger, ...).
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Go back to colored console output
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Emit an entry without a call site (used by the `ctr_*` macros)
    ///
    /// Used by macros like ctr_info!, ctr_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Emit an entry carrying the file and line of the call site
    ///
    /// Used by ctr_error!, ctr_err! and ctr_bail!.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
