//! Transcoding engine abstraction.
//!
//! The engine is a collaborator with a fixed contract: load once, stage
//! files into a shared working storage, execute an ordered argument list,
//! read back the artifact. [`EngineService`] wraps one engine instance as
//! the process-wide handle: initialization is memoized with single-flight
//! joining, and jobs are serialized through a lock because the working
//! storage is one shared namespace.

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::debug;

use crate::error::MediaResult;
use crate::progress::ProgressCallback;

/// Contract of the native transcoding engine.
#[async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Initialize/load the engine. Called once per process under
    /// [`EngineService::ensure_loaded`].
    async fn load(&self) -> MediaResult<()>;

    /// Write a file into the engine's addressable working storage.
    async fn write_file(&self, name: &str, data: &[u8]) -> MediaResult<()>;

    /// Read a file from working storage.
    async fn read_file(&self, name: &str) -> MediaResult<Vec<u8>>;

    /// Delete a file from working storage.
    async fn delete_file(&self, name: &str) -> MediaResult<()>;

    /// Execute a fully-specified command against working storage.
    async fn exec(&self, args: &[String], progress: Option<ProgressCallback>) -> MediaResult<()>;
}

/// Process-wide engine handle.
///
/// Concurrent callers of [`ensure_loaded`](Self::ensure_loaded) join one
/// in-flight initialization rather than racing separate loads; a failed
/// initialization leaves the memo clear so the next attempt retries from
/// scratch. A failed per-job execution is never retried here.
pub struct EngineService<E> {
    engine: E,
    init: OnceCell<()>,
    job_lock: Mutex<()>,
}

impl<E: TranscodeEngine> EngineService<E> {
    /// Wrap an engine instance.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            init: OnceCell::new(),
            job_lock: Mutex::new(()),
        }
    }

    /// Ensure the engine is loaded, joining any in-flight initialization.
    pub async fn ensure_loaded(&self) -> MediaResult<()> {
        self.init
            .get_or_try_init(|| async {
                debug!("Initializing transcoding engine");
                self.engine.load().await
            })
            .await
            .map(|_| ())
    }

    /// Acquire the sequential-job lock. Held for the whole job so
    /// concurrent exports cannot corrupt each other's staged files.
    pub async fn lock_job(&self) -> MutexGuard<'_, ()> {
        self.job_lock.lock().await
    }

    /// Access the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
