//! In-memory schedule repository.

use super::ScheduleRepository;
use crate::appointment::ScheduleDocument;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Schedule repository that keeps the document in memory.
///
/// Reads hand out clones, so callers get the same copy-on-read behaviour as
/// the file store. Clones of the repository share one document.
///
/// # Testing failure paths
///
/// [`fail_writes`](Self::fail_writes) makes every subsequent `write` return
/// `Error::StoreWrite` without touching the document.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    document: Arc<RwLock<ScheduleDocument>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicU64>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_document(document: ScheduleDocument) -> Self {
        InMemoryRepository {
            document: Arc::new(RwLock::new(document)),
            ..Self::default()
        }
    }

    /// Toggle simulated write failures.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> ScheduleDocument {
        self.document.read().await.clone()
    }
}

impl ScheduleRepository for InMemoryRepository {
    async fn ensure_store_exists(&self) -> Result<()> {
        Ok(())
    }

    async fn read(&self) -> Result<ScheduleDocument> {
        let document = self.document.read().await.clone();
        debug!("✓ InMemory READ ({} appointments)", document.len());
        Ok(document)
    }

    async fn write(&self, document: &ScheduleDocument) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StoreWrite("simulated write failure".to_string()));
        }

        *self.document.write().await = document.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!("✓ InMemory WRITE ({} appointments)", document.len());
        Ok(())
    }
}
