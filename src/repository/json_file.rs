//! JSON file repository (default).
//!
//! The whole schedule lives in one pretty-printed JSON file. Writes go to a
//! temp file in the same directory which is then renamed over the target, so
//! a failed write leaves the previous document intact.

use super::ScheduleRepository;
use crate::appointment::ScheduleDocument;
use crate::error::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-backed schedule repository.
///
/// # Example
///
/// ```no_run
/// use schedule_kit::repository::{JsonFileRepository, ScheduleRepository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = JsonFileRepository::new("data/schedule.json");
///
///     // Creates data/ and an empty document on first use
///     let doc = repo.read().await?;
///     assert!(doc.appointments.is_empty());
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileRepository { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, contents: Vec<u8>) -> Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &contents))
            .await
            .map_err(|e| Error::StoreWrite(format!("write task failed: {}", e)))?
    }
}

impl ScheduleRepository for JsonFileRepository {
    async fn ensure_store_exists(&self) -> Result<()> {
        let exists = tokio::fs::try_exists(&self.path).await.map_err(|e| {
            Error::StoreRead(format!("failed to stat {}: {}", self.path.display(), e))
        })?;
        if exists {
            return Ok(());
        }

        let empty = serde_json::to_vec(&ScheduleDocument::new())
            .map_err(|e| Error::StoreWrite(e.to_string()))?;
        let path = self.path.clone();
        let created = tokio::task::spawn_blocking(move || create_if_missing(&path, &empty))
            .await
            .map_err(|e| Error::StoreWrite(format!("create task failed: {}", e)))??;

        if created {
            warn!(
                "Schedule file {} not found, created empty schedule",
                self.path.display()
            );
        }
        Ok(())
    }

    async fn read(&self) -> Result<ScheduleDocument> {
        self.ensure_store_exists().await?;

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::StoreRead(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let document: ScheduleDocument = serde_json::from_slice(&bytes)
            .map_err(|e| Error::StoreCorrupt(format!("{}: {}", self.path.display(), e)))?;

        debug!(
            "✓ JsonFile READ {} ({} appointments)",
            self.path.display(),
            document.len()
        );
        Ok(document)
    }

    async fn write(&self, document: &ScheduleDocument) -> Result<()> {
        let contents = serde_json::to_vec_pretty(document)
            .map_err(|e| Error::StoreWrite(format!("failed to render schedule: {}", e)))?;
        self.persist(contents).await?;

        debug!(
            "✓ JsonFile WRITE {} ({} appointments)",
            self.path.display(),
            document.len()
        );
        Ok(())
    }
}

/// Write `data` to a synced temp file next to `path`.
fn stage(path: &Path, data: &[u8]) -> Result<tempfile::NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::StoreWrite(format!("failed to create {}: {}", dir.display(), e)))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        Error::StoreWrite(format!("failed to create temp file in {}: {}", dir.display(), e))
    })?;
    temp.write_all(data)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| Error::StoreWrite(format!("failed to write temp file: {}", e)))?;
    Ok(temp)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    stage(path, data)?.persist(path).map_err(|e| {
        Error::StoreWrite(format!("failed to persist {}: {}", path.display(), e))
    })?;
    Ok(())
}

/// Place `data` at `path` only if nothing is there yet.
///
/// Returns `false` when another writer got there first; that file is left
/// untouched.
fn create_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    match stage(path, data)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::StoreWrite(format!(
            "failed to create {}: {}",
            path.display(),
            e
        ))),
    }
}
