//! Appointment repository: load and save the schedule document.
//!
//! The `ScheduleRepository` trait hides where the document lives. The
//! service only ever reads the whole document and writes it back, so any
//! store that can do those two things atomically can sit behind it.
//!
//! # Implementations
//!
//! - [`JsonFileRepository`]: one pretty-printed JSON file (default)
//! - [`InMemoryRepository`]: a document held in memory, for tests and embedding

use crate::appointment::ScheduleDocument;
use crate::error::Result;

pub mod inmemory;
pub mod json_file;

pub use inmemory::InMemoryRepository;
pub use json_file::JsonFileRepository;

/// Trait for schedule document storage.
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait ScheduleRepository: Send + Sync {
    /// Create the backing store with an empty document if it is absent.
    ///
    /// Idempotent; safe to call before every read.
    ///
    /// # Errors
    /// Returns `Error::StoreWrite` if the store cannot be created
    async fn ensure_store_exists(&self) -> Result<()>;

    /// Load the full document, creating an empty one first if needed.
    ///
    /// # Errors
    /// - `Error::StoreCorrupt` if the content is not a valid schedule
    /// - `Error::StoreRead` if the store cannot be read
    async fn read(&self) -> Result<ScheduleDocument>;

    /// Replace the stored document.
    ///
    /// Readers observe either the old document or the new one, never a mix.
    ///
    /// # Errors
    /// Returns `Error::StoreWrite` if the document was not persisted
    async fn write(&self, document: &ScheduleDocument) -> Result<()>;
}
