//! Error types for the scheduling service.

use std::fmt;

/// Result type for scheduling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the scheduling service.
///
/// Repository failures propagate through the service unchanged; nothing is
/// retried or repaired locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No appointment with the given id exists in the schedule.
    ///
    /// Surfaced to HTTP clients as 404.
    NotFound(String),

    /// The backing document exists but is not a well-formed schedule.
    ///
    /// Common causes:
    /// - File truncated or hand-edited into invalid JSON
    /// - Top-level value is not an object
    /// - An appointment record is missing its `id`
    ///
    /// **Recovery:** None. The store is left as-is for an operator to inspect.
    StoreCorrupt(String),

    /// The backing document could not be read (permissions, missing mount).
    StoreRead(String),

    /// The backing document could not be written.
    ///
    /// The mutation that triggered the write is not committed; the previous
    /// document remains in place.
    StoreWrite(String),

    /// Invalid configuration at startup (bad port, unusable path).
    ConfigError(String),

    /// Request payload rejected before reaching the service.
    InvalidInput(String),
}

impl Error {
    /// True for the client-visible "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(id) => write!(f, "Appointment {} not found", id),
            Error::StoreCorrupt(msg) => write!(f, "Store corrupt: {}", msg),
            Error::StoreRead(msg) => write!(f, "Store read error: {}", msg),
            Error::StoreWrite(msg) => write!(f, "Store write error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
