//! Error types for snapshot persistence.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the snapshot store.
///
/// Read-side corruption is surfaced as [`StoreError::Corrupt`] internally,
/// but the public load path is fail-safe: corruption becomes "no
/// snapshot", which the session treats as a full-rebuild trigger.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing a snapshot file.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A persisted record is structurally unreadable: unexpected end of
    /// stream, an invalid tag, a failed checksum, or a version mismatch.
    #[error("corrupt persisted record: {reason}")]
    Corrupt {
        /// Description of the structural failure.
        reason: String,
    },

    /// The snapshot header could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl StoreError {
    /// Creates a [`StoreError::Corrupt`] with the given reason.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}
