//! Error types for persisted-state operations.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while reading or writing persisted state.
///
/// Note that a missing or corrupt file is *not* an error on the read path:
/// readers treat it as an empty collection (deny-all for the card store).
/// These errors surface only when a write cannot be completed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serializing a collection for persistence failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
