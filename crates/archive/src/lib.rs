//! Zip archive decoding for the depot upload pipeline
//!
//! This crate turns an in-memory zip buffer into a sequence of raw
//! (path, bytes) entries and normalizes entry paths into storage keys.
//! Nothing here touches the network or the filesystem; size limits are the
//! HTTP layer's concern.

use thiserror::Error;

mod extract;
mod sanitize;

pub use extract::{ArchiveEntry, ZipExtractor};
pub use sanitize::sanitize_entry_path;

/// Archive decoding errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The buffer is not a valid archive, or an entry's compressed data
    /// cannot be decompressed. One corrupt entry fails the whole archive.
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    /// Encrypted entries are not supported
    #[error("archive is password-protected")]
    PasswordProtected,
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::Corrupt(err.to_string())
    }
}
