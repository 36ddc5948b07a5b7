//! Zip buffer decoding

use crate::ArchiveError;
use std::io::{Cursor, Read};
use tracing::warn;
use zip::ZipArchive;

/// A decoded file entry from an uploaded archive.
///
/// The path is raw as stored in the archive; run it through
/// [`crate::sanitize_entry_path`] before using it as a storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Raw entry path, unsanitized
    pub raw_path: String,

    /// Decompressed payload
    pub bytes: Vec<u8>,
}

/// Decoder over an in-memory zip buffer.
///
/// Opening validates the archive's central directory; materializing an entry
/// decompresses it on demand. Each entry is meant to be visited once.
pub struct ZipExtractor {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipExtractor {
    /// Open an archive held fully in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Corrupt`] when the buffer has no valid zip
    /// signature or central directory.
    pub fn open(data: Vec<u8>) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Number of entries in the archive, directories included
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// True when the archive holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Materialize the entry at `index`.
    ///
    /// Directory entries yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Corrupt`] when the entry's compressed data
    /// cannot be decompressed (checksum or size mismatch) and
    /// [`ArchiveError::PasswordProtected`] for encrypted entries.
    pub fn entry(&mut self, index: usize) -> Result<Option<ArchiveEntry>, ArchiveError> {
        let mut file = self.archive.by_index(index)?;

        if file.is_dir() {
            return Ok(None);
        }

        if file.encrypted() {
            return Err(ArchiveError::PasswordProtected);
        }

        let raw_path = file.name().to_string();
        let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::Corrupt(format!("entry {raw_path}: {e}")))?;

        Ok(Some(ArchiveEntry { raw_path, bytes }))
    }

    /// Decode every file entry up front, skipping directories.
    ///
    /// # Errors
    ///
    /// Fails on the first corrupt entry; partial results are discarded so a
    /// bad archive yields nothing rather than a truncated set.
    pub fn into_entries(mut self) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let mut entries = Vec::new();

        for index in 0..self.len() {
            if let Some(entry) = self.entry(index)? {
                entries.push(entry);
            } else {
                warn!("skipping directory entry at index {index}");
            }
        }

        Ok(entries)
    }
}
