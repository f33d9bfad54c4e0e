//! The file node: a byte buffer behind a reader-writer lock.

use crate::{FsError, Result};
use std::sync::RwLock;

/// The maximum offset a write may end at. Writes past this point fail
/// with `StorageFull` before any byte is copied.
const MAX_FILE_SIZE: u64 = isize::MAX as u64;

/// A file's bytes.
///
/// The node itself has no name and no parent pointer; directories know
/// their files, files do not know their directories. All access goes
/// through the internal lock, so a node can be shared freely between
/// the tree and any number of open handles.
#[derive(Debug, Default)]
pub(crate) struct FileNode {
    buffer: RwLock<Vec<u8>>,
}

impl FileNode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The current size of the file in bytes.
    pub(crate) fn size(&self) -> usize {
        self.buffer.read().map(|buffer| buffer.len()).unwrap_or(0)
    }

    /// Returns a copy of the whole file.
    pub(crate) fn read_all(&self) -> Result<Vec<u8>> {
        let buffer = self.buffer.read().map_err(|_| FsError::UnknownError)?;
        Ok(buffer.clone())
    }

    /// Replaces the whole file with `data`.
    pub(crate) fn truncate_and_write_all(&self, data: Vec<u8>) -> Result<()> {
        let mut buffer = self.buffer.write().map_err(|_| FsError::UnknownError)?;
        *buffer = data;
        Ok(())
    }

    /// Copies up to `buf.len()` bytes at `offset` into `buf` and returns
    /// the number of bytes produced. Fewer bytes than requested may be
    /// produced. When the offset sits at or past the end of the file and
    /// at least one byte was requested, the read fails `UnexpectedEof`
    /// and `buf` is untouched.
    pub(crate) fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let buffer = self.buffer.read().map_err(|_| FsError::UnknownError)?;
        let len = buffer.len() as u64;
        if offset >= len {
            if buf.is_empty() {
                return Ok(0);
            }
            return Err(FsError::UnexpectedEof);
        }
        let offset = offset as usize;
        let available = buffer.len() - offset;
        let to_read = available.min(buf.len());
        buf[..to_read].copy_from_slice(&buffer[offset..offset + to_read]);
        Ok(to_read)
    }

    /// Copies `data` into the file at `offset` and returns the number of
    /// bytes written. If the offset is past the end of the file, the gap
    /// is filled with zero bytes first; the buffer grows as needed. A
    /// write whose end would exceed the maximum addressable size fails
    /// `StorageFull` without writing anything.
    pub(crate) fn write_at(&self, data: &[u8], offset: u64) -> Result<usize> {
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(FsError::StorageFull)?;
        if end > MAX_FILE_SIZE {
            return Err(FsError::StorageFull);
        }

        let mut buffer = self.buffer.write().map_err(|_| FsError::UnknownError)?;
        let offset = offset as usize;
        let end = end as usize;
        if end > buffer.len() {
            buffer.resize(end, 0);
        }
        buffer[offset..end].copy_from_slice(data);
        Ok(data.len())
    }
}
