//! The open-file handle.

use crate::inode::FileNode;
use crate::mode::OpenMode;
use crate::{FsError, Result};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

/// An open file: a shared reference to a file node, a handle-local byte
/// offset, and the mode the file was opened in.
///
/// The handle keeps its node alive, so it keeps working after the file
/// has been unlinked or renamed away from the path it was opened at.
/// Every operation first checks the open mode, then delegates to the
/// node. The offset sits behind its own mutex, so a shared handle can
/// be used from several threads; the positional `read_at`/`write_at`
/// never touch it.
pub struct FileHandle {
    node: Arc<FileNode>,
    mode: OpenMode,
    cursor: Mutex<u64>,
}

impl FileHandle {
    pub(crate) fn new(node: Arc<FileNode>, mode: OpenMode) -> Self {
        Self {
            node,
            mode,
            cursor: Mutex::new(0),
        }
    }

    /// The size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.node.size() as u64
    }

    /// Returns a copy of the whole file, regardless of the current
    /// offset. Fails `InvalidInput` on a write-only handle.
    pub fn read_all(&self) -> Result<Vec<u8>> {
        if self.mode.is_write_only() {
            return Err(FsError::InvalidInput);
        }
        self.node.read_all()
    }

    /// Replaces the whole file with `data`, regardless of the current
    /// offset. Fails `InvalidInput` on a read-only or append-mode
    /// handle.
    pub fn truncate_and_write_all(&self, data: &[u8]) -> Result<()> {
        if self.mode.is_read_only() || self.mode.is_append() {
            return Err(FsError::InvalidInput);
        }
        self.node.truncate_and_write_all(data.to_vec())
    }

    /// Reads from the current offset, advancing it by the number of
    /// bytes produced. Fails `InvalidInput` on a write-only handle and
    /// `UnexpectedEof` at the end of the file.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if self.mode.is_write_only() {
            return Err(FsError::InvalidInput);
        }
        let mut cursor = self.cursor.lock().map_err(|_| FsError::UnknownError)?;
        let read = self.node.read_at(buf, *cursor)?;
        *cursor += read as u64;
        Ok(read)
    }

    /// Writes at the current offset, advancing it by the number of
    /// bytes written. In append mode the offset is first moved to the
    /// end of the file, as a single step under the offset lock. Fails
    /// `InvalidInput` on a read-only handle.
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        if self.mode.is_read_only() {
            return Err(FsError::InvalidInput);
        }
        let mut cursor = self.cursor.lock().map_err(|_| FsError::UnknownError)?;
        if self.mode.is_append() {
            *cursor = self.node.size() as u64;
        }
        let written = self.node.write_at(buf, *cursor)?;
        *cursor += written as u64;
        Ok(written)
    }

    /// Reads at an explicit offset without touching the handle's
    /// offset. Fails `InvalidInput` on a write-only handle.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        if self.mode.is_write_only() {
            return Err(FsError::InvalidInput);
        }
        self.node.read_at(buf, offset)
    }

    /// Writes at an explicit offset without touching the handle's
    /// offset. Fails `InvalidInput` on a read-only or append-mode
    /// handle.
    pub fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize> {
        if self.mode.is_read_only() || self.mode.is_append() {
            return Err(FsError::InvalidInput);
        }
        self.node.write_at(buf, offset)
    }

    /// Moves the offset and returns its new value. Seeking past the end
    /// of the file is allowed; seeking before byte zero fails
    /// `InvalidInput` and leaves the offset unchanged.
    pub fn seek(&self, position: SeekFrom) -> Result<u64> {
        let mut cursor = self.cursor.lock().map_err(|_| FsError::UnknownError)?;
        let next = match position {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::End(offset) => self.node.size() as i128 + offset as i128,
            SeekFrom::Current(offset) => *cursor as i128 + offset as i128,
        };
        if next < 0 || next > u64::MAX as i128 {
            return Err(FsError::InvalidInput);
        }
        *cursor = next as u64;
        Ok(*cursor)
    }
}

/// Two handles are equal when they reference the same file node, no
/// matter how either was opened.
impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for FileHandle {}

impl fmt::Debug for FileHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FileHandle")
            .field("mode", &self.mode)
            .field("size", &self.size())
            .finish()
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match FileHandle::read(self, buf) {
            Ok(read) => Ok(read),
            // `std::io` reports end-of-file as a zero-byte read.
            Err(FsError::UnexpectedEof) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileHandle::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, position: SeekFrom) -> io::Result<u64> {
        FileHandle::seek(self, position).map_err(Into::into)
    }
}
