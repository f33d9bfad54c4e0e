//! An in-process, in-memory hierarchical filesystem.
//!
//! `memfs` presents a POSIX-like surface without ever touching disk: a
//! rooted tree of directories and files, path-based operations, and
//! per-process working-directory state. It is aimed at embedded test
//! fixtures, sandboxes, and any application that wants file semantics
//! with no persistence.
//!
//! The entry point is [`FileSystem`], which owns the root directory and
//! hands out a [`DirectoryHandle`] to it. All path-based operations live
//! on [`DirectoryHandle`] (directories) and [`FileHandle`] (open files).
//! [`process::ProcessContext`] layers a working directory, absolute-path
//! resolution, and the `walk`/`find` helpers on top.
//!
//! Open handles share ownership of the node they reference, so a file
//! stays readable and writable after it has been unlinked or renamed;
//! its memory is reclaimed when the last handle goes away.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

use std::io;
use thiserror::Error;

mod dir;
mod file;
mod filesystem;
mod inode;
pub mod mode;
pub mod path;
pub mod process;

pub use dir::DirectoryHandle;
pub use file::FileHandle;
pub use filesystem::FileSystem;
pub use mode::OpenMode;
pub use process::{ProcessContext, WalkControl};

pub type Result<T> = std::result::Result<T, FsError>;

/// Error type for external users.
///
/// Every failing operation reports exactly one of these kinds, so callers
/// can branch on *why* a call failed and not just *whether* it did.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FsError {
    /// An entry with that name already exists
    #[error("file exists")]
    AlreadyExists,
    /// The requested file or directory could not be found
    #[error("entry not found")]
    EntryNotFound,
    /// Expected a file but found a directory
    #[error("target is a directory")]
    IsADirectory,
    /// Expected a directory but found a file
    #[error("target is not a directory")]
    NotADirectory,
    /// The provided path, name, mode, or offset is invalid
    #[error("invalid input")]
    InvalidInput,
    /// A write would exceed the maximum addressable file size
    #[error("storage full")]
    StorageFull,
    /// The directory still has entries
    #[error("directory not empty")]
    DirectoryNotEmpty,
    /// Found EOF when EOF was not expected
    #[error("unexpected eof")]
    UnexpectedEof,
    /// Invalid internal data. If you see this, it's probably a bug.
    #[error("unknown error found")]
    UnknownError,
}

impl From<FsError> for io::Error {
    fn from(val: FsError) -> Self {
        let kind = match val {
            FsError::AlreadyExists => io::ErrorKind::AlreadyExists,
            FsError::EntryNotFound => io::ErrorKind::NotFound,
            FsError::InvalidInput => io::ErrorKind::InvalidInput,
            FsError::UnexpectedEof => io::ErrorKind::UnexpectedEof,
            // NOTE: Use `IsADirectory`, `NotADirectory` and `StorageFull`
            // once the "io_error_more" Rust feature is stabilized.
            FsError::IsADirectory => io::ErrorKind::Other,
            FsError::NotADirectory => io::ErrorKind::Other,
            FsError::StorageFull => io::ErrorKind::Other,
            FsError::DirectoryNotEmpty => io::ErrorKind::Other,
            FsError::UnknownError => io::ErrorKind::Other,
        };
        kind.into()
    }
}

/// The kind of an entry in the tree: a file or a directory. The variant
/// set is closed; there are no symlinks or special files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileType {
    File,
    Directory,
}

impl FileType {
    pub fn is_file(self) -> bool {
        matches!(self, FileType::File)
    }

    pub fn is_dir(self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// The result of a `stat`.
///
/// For a file, `len` is the size of its contents in bytes. For a
/// directory, `len` is the number of (non-special) entries it holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub ft: FileType,
    pub len: u64,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        self.ft.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.ft.is_dir()
    }

    pub fn file_type(&self) -> FileType {
        self.ft
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.len
    }
}

/// One row in a directory listing. The special `.` and `..` entries are
/// never listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub ft: FileType,
}

impl DirEntry {
    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn file_type(&self) -> FileType {
        self.ft
    }
}
