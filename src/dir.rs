//! The directory handle: the path-based API over the inode layer.

use crate::inode::{self, DirectoryNode, Node};
use crate::mode::OpenMode;
use crate::path::{self, PathInfo};
use crate::{DirEntry, FileHandle, FileType, FsError, Metadata, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A reference to a directory in the tree.
///
/// All methods take paths *relative to this directory*; an absolute
/// path fails `InvalidInput`. Handles are cheap to clone and compare by
/// node identity, and they keep their node alive: a handle to a removed
/// directory still answers reads, though the tree will refuse to grow
/// under it.
#[derive(Clone)]
pub struct DirectoryHandle {
    node: Arc<DirectoryNode>,
}

impl DirectoryHandle {
    pub(crate) fn new(node: Arc<DirectoryNode>) -> Self {
        Self { node }
    }

    /// Resolves `subdirectory` and returns a handle to it. The empty
    /// path resolves to this directory itself.
    pub fn lookup_subdirectory(&self, subdirectory: &str) -> Result<DirectoryHandle> {
        let node = self.node.lookup_subpath(subdirectory)?;
        Ok(DirectoryHandle::new(node))
    }

    /// Creates the directory at `subdirectory` and returns a handle to
    /// it. The parent must already exist.
    pub fn mkdir(&self, subdirectory: &str) -> Result<DirectoryHandle> {
        let info = parse_relative(subdirectory)?;
        trace!(path = subdirectory, "mkdir");
        let parent = self.node.lookup_subpath(&info.parent)?;
        let created = parent.add_directory(&info.entry)?;
        Ok(DirectoryHandle::new(created))
    }

    /// Lists the entries of the directory at `subdirectory` in
    /// lexicographic order, `.` and `..` omitted.
    pub fn read_dir(&self, subdirectory: &str) -> Result<Vec<DirEntry>> {
        if !path::is_relative(subdirectory) {
            return Err(FsError::InvalidInput);
        }
        let node = self.node.lookup_subpath(subdirectory)?;
        node.entries()
    }

    /// Removes the empty directory at `subdirectory`.
    pub fn rmdir(&self, subdirectory: &str) -> Result<()> {
        let info = parse_relative(subdirectory)?;
        trace!(path = subdirectory, "rmdir");
        let parent = self.node.lookup_subpath(&info.parent)?;
        parent.delete_directory(&info.entry)
    }

    /// Opens the file at `relative_path` in `mode`. With `CREATE` the
    /// file is created if absent (`EXCL` making an existing file an
    /// error); with truncation and write access the file is emptied
    /// first. A path with a trailing separator names a directory and is
    /// rejected with `InvalidInput`.
    pub fn open_file(&self, relative_path: &str, mode: OpenMode) -> Result<FileHandle> {
        let info = parse_relative(relative_path)?;
        if info.must_be_dir {
            return Err(FsError::InvalidInput);
        }
        debug!(path = relative_path, ?mode, "open");
        let parent = self.node.lookup_subpath(&info.parent)?;
        let node = if mode.is_create() {
            parent.create_file_entry(&info.entry, mode.is_exclusive())?
        } else {
            parent.get_file_entry(&info.entry)?
        };
        if mode.is_truncate() {
            node.truncate_and_write_all(Vec::new())?;
        }
        Ok(FileHandle::new(node, mode))
    }

    /// Creates the file at `relative_path`, failing if it already
    /// exists, and returns a read-write handle to it.
    pub fn create_file(&self, relative_path: &str) -> Result<FileHandle> {
        self.open_file(relative_path, OpenMode::CREATE_FILE)
    }

    /// Removes the file at `relative_path`. Outstanding handles keep
    /// its contents alive.
    pub fn delete_file(&self, relative_path: &str) -> Result<()> {
        let info = parse_relative(relative_path)?;
        if info.must_be_dir {
            return Err(FsError::InvalidInput);
        }
        trace!(path = relative_path, "unlink");
        let parent = self.node.lookup_subpath(&info.parent)?;
        parent.delete_file(&info.entry)
    }

    /// Moves the entry at `src_path` to `dst_path`, atomically
    /// replacing anything already there. A directory can only replace
    /// an empty directory; a file can replace any file.
    pub fn rename(&self, src_path: &str, dst_path: &str) -> Result<()> {
        let src = parse_relative(src_path)?;
        let dst = parse_relative(dst_path)?;
        trace!(from = src_path, to = dst_path, "rename");
        let src_parent = self.node.lookup_subpath(&src.parent)?;
        let dst_parent = self.node.lookup_subpath(&dst.parent)?;
        inode::move_entry(&src_parent, &dst_parent, &src, &dst)
    }

    /// Stats the entry at `relative_path`; the empty path stats this
    /// directory itself. A file path with a trailing separator fails
    /// `NotADirectory`.
    pub fn stat(&self, relative_path: &str) -> Result<Metadata> {
        let info = parse_relative(relative_path)?;
        let parent = self.node.lookup_subpath(&info.parent)?;
        match parent.get_entry(&info.entry)? {
            Node::File(file) => {
                if info.must_be_dir {
                    return Err(FsError::NotADirectory);
                }
                Ok(Metadata {
                    ft: FileType::File,
                    len: file.size() as u64,
                })
            }
            Node::Directory(directory) => Ok(Metadata {
                ft: FileType::Directory,
                len: directory.size() as u64,
            }),
        }
    }

    /// Reconstructs this directory's absolute path by walking `..` up
    /// to the root and asking each parent for the child's name. Fails
    /// `EntryNotFound` once any ancestor no longer contains the child,
    /// which happens when the directory was removed or detached.
    pub fn reverse_path_lookup(&self) -> Result<String> {
        let mut parts: Vec<String> = Vec::new();
        let mut current = self.node.clone();
        while !current.is_root() {
            let parent = current.parent()?;
            let name = parent.reverse_lookup(&current)?;
            parts.push(name);
            current = parent;
        }
        parts.reverse();
        Ok(format!("/{}", parts.join("/")))
    }
}

/// Two handles are equal when they reference the same directory node.
impl PartialEq for DirectoryHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for DirectoryHandle {}

impl fmt::Debug for DirectoryHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DirectoryHandle")
            .field("entries", &self.node.size())
            .field("deleted", &self.node.is_deleted())
            .finish()
    }
}

fn parse_relative(relative_path: &str) -> Result<PathInfo> {
    let info = path::parse(relative_path);
    if !info.is_relative {
        return Err(FsError::InvalidInput);
    }
    Ok(info)
}
