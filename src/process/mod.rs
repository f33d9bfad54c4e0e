//! The per-process view of a filesystem: a working directory plus
//! absolute/relative path resolution over the core handles, and the
//! tree-traversal helpers built on top of them.

mod find;
mod walk;

pub use walk::WalkControl;

use crate::path;
use crate::{DirEntry, DirectoryHandle, FileHandle, FileSystem, Metadata, OpenMode, Result};

/// A process's filesystem context.
///
/// Every method accepts absolute and relative paths alike: an absolute
/// path is resolved against the root, a relative one against the
/// current working directory. The context starts out at the root.
pub struct ProcessContext {
    filesystem: FileSystem,
    workdir: DirectoryHandle,
}

impl ProcessContext {
    pub fn new(filesystem: FileSystem) -> Self {
        let workdir = filesystem.root();
        Self {
            filesystem,
            workdir,
        }
    }

    /// Cleans `path` and picks the directory it should be resolved
    /// against: the root for an absolute path (shaving the leading
    /// separator off), the working directory otherwise.
    fn resolve(&self, path: &str) -> (String, DirectoryHandle) {
        let cleaned = path::clean(path);
        if path::is_absolute(&cleaned) {
            let relative = cleaned.trim_start_matches(path::SEPARATOR).to_string();
            (relative, self.filesystem.root())
        } else {
            (cleaned, self.workdir.clone())
        }
    }

    /// The absolute path of the current working directory.
    pub fn working_directory(&self) -> Result<String> {
        self.workdir.reverse_path_lookup()
    }

    /// Changes the working directory.
    pub fn change_directory(&mut self, path: &str) -> Result<()> {
        let (relative, base) = self.resolve(path);
        self.workdir = base.lookup_subdirectory(&relative)?;
        Ok(())
    }

    /// Creates the directory at `path`.
    pub fn make_directory(&self, path: &str) -> Result<()> {
        let (relative, base) = self.resolve(path);
        base.mkdir(&relative)?;
        Ok(())
    }

    /// Lists the entries of the directory at `path`.
    pub fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let (relative, base) = self.resolve(path);
        base.read_dir(&relative)
    }

    /// Removes the empty directory at `path`.
    pub fn remove_directory(&self, path: &str) -> Result<()> {
        let (relative, base) = self.resolve(path);
        base.rmdir(&relative)
    }

    /// Creates the file at `path` and returns a read-write handle,
    /// failing if the path already exists.
    pub fn create_file(&self, path: &str) -> Result<FileHandle> {
        self.open_file(path, OpenMode::CREATE_FILE)
    }

    /// Opens the file at `path` in `mode`.
    pub fn open_file(&self, path: &str, mode: OpenMode) -> Result<FileHandle> {
        let (relative, base) = self.resolve(path);
        base.open_file(&relative, mode)
    }

    /// Removes the file at `path`.
    pub fn delete_file(&self, path: &str) -> Result<()> {
        let (relative, base) = self.resolve(path);
        base.delete_file(&relative)
    }

    /// Stats the file or directory at `path`.
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        let (relative, base) = self.resolve(path);
        base.stat(&relative)
    }

    /// Moves the entry at `src_path` to `dst_path`, replacing anything
    /// already there the way [`DirectoryHandle::rename`] does.
    ///
    /// When one path is relative and the other absolute, the relative
    /// one is first absolutized against the working directory, so both
    /// ends resolve against the same base.
    pub fn rename(&self, src_path: &str, dst_path: &str) -> Result<()> {
        let mut base = self.workdir.clone();
        let mut src = path::clean(src_path);
        let mut dst = path::clean(dst_path);
        if path::is_absolute(&src) && path::is_absolute(&dst) {
            base = self.filesystem.root();
            src = src.trim_start_matches(path::SEPARATOR).to_string();
            dst = dst.trim_start_matches(path::SEPARATOR).to_string();
        } else if path::is_absolute(&src) != path::is_absolute(&dst) {
            base = self.filesystem.root();
            let workdir = self.working_directory()?;
            if path::is_relative(&src) {
                src = path::join([workdir.as_str(), src.as_str()]);
            }
            if path::is_relative(&dst) {
                dst = path::join([workdir.as_str(), dst.as_str()]);
            }
            src = src.trim_start_matches(path::SEPARATOR).to_string();
            dst = dst.trim_start_matches(path::SEPARATOR).to_string();
        }
        base.rename(&src, &dst)
    }
}
