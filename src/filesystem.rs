//! This module contains the [`FileSystem`] type itself.

use crate::inode::DirectoryNode;
use crate::{DirectoryHandle, FileType};
use std::fmt;
use std::sync::Arc;

/// The in-memory file system!
///
/// It owns nothing but the root directory; everything else hangs off
/// it. Cloning is a light copy: all clones share the same tree.
#[derive(Clone)]
pub struct FileSystem {
    root: Arc<DirectoryNode>,
}

impl FileSystem {
    /// Creates an empty filesystem: a root directory whose `.` and `..`
    /// both point at itself.
    pub fn new() -> Self {
        Self {
            root: DirectoryNode::new_root(),
        }
    }

    /// Returns a handle to the root directory.
    pub fn root(&self) -> DirectoryHandle {
        DirectoryHandle::new(self.root.clone())
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn debug(
            handle: &DirectoryHandle,
            name: &str,
            formatter: &mut fmt::Formatter<'_>,
            indentation: usize,
        ) -> fmt::Result {
            writeln!(
                formatter,
                "{ty:<4}   {indentation_symbol:indentation_width$}{name}",
                ty = "dir",
                indentation_symbol = " ",
                indentation_width = indentation * 2 + 1,
            )?;

            for entry in handle.read_dir("").into_iter().flatten() {
                match entry.file_type() {
                    FileType::Directory => {
                        if let Ok(child) = handle.lookup_subdirectory(&entry.name) {
                            debug(&child, &entry.name, formatter, indentation + 1)?;
                        }
                    }
                    FileType::File => {
                        writeln!(
                            formatter,
                            "{ty:<4}   {indentation_symbol:indentation_width$}{name}",
                            ty = "file",
                            name = entry.name,
                            indentation_symbol = " ",
                            indentation_width = (indentation + 1) * 2 + 1,
                        )?;
                    }
                }
            }

            Ok(())
        }

        writeln!(formatter, "\n{ty:<4}   name", ty = "type")?;
        debug(&self.root(), "/", formatter, 0)
    }
}
