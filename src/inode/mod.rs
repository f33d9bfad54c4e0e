//! The inode layer: the tree of nodes that backs the filesystem.
//!
//! Every node carries its own reader-writer lock, so lookups, reads,
//! writes, and mutations of unrelated nodes never contend. The only
//! routine that ever holds two inode locks at once is [`move_entry`],
//! which orders its acquisitions by node address to preclude deadlock.
//!
//! Ownership flows parent-to-child: a directory's entry table holds
//! strong references to its children, while each directory keeps a weak
//! back-reference to its parent (the root points at itself). Handles
//! also hold strong references, which is what keeps an unlinked file
//! alive until its last handle drops.

mod directory;
mod file;

pub(crate) use directory::{move_entry, DirectoryNode};
pub(crate) use file::FileNode;

use crate::FileType;
use std::sync::Arc;

/// A node in the tree: either a file or a directory. The variant set is
/// closed to these two.
#[derive(Clone)]
pub(crate) enum Node {
    File(Arc<FileNode>),
    Directory(Arc<DirectoryNode>),
}

impl Node {
    pub(crate) fn file_type(&self) -> FileType {
        match self {
            Node::File(_) => FileType::File,
            Node::Directory(_) => FileType::Directory,
        }
    }

    pub(crate) fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }
}
