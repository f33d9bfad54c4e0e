//! The directory node: an entry table, a deletion marker, and the
//! rename machinery, all behind a per-node reader-writer lock.

use super::{FileNode, Node};
use crate::path::{self, PathInfo, PARENT_ENTRY, SELF_ENTRY, SEPARATOR};
use crate::{DirEntry, FileType, FsError, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, Weak};

/// A directory.
///
/// The entry table holds strong references to the children; the `.` and
/// `..` names are not stored but resolved against the node itself and
/// its weak parent back-reference. The root's parent is itself.
///
/// A directory that has been removed from its parent is marked
/// `deleted`: it accepts no new entries, but nodes already reachable
/// through outstanding handles keep working.
pub(crate) struct DirectoryNode {
    /// Weak self-reference, so `&self` methods can hand out owning
    /// references. Set once at construction.
    me: Weak<DirectoryNode>,
    inner: RwLock<DirectoryInner>,
}

struct DirectoryInner {
    entries: BTreeMap<String, Node>,
    parent: Weak<DirectoryNode>,
    deleted: bool,
}

impl DirectoryNode {
    /// Creates the root directory. Its parent is itself.
    pub(crate) fn new_root() -> Arc<DirectoryNode> {
        Arc::new_cyclic(|me| DirectoryNode {
            me: me.clone(),
            inner: RwLock::new(DirectoryInner {
                entries: BTreeMap::new(),
                parent: me.clone(),
                deleted: false,
            }),
        })
    }

    fn new_child(parent: &Arc<DirectoryNode>) -> Arc<DirectoryNode> {
        Arc::new_cyclic(|me| DirectoryNode {
            me: me.clone(),
            inner: RwLock::new(DirectoryInner {
                entries: BTreeMap::new(),
                parent: Arc::downgrade(parent),
                deleted: false,
            }),
        })
    }

    fn arc(&self) -> Arc<DirectoryNode> {
        // An `&self` borrow proves at least one strong reference is
        // alive, so the upgrade cannot fail.
        self.me.upgrade().expect("directory node is alive")
    }

    /// The number of entries, not counting `.` and `..`.
    pub(crate) fn size(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.entries.len())
            .unwrap_or(0)
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.inner
            .read()
            .map(|inner| inner.deleted)
            .unwrap_or(false)
    }

    /// The directory's parent. Fails `EntryNotFound` when every strong
    /// reference to the parent is gone, which can only happen after the
    /// parent itself was detached from the tree.
    pub(crate) fn parent(&self) -> Result<Arc<DirectoryNode>> {
        let inner = self.inner.read().map_err(|_| FsError::UnknownError)?;
        inner.parent.upgrade().ok_or(FsError::EntryNotFound)
    }

    /// Whether this directory is the root, i.e. its own parent.
    pub(crate) fn is_root(&self) -> bool {
        match self.parent() {
            Ok(parent) => std::ptr::eq(Arc::as_ptr(&parent), self),
            Err(_) => false,
        }
    }

    /// Finds the name under which `child` sits in this directory.
    /// `EntryNotFound` when the child has been detached.
    pub(crate) fn reverse_lookup(&self, child: &Arc<DirectoryNode>) -> Result<String> {
        let inner = self.inner.read().map_err(|_| FsError::UnknownError)?;
        for (name, node) in &inner.entries {
            if let Node::Directory(directory) = node {
                if Arc::ptr_eq(directory, child) {
                    return Ok(name.clone());
                }
            }
        }
        Err(FsError::EntryNotFound)
    }

    /// Creates a subdirectory named `name` and returns it.
    pub(crate) fn add_directory(&self, name: &str) -> Result<Arc<DirectoryNode>> {
        check_entry_name(name)?;
        if name == SELF_ENTRY || name == PARENT_ENTRY {
            return Err(FsError::AlreadyExists);
        }
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        if inner.deleted {
            return Err(FsError::EntryNotFound);
        }
        if inner.entries.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        let child = DirectoryNode::new_child(&self.arc());
        inner
            .entries
            .insert(name.to_string(), Node::Directory(child.clone()));
        Ok(child)
    }

    /// Creates an empty file named `name` and returns it.
    pub(crate) fn add_file(&self, name: &str) -> Result<Arc<FileNode>> {
        check_entry_name(name)?;
        if name == SELF_ENTRY || name == PARENT_ENTRY {
            return Err(FsError::AlreadyExists);
        }
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        if inner.deleted {
            return Err(FsError::EntryNotFound);
        }
        if inner.entries.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        let file = Arc::new(FileNode::new());
        inner
            .entries
            .insert(name.to_string(), Node::File(file.clone()));
        Ok(file)
    }

    /// Looks up the entry named `name`, whatever its kind. `.` resolves
    /// to this directory and `..` to its parent.
    pub(crate) fn get_entry(&self, name: &str) -> Result<Node> {
        if name.contains(SEPARATOR) {
            return Err(FsError::InvalidInput);
        }
        if name == SELF_ENTRY {
            return Ok(Node::Directory(self.arc()));
        }
        let inner = self.inner.read().map_err(|_| FsError::UnknownError)?;
        if name == PARENT_ENTRY {
            return inner
                .parent
                .upgrade()
                .map(Node::Directory)
                .ok_or(FsError::EntryNotFound);
        }
        inner
            .entries
            .get(name)
            .cloned()
            .ok_or(FsError::EntryNotFound)
    }

    /// Looks up the directory named `name`. A directory that has been
    /// marked deleted is reported as absent.
    pub(crate) fn get_directory_entry(&self, name: &str) -> Result<Arc<DirectoryNode>> {
        let directory = match self.get_entry(name)? {
            Node::Directory(directory) => directory,
            Node::File(_) => return Err(FsError::NotADirectory),
        };
        if directory.is_deleted() {
            return Err(FsError::EntryNotFound);
        }
        Ok(directory)
    }

    /// Looks up the file named `name`.
    pub(crate) fn get_file_entry(&self, name: &str) -> Result<Arc<FileNode>> {
        match self.get_entry(name)? {
            Node::File(file) => Ok(file),
            Node::Directory(_) => Err(FsError::IsADirectory),
        }
    }

    /// Returns the file named `name`, creating it if absent. With
    /// `exclusive`, an existing file is an error instead.
    pub(crate) fn create_file_entry(&self, name: &str, exclusive: bool) -> Result<Arc<FileNode>> {
        if name.contains(SEPARATOR) {
            return Err(FsError::InvalidInput);
        }
        if name == SELF_ENTRY || name == PARENT_ENTRY {
            return Err(FsError::IsADirectory);
        }
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        match inner.entries.get(name) {
            Some(Node::Directory(_)) => Err(FsError::IsADirectory),
            Some(Node::File(_)) if exclusive => Err(FsError::AlreadyExists),
            Some(Node::File(file)) => Ok(file.clone()),
            None => {
                if inner.deleted {
                    return Err(FsError::EntryNotFound);
                }
                let file = Arc::new(FileNode::new());
                inner
                    .entries
                    .insert(name.to_string(), Node::File(file.clone()));
                Ok(file)
            }
        }
    }

    /// Lists the entries in lexicographic order, omitting `.` and `..`.
    pub(crate) fn entries(&self) -> Result<Vec<DirEntry>> {
        let inner = self.inner.read().map_err(|_| FsError::UnknownError)?;
        Ok(inner
            .entries
            .iter()
            .map(|(name, node)| DirEntry {
                name: name.clone(),
                ft: node.file_type(),
            })
            .collect())
    }

    /// Resolves `subpath`, which must be relative, against this
    /// directory, walking one entry at a time. Empty segments are
    /// skipped, and `.`/`..` resolve like any other entry. The empty
    /// path resolves to this directory itself.
    pub(crate) fn lookup_subpath(&self, subpath: &str) -> Result<Arc<DirectoryNode>> {
        if subpath.is_empty() {
            return Ok(self.arc());
        }
        if !path::is_relative(subpath) {
            return Err(FsError::InvalidInput);
        }
        let mut current = self.arc();
        for segment in subpath.split(SEPARATOR) {
            if segment.is_empty() {
                continue;
            }
            current = current.get_directory_entry(segment)?;
        }
        Ok(current)
    }

    /// Removes the empty subdirectory named `name`, marking it deleted.
    pub(crate) fn delete_directory(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        inner.remove_directory(name)
    }

    /// Removes the file named `name`. Outstanding handles keep the
    /// node's contents alive.
    pub(crate) fn delete_file(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        inner.remove_file(name)
    }

    /// Repoints this directory's `..` at `parent`.
    pub(crate) fn set_parent(&self, parent: &Arc<DirectoryNode>) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        inner.parent = Arc::downgrade(parent);
        Ok(())
    }

    /// Marks this directory deleted. Only an empty directory can be
    /// deleted; marking an already-deleted directory succeeds.
    fn mark_deleted(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        if inner.deleted {
            return Ok(());
        }
        if !inner.entries.is_empty() {
            return Err(FsError::DirectoryNotEmpty);
        }
        inner.deleted = true;
        Ok(())
    }

    /// Renames `src.entry` to `dst.entry` within this directory. This is
    /// the single-lock special case of [`move_entry`].
    fn rename_within(&self, src: &PathInfo, dst: &PathInfo) -> Result<()> {
        if src.entry == dst.entry {
            return Ok(());
        }
        let mut inner = self.inner.write().map_err(|_| FsError::UnknownError)?;
        if inner.deleted {
            return Err(FsError::EntryNotFound);
        }
        let node = inner
            .entries
            .get(&src.entry)
            .cloned()
            .ok_or(FsError::EntryNotFound)?;
        if !node.is_directory() && (src.must_be_dir || dst.must_be_dir) {
            return Err(FsError::NotADirectory);
        }
        match &node {
            Node::File(file) => inner.insert_file(&dst.entry, file.clone())?,
            // The parent is unchanged, so re-pointing `..` is a no-op
            // here, but the typed insert also evicts any existing entry.
            Node::Directory(directory) => {
                inner.insert_directory(&dst.entry, directory.clone(), &self.arc())?
            }
        }
        inner.entries.remove(&src.entry);
        Ok(())
    }
}

impl DirectoryInner {
    fn remove_file(&mut self, name: &str) -> Result<()> {
        if name == SELF_ENTRY || name == PARENT_ENTRY {
            return Err(FsError::IsADirectory);
        }
        match self.entries.get(name).map(Node::file_type) {
            None => Err(FsError::EntryNotFound),
            Some(FileType::Directory) => Err(FsError::IsADirectory),
            Some(FileType::File) => {
                self.entries.remove(name);
                Ok(())
            }
        }
    }

    fn remove_directory(&mut self, name: &str) -> Result<()> {
        if name == SELF_ENTRY || name == PARENT_ENTRY {
            return Err(FsError::InvalidInput);
        }
        let directory = match self.entries.get(name) {
            None => return Err(FsError::EntryNotFound),
            Some(Node::File(_)) => return Err(FsError::NotADirectory),
            Some(Node::Directory(directory)) => directory.clone(),
        };
        // Refuses on a nonempty child, in which case the entry stays.
        directory.mark_deleted()?;
        self.entries.remove(name);
        Ok(())
    }

    /// Inserts `file` under `name`, evicting any existing entry first.
    fn insert_file(&mut self, name: &str, file: Arc<FileNode>) -> Result<()> {
        self.evict(name)?;
        self.entries.insert(name.to_string(), Node::File(file));
        Ok(())
    }

    /// Inserts `directory` under `name`, evicting any existing entry
    /// first and re-pointing the moved directory's `..` at `parent`.
    fn insert_directory(
        &mut self,
        name: &str,
        directory: Arc<DirectoryNode>,
        parent: &Arc<DirectoryNode>,
    ) -> Result<()> {
        self.evict(name)?;
        self.entries
            .insert(name.to_string(), Node::Directory(directory.clone()));
        directory.set_parent(parent)?;
        Ok(())
    }

    /// Removes whatever entry currently sits under `name`, if any. A
    /// nonempty directory refuses eviction, failing the insert.
    ///
    /// POSIX would refuse to replace a file with a directory (EISDIR on
    /// the destination); replacing it keeps rename uniform with the
    /// file-over-file case.
    fn evict(&mut self, name: &str) -> Result<()> {
        match self.entries.get(name).map(Node::file_type) {
            None => Ok(()),
            Some(FileType::File) => self.remove_file(name),
            Some(FileType::Directory) => self.remove_directory(name),
        }
    }
}

/// Moves the entry `src.entry` of `src_parent` to `dst.entry` under
/// `dst_parent`, atomically replacing any entry already there (a
/// directory can only replace an empty directory).
///
/// When the two parents differ, both write locks are taken in node
/// address order so that concurrent moves in opposite directions cannot
/// deadlock. Observers holding a read lock on either parent see the
/// rename as a single step.
pub(crate) fn move_entry(
    src_parent: &Arc<DirectoryNode>,
    dst_parent: &Arc<DirectoryNode>,
    src: &PathInfo,
    dst: &PathInfo,
) -> Result<()> {
    if src.entry == SELF_ENTRY || src.entry == PARENT_ENTRY {
        return Err(FsError::InvalidInput);
    }
    if dst.entry == SELF_ENTRY || dst.entry == PARENT_ENTRY {
        return Err(FsError::InvalidInput);
    }
    if dst.entry.contains(SEPARATOR) {
        return Err(FsError::InvalidInput);
    }

    // The same parent on both sides needs a single lock, not two.
    if Arc::ptr_eq(src_parent, dst_parent) {
        return src_parent.rename_within(src, dst);
    }

    let src_first = Arc::as_ptr(src_parent) < Arc::as_ptr(dst_parent);
    let (first, second) = if src_first {
        (src_parent, dst_parent)
    } else {
        (dst_parent, src_parent)
    };
    let first_guard = first.inner.write().map_err(|_| FsError::UnknownError)?;
    let second_guard = second.inner.write().map_err(|_| FsError::UnknownError)?;
    let (mut src_inner, mut dst_inner) = if src_first {
        (first_guard, second_guard)
    } else {
        (second_guard, first_guard)
    };

    if dst_inner.deleted {
        return Err(FsError::EntryNotFound);
    }
    let node = src_inner
        .entries
        .get(&src.entry)
        .cloned()
        .ok_or(FsError::EntryNotFound)?;
    if !node.is_directory() && (src.must_be_dir || dst.must_be_dir) {
        return Err(FsError::NotADirectory);
    }
    // Replacing the source's own parent would try to re-lock a held
    // lock; POSIX calls this EINVAL (the destination must not be an
    // ancestor of the source).
    if let Some(Node::Directory(existing)) = dst_inner.entries.get(&dst.entry) {
        if Arc::ptr_eq(existing, src_parent) {
            return Err(FsError::InvalidInput);
        }
    }
    match &node {
        Node::File(file) => dst_inner.insert_file(&dst.entry, file.clone())?,
        Node::Directory(directory) => {
            // Moving a directory directly into itself would deadlock on
            // its own lock; POSIX calls this EINVAL.
            if Arc::ptr_eq(directory, dst_parent) {
                return Err(FsError::InvalidInput);
            }
            dst_inner.insert_directory(&dst.entry, directory.clone(), dst_parent)?;
        }
    }
    src_inner.entries.remove(&src.entry);
    Ok(())
}

fn check_entry_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(FsError::InvalidInput);
    }
    Ok(())
}

#[cfg(test)]
mod test_directory_node {
    use super::*;
    use crate::FileType;

    #[test]
    fn test_root_is_its_own_parent() {
        let root = DirectoryNode::new_root();
        assert!(root.is_root());
        assert!(Arc::ptr_eq(&root.parent().unwrap(), &root));
        assert_eq!(root.size(), 0);
    }

    #[test]
    fn test_add_directory() {
        let root = DirectoryNode::new_root();
        let child = root.add_directory("a").unwrap();

        assert!(!child.is_root());
        assert!(Arc::ptr_eq(&child.parent().unwrap(), &root));
        assert_eq!(root.size(), 1);
        assert_eq!(
            root.entries().unwrap(),
            vec![DirEntry {
                name: "a".to_string(),
                ft: FileType::Directory,
            }],
        );

        assert_eq!(
            root.add_directory("a").map(|_| ()),
            Err(FsError::AlreadyExists),
            "a duplicate entry name is refused",
        );
        assert_eq!(
            root.add_directory("a/b").map(|_| ()),
            Err(FsError::InvalidInput),
            "an entry name cannot contain the separator",
        );
        assert_eq!(
            root.add_directory("").map(|_| ()),
            Err(FsError::InvalidInput),
            "an entry name cannot be empty",
        );
        assert_eq!(
            root.add_directory(".").map(|_| ()),
            Err(FsError::AlreadyExists),
        );
        assert_eq!(
            root.add_directory("..").map(|_| ()),
            Err(FsError::AlreadyExists),
        );
    }

    #[test]
    fn test_add_file() {
        let root = DirectoryNode::new_root();
        let file = root.add_file("f").unwrap();
        assert_eq!(file.size(), 0);
        assert_eq!(
            root.entries().unwrap(),
            vec![DirEntry {
                name: "f".to_string(),
                ft: FileType::File,
            }],
        );
        assert_eq!(root.add_file("f").map(|_| ()), Err(FsError::AlreadyExists));
        assert_eq!(
            root.add_directory("f").map(|_| ()),
            Err(FsError::AlreadyExists),
            "files and directories share the name space",
        );
    }

    #[test]
    fn test_get_entry_specials() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();

        assert!(Arc::ptr_eq(&a.get_directory_entry(".").unwrap(), &a));
        assert!(Arc::ptr_eq(&a.get_directory_entry("..").unwrap(), &root));
        assert!(Arc::ptr_eq(
            &root.get_directory_entry("..").unwrap(),
            &root,
        ));
    }

    #[test]
    fn test_get_entry_kinds() {
        let root = DirectoryNode::new_root();
        root.add_directory("d").unwrap();
        root.add_file("f").unwrap();

        assert_eq!(
            root.get_directory_entry("f").map(|_| ()),
            Err(FsError::NotADirectory),
        );
        assert_eq!(
            root.get_file_entry("d").map(|_| ()),
            Err(FsError::IsADirectory),
        );
        assert_eq!(
            root.get_file_entry(".").map(|_| ()),
            Err(FsError::IsADirectory),
        );
        assert_eq!(
            root.get_directory_entry("missing").map(|_| ()),
            Err(FsError::EntryNotFound),
        );
        assert_eq!(
            root.get_entry("a/b").map(|_| ()),
            Err(FsError::InvalidInput),
        );
    }

    #[test]
    fn test_create_file_entry() {
        let root = DirectoryNode::new_root();
        root.add_directory("d").unwrap();

        let created = root.create_file_entry("f", true).unwrap();
        let reopened = root.create_file_entry("f", false).unwrap();
        assert!(Arc::ptr_eq(&created, &reopened));

        assert_eq!(
            root.create_file_entry("f", true).map(|_| ()),
            Err(FsError::AlreadyExists),
        );
        assert_eq!(
            root.create_file_entry("d", false).map(|_| ()),
            Err(FsError::IsADirectory),
        );
        assert_eq!(
            root.create_file_entry(".", false).map(|_| ()),
            Err(FsError::IsADirectory),
        );
    }

    #[test]
    fn test_lookup_subpath() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = a.add_directory("b").unwrap();
        let c = b.add_directory("c").unwrap();

        assert!(Arc::ptr_eq(&root.lookup_subpath("").unwrap(), &root));
        assert!(Arc::ptr_eq(&root.lookup_subpath("a/b/c").unwrap(), &c));
        assert!(Arc::ptr_eq(&root.lookup_subpath("a/./b/..").unwrap(), &a));
        assert_eq!(
            root.lookup_subpath("/a").map(|_| ()),
            Err(FsError::InvalidInput),
            "absolute paths are rejected",
        );
        assert_eq!(
            root.lookup_subpath("a/missing").map(|_| ()),
            Err(FsError::EntryNotFound),
        );

        // Redundant separators and `.`/`..` hops are walked through the
        // entry table; `..` above the root stays at the root.
        let resolved = c.lookup_subpath("..//../../../..///./a/b//c/").unwrap();
        assert!(Arc::ptr_eq(&resolved, &c));
    }

    #[test]
    fn test_lookup_subpath_through_file_fails() {
        let root = DirectoryNode::new_root();
        root.add_file("f").unwrap();
        assert_eq!(
            root.lookup_subpath("f/x").map(|_| ()),
            Err(FsError::NotADirectory),
        );
    }

    #[test]
    fn test_delete_directory() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = a.add_directory("b").unwrap();

        assert_eq!(
            root.delete_directory("a"),
            Err(FsError::DirectoryNotEmpty),
            "a nonempty directory cannot be removed",
        );
        assert_eq!(root.size(), 1, "the failed removal had no effect");

        assert_eq!(a.delete_directory("b"), Ok(()));
        assert!(b.is_deleted());
        assert_eq!(a.size(), 0);
        assert_eq!(
            a.get_directory_entry("b").map(|_| ()),
            Err(FsError::EntryNotFound),
        );

        // The detached node refuses new entries but stays readable.
        assert_eq!(
            b.add_directory("x").map(|_| ()),
            Err(FsError::EntryNotFound),
        );
        assert_eq!(
            b.create_file_entry("x", false).map(|_| ()),
            Err(FsError::EntryNotFound),
        );
        assert_eq!(b.entries().unwrap(), Vec::new());
        assert!(Arc::ptr_eq(&b.parent().unwrap(), &a));

        assert_eq!(root.delete_directory("a"), Ok(()));
        assert_eq!(root.delete_directory("a"), Err(FsError::EntryNotFound));
        assert_eq!(root.delete_directory("."), Err(FsError::InvalidInput));
        assert_eq!(root.delete_directory(".."), Err(FsError::InvalidInput));
    }

    #[test]
    fn test_delete_directory_on_file() {
        let root = DirectoryNode::new_root();
        root.add_file("f").unwrap();
        assert_eq!(root.delete_directory("f"), Err(FsError::NotADirectory));
    }

    #[test]
    fn test_delete_file() {
        let root = DirectoryNode::new_root();
        root.add_file("f").unwrap();
        root.add_directory("d").unwrap();

        assert_eq!(root.delete_file("f"), Ok(()));
        assert_eq!(root.delete_file("f"), Err(FsError::EntryNotFound));
        assert_eq!(root.delete_file("d"), Err(FsError::IsADirectory));
        assert_eq!(root.delete_file("."), Err(FsError::IsADirectory));
    }

    #[test]
    fn test_reverse_lookup() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = a.add_directory("b").unwrap();

        assert_eq!(a.reverse_lookup(&b), Ok("b".to_string()));
        assert_eq!(root.reverse_lookup(&a), Ok("a".to_string()));
        assert_eq!(root.reverse_lookup(&b), Err(FsError::EntryNotFound));
        assert_eq!(
            root.reverse_lookup(&root),
            Err(FsError::EntryNotFound),
            "a directory is not its own entry",
        );

        a.delete_directory("b").unwrap();
        assert_eq!(
            a.reverse_lookup(&b),
            Err(FsError::EntryNotFound),
            "a detached child has no entry",
        );
    }

    #[test]
    fn test_move_entry_across_parents() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        let c = a.add_directory("c").unwrap();

        move_entry(&a, &b, &path::parse("c"), &path::parse("c_moved")).unwrap();

        assert_eq!(a.size(), 0);
        assert!(Arc::ptr_eq(&b.get_directory_entry("c_moved").unwrap(), &c));
        assert!(
            Arc::ptr_eq(&c.parent().unwrap(), &b),
            "the moved directory's `..` follows it",
        );
    }

    #[test]
    fn test_move_entry_file_across_parents() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        let file = a.add_file("f").unwrap();

        move_entry(&a, &b, &path::parse("f"), &path::parse("g")).unwrap();
        assert!(Arc::ptr_eq(&b.get_file_entry("g").unwrap(), &file));
        assert_eq!(a.size(), 0);
    }

    #[test]
    fn test_move_entry_replaces_file() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        let src = a.add_file("f").unwrap();
        b.add_file("g").unwrap();

        move_entry(&a, &b, &path::parse("f"), &path::parse("g")).unwrap();
        assert!(Arc::ptr_eq(&b.get_file_entry("g").unwrap(), &src));
        assert_eq!(b.size(), 1);
    }

    #[test]
    fn test_move_entry_replaces_empty_directory_only() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        a.add_directory("src").unwrap();
        let dst = b.add_directory("dst").unwrap();
        dst.add_file("occupant").unwrap();

        assert_eq!(
            move_entry(&a, &b, &path::parse("src"), &path::parse("dst")),
            Err(FsError::DirectoryNotEmpty),
        );
        assert_eq!(a.size(), 1, "the source entry is untouched on failure");
        assert_eq!(b.size(), 1);

        dst.delete_file("occupant").unwrap();
        assert_eq!(
            move_entry(&a, &b, &path::parse("src"), &path::parse("dst")),
            Ok(()),
        );
        assert!(dst.is_deleted());
        assert_eq!(a.size(), 0);
    }

    #[test]
    fn test_move_entry_rejects_specials() {
        let root = DirectoryNode::new_root();
        root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();

        for (src, dst) in [(".", "x"), ("..", "x"), ("a", "."), ("a", "..")] {
            assert_eq!(
                move_entry(&root, &b, &path::parse(src), &path::parse(dst)),
                Err(FsError::InvalidInput),
            );
        }
    }

    #[test]
    fn test_move_entry_must_be_dir_mismatch() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        a.add_file("f").unwrap();

        assert_eq!(
            move_entry(&a, &b, &path::parse("f/"), &path::parse("g")),
            Err(FsError::NotADirectory),
        );
        assert_eq!(
            move_entry(&a, &b, &path::parse("f"), &path::parse("g/")),
            Err(FsError::NotADirectory),
        );
    }

    #[test]
    fn test_move_entry_into_moved_directory() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        assert_eq!(
            move_entry(&root, &a, &path::parse("a"), &path::parse("x")),
            Err(FsError::InvalidInput),
        );
    }

    #[test]
    fn test_move_entry_into_deleted_parent() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        a.add_file("f").unwrap();
        root.delete_directory("b").unwrap();

        assert_eq!(
            move_entry(&a, &b, &path::parse("f"), &path::parse("f")),
            Err(FsError::EntryNotFound),
        );
    }

    #[test]
    fn test_rename_within_same_parent() {
        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let file = a.add_file("f").unwrap();

        move_entry(&a, &a, &path::parse("f"), &path::parse("g")).unwrap();
        assert!(Arc::ptr_eq(&a.get_file_entry("g").unwrap(), &file));
        assert_eq!(
            a.get_file_entry("f").map(|_| ()),
            Err(FsError::EntryNotFound),
        );

        // Identical source and destination names are a no-op success.
        move_entry(&a, &a, &path::parse("g"), &path::parse("g")).unwrap();
        assert!(Arc::ptr_eq(&a.get_file_entry("g").unwrap(), &file));
    }

    #[test]
    fn test_concurrent_cross_moves_do_not_deadlock() {
        use std::thread;

        let root = DirectoryNode::new_root();
        let a = root.add_directory("a").unwrap();
        let b = root.add_directory("b").unwrap();
        a.add_file("from_a").unwrap();
        b.add_file("from_b").unwrap();

        // Two moves in opposite directions between the same parents.
        let (a2, b2) = (a.clone(), b.clone());
        let forward = thread::spawn(move || {
            move_entry(&a2, &b2, &path::parse("from_a"), &path::parse("to_b"))
        });
        let (a3, b3) = (a.clone(), b.clone());
        let backward = thread::spawn(move || {
            move_entry(&b3, &a3, &path::parse("from_b"), &path::parse("to_a"))
        });

        forward.join().unwrap().unwrap();
        backward.join().unwrap().unwrap();

        assert!(a.get_file_entry("to_a").is_ok());
        assert!(b.get_file_entry("to_b").is_ok());
        assert_eq!(a.size(), 1);
        assert_eq!(b.size(), 1);
    }
}
