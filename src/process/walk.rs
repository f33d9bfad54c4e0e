//! Depth-first traversal of a subtree in lexical order.

use super::ProcessContext;
use crate::{path, FsError, Metadata, Result};

/// Tells [`ProcessContext::walk`] how to proceed after visiting an
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep walking.
    Continue,
    /// Skip the rest of the current directory: when the visited entry
    /// is a directory, its contents are not visited; when it is a file,
    /// the remaining entries of the containing directory are skipped.
    SkipDir,
    /// Stop the whole walk; [`ProcessContext::walk`] returns this
    /// error.
    Abort(FsError),
}

impl ProcessContext {
    /// Walks the tree rooted at `path`, calling `visit` for every file
    /// and directory, `path` itself included. Entries of a directory
    /// are visited in lexical order, so the traversal is deterministic.
    ///
    /// `visit` receives the entry's path (with `path` as a prefix), its
    /// metadata, and the error that prevented the walk from descending,
    /// if any; metadata and error are never both present. The returned
    /// [`WalkControl`] steers the traversal: [`WalkControl::SkipDir`]
    /// prunes, and any [`WalkControl::Abort`] stops the walk and
    /// surfaces its error. A `SkipDir` for the walk root simply ends
    /// the walk successfully.
    pub fn walk<F>(&self, path: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, Option<&Metadata>, Option<FsError>) -> WalkControl,
    {
        let control = match self.stat(path) {
            Err(err) => visit(path, None, Some(err)),
            Ok(meta) => self.walk_tree(path, &meta, &mut visit),
        };
        match control {
            WalkControl::Abort(err) => Err(err),
            _ => Ok(()),
        }
    }

    fn walk_tree<F>(&self, path: &str, meta: &Metadata, visit: &mut F) -> WalkControl
    where
        F: FnMut(&str, Option<&Metadata>, Option<FsError>) -> WalkControl,
    {
        // Files have nothing underneath them.
        if !meta.is_dir() {
            return visit(path, Some(meta), None);
        }

        let (entries, list_err) = match self.list_directory(path) {
            Ok(entries) => (entries, None),
            Err(err) => (Vec::new(), Some(err)),
        };
        let control = visit(path, Some(meta), list_err);
        if list_err.is_some() || control != WalkControl::Continue {
            // Either the listing failed, in which case the visitor's
            // verdict stands for this subtree, or the visitor asked to
            // prune or abort.
            return control;
        }

        // `list_directory` is already in lexical order.
        for entry in entries {
            let entry_path = path::join([path, entry.file_name()]);
            match self.stat(&entry_path) {
                Err(err) => match visit(&entry_path, None, Some(err)) {
                    // An entry the walk cannot descend into is not
                    // fatal unless the visitor says so.
                    WalkControl::Continue | WalkControl::SkipDir => continue,
                    abort => return abort,
                },
                Ok(entry_meta) => match self.walk_tree(&entry_path, &entry_meta, visit) {
                    WalkControl::Continue => continue,
                    // A pruned directory is already fully handled; a
                    // `SkipDir` on a file skips this directory's
                    // remaining entries at the caller's level.
                    WalkControl::SkipDir if entry_meta.is_dir() => continue,
                    other => return other,
                },
            }
        }
        WalkControl::Continue
    }
}
