//! Name-based search helpers over [`ProcessContext::walk`].

use super::{ProcessContext, WalkControl};
use crate::{path, FsError, Result};
use regex::Regex;

impl ProcessContext {
    /// Collects the paths of every file and directory under
    /// `subtree_path` whose entry name is exactly `name`, in walk
    /// (lexical) order. The returned paths carry `subtree_path` as a
    /// prefix.
    pub fn find_all(&self, subtree_path: &str, name: &str) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        self.walk(subtree_path, |entry_path, _meta, _err| {
            if path::parse(entry_path).entry == name {
                paths.push(entry_path.to_string());
            }
            WalkControl::Continue
        })?;
        Ok(paths)
    }

    /// Returns the path of the first *file* under `subtree_path` (in
    /// walk order) whose entry name matches `pattern`. Directories can
    /// match without ending the search. `EntryNotFound` when nothing
    /// matches; `InvalidInput` when the pattern does not parse.
    pub fn find_first_matching_file(&self, subtree_path: &str, pattern: &str) -> Result<String> {
        let regex = Regex::new(pattern).map_err(|_| FsError::InvalidInput)?;
        let mut found: Option<String> = None;
        self.walk(subtree_path, |entry_path, meta, err| {
            let meta = match meta {
                Some(meta) => meta,
                None => return WalkControl::Abort(err.unwrap_or(FsError::UnknownError)),
            };
            if found.is_some() {
                // Already satisfied: prune everything that is left.
                return WalkControl::SkipDir;
            }
            if !regex.is_match(&path::parse(entry_path).entry) {
                return WalkControl::Continue;
            }
            if meta.is_file() {
                found = Some(entry_path.to_string());
                return WalkControl::SkipDir;
            }
            WalkControl::Continue
        })?;
        found.ok_or(FsError::EntryNotFound)
    }
}
