//! Index (staging area)
//!
//! A persistent `path → blob hash` mapping of what the next commit will contain.
//!
//! ## Index File Format
//!
//! One `<blob_hash> <path>` line per entry, sorted by path. The file is always
//! rewritten as a whole (never appended to), so stale or duplicate lines cannot
//! accumulate.
//!
//! Entries whose file no longer exists in the working directory are pruned when the
//! index is loaded.

use crate::artifacts::core::{read_locked, write_atomically};
use crate::artifacts::index::StageOutcome;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.mgit/index`)
    path: Box<Path>,
    /// Working directory root, used to prune entries for deleted files
    worktree: Box<Path>,
    entries: BTreeMap<String, ObjectId>,
    /// Set when the in-memory entries differ from what was last loaded or written
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>, worktree: Box<Path>) -> Self {
        Index {
            path,
            worktree,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the index from disk, replacing the in-memory entries, and return the
    /// paths pruned because their file is gone.
    ///
    /// A missing or empty file is an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<Vec<String>> {
        self.entries.clear();
        self.changed = false;

        let Some(content) = read_locked(&self.path)? else {
            return Ok(Vec::new());
        };

        for (line_number, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let entry = IndexEntry::parse_line(line).with_context(|| {
                format!(
                    "corrupt index file {} at line {}",
                    self.path.display(),
                    line_number + 1
                )
            })?;
            self.entries.insert(entry.path, entry.oid);
        }

        let pruned = self.unstage_missing();
        if !pruned.is_empty() {
            tracing::debug!(count = pruned.len(), "pruned index entries for deleted files");
        }

        Ok(pruned)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Upsert an entry.
    pub fn stage(&mut self, entry: IndexEntry) -> StageOutcome {
        let outcome = match self.entries.get(&entry.path) {
            None => StageOutcome::Added,
            Some(oid) if *oid == entry.oid => StageOutcome::Unchanged,
            Some(_) => StageOutcome::Updated,
        };

        if outcome != StageOutcome::Unchanged {
            self.entries.insert(entry.path, entry.oid);
            self.changed = true;
        }

        outcome
    }

    pub fn remove(&mut self, path: &str) -> bool {
        let removed = self.entries.remove(path).is_some();
        self.changed |= removed;
        removed
    }

    /// Drop entries whose file is gone from the working directory and return
    /// their paths.
    pub fn unstage_missing(&mut self) -> Vec<String> {
        let missing = self
            .entries
            .keys()
            .filter(|path| !self.worktree.join(path.as_str()).is_file())
            .cloned()
            .collect::<Vec<_>>();

        for path in &missing {
            self.entries.remove(path);
        }
        self.changed |= !missing.is_empty();

        missing
    }

    /// Entries in path order, independent of insertion order.
    pub fn snapshot(&self) -> Vec<IndexEntry> {
        self.entries().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.entries
            .iter()
            .map(|(path, oid)| IndexEntry::new(path.clone(), oid.clone()))
    }

    /// Replace every entry with the content of a tree.
    pub fn replace_with_tree(&mut self, tree: &Tree) {
        self.entries = tree
            .entries()
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .collect();
        self.changed = true;
    }

    /// Whether the staged state differs from `tree` (an absent tree means no commit yet).
    pub fn differs_from(&self, tree: Option<&Tree>) -> bool {
        match tree {
            None => !self.entries.is_empty(),
            Some(tree) => {
                self.entries.len() != tree.len()
                    || self
                        .entries
                        .iter()
                        .any(|(path, oid)| tree.get(path) != Some(oid))
            }
        }
    }

    /// Persist the full entry set, replacing the previous file.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let content = self
            .entries()
            .map(|entry| entry.to_line() + "\n")
            .collect::<String>();

        write_atomically(&self.path, content.as_bytes())?;
        tracing::debug!(entries = self.entries.len(), "wrote index");
        self.changed = false;

        Ok(())
    }
}
