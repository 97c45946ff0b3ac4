//! Checkout migration
//!
//! Moving the working directory from one commit to another happens in two phases:
//!
//! 1. Planning: the current tree, the target tree and the content of every blob the
//!    target references are loaded and verified. A missing object aborts here with
//!    [`CorruptObjectGraph`](crate::errors::RepositoryError::CorruptObjectGraph),
//!    before anything on disk is touched. So does an untracked file standing where
//!    the target needs a directory, or inside a directory the target needs as a
//!    file ([`CheckoutConflict`](crate::errors::RepositoryError::CheckoutConflict)).
//! 2. Applying: every file tracked by the current tree is removed (untracked files
//!    are left alone), then every target entry is written over the same path.
//!
//! Updating HEAD and the index is left to the caller.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, require_referenced};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Tree of the commit `commit_oid`, with missing objects reported as graph corruption.
pub fn load_commit_tree(database: &Database, commit_oid: &ObjectId) -> anyhow::Result<Tree> {
    Ok(load_commit_tree_with_oid(database, commit_oid)?.1)
}

fn load_commit_tree_with_oid(
    database: &Database,
    commit_oid: &ObjectId,
) -> anyhow::Result<(ObjectId, Tree)> {
    let commit = require_referenced(database.load_commit(commit_oid), || {
        format!("reference to commit {commit_oid}")
    })?;
    let tree = require_referenced(database.load_tree(commit.tree_oid()), || {
        format!("commit {commit_oid}")
    })?;

    Ok((commit.tree_oid().clone(), tree))
}

#[derive(Debug)]
pub struct Migration {
    current_tree: Option<Tree>,
    target_tree: Tree,
    /// Content of every target entry, keyed by path
    target_files: BTreeMap<String, Bytes>,
}

impl Migration {
    /// Load everything the migration will need and make sure applying it cannot
    /// destroy untracked files. Nothing is written.
    pub fn plan(
        database: &Database,
        workspace: &Workspace,
        current_tree: Option<Tree>,
        target_commit: &ObjectId,
    ) -> anyhow::Result<Self> {
        let (target_tree_oid, target_tree) = load_commit_tree_with_oid(database, target_commit)?;

        let mut target_files = BTreeMap::new();
        for (path, blob_oid) in target_tree.entries() {
            let blob = require_referenced(database.load_blob(blob_oid), || {
                format!("tree {target_tree_oid} (entry {path})")
            })?;
            target_files.insert(path.clone(), blob.into_content());
        }

        let migration = Migration {
            current_tree,
            target_tree,
            target_files,
        };
        migration.check_untracked_collisions(workspace)?;

        Ok(migration)
    }

    /// Untracked files survive removal of the current tree; fail if one of them
    /// would block or be swallowed by a target entry.
    fn check_untracked_collisions(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let tracked = self
            .current_tree
            .iter()
            .flat_map(Tree::paths)
            .map(String::as_str)
            .collect::<BTreeSet<_>>();
        let mut conflicts = BTreeSet::new();

        for path in self.target_files.keys() {
            let full_path = workspace.path().join(path);
            if full_path.is_dir() {
                conflicts.extend(
                    workspace
                        .files_below(path)?
                        .into_iter()
                        .filter(|file| !tracked.contains(file.as_str())),
                );
            }

            let blocking_parents = path
                .match_indices('/')
                .map(|(position, _)| &path[..position])
                .filter(|parent| workspace.path().join(parent).is_file())
                .filter(|parent| !tracked.contains(parent));
            conflicts.extend(blocking_parents.map(str::to_string));
        }

        if conflicts.is_empty() {
            return Ok(());
        }

        tracing::debug!(count = conflicts.len(), "checkout blocked by untracked files");
        Err(RepositoryError::CheckoutConflict(conflicts.into_iter().collect()).into())
    }

    pub fn target_tree(&self) -> &Tree {
        &self.target_tree
    }

    /// Remove the current tree's files, then write the target's.
    pub fn apply(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let mut removed = 0;
        if let Some(current_tree) = &self.current_tree {
            for path in current_tree.paths() {
                workspace.remove_file(path)?;
                removed += 1;
            }
        }

        for (path, content) in &self.target_files {
            workspace.write_file(path, content)?;
        }

        tracing::info!(removed, written = self.target_files.len(), "applied checkout");

        Ok(())
    }
}
