//! Push reachability walk
//!
//! Starting at the commit being pushed, follow parent links backwards until either
//! the last commit the remote is known to hold (excluded) or a root commit
//! (included). Every visited commit contributes itself, its tree and the tree's
//! blobs.
//!
//! Objects are tagged with the kind of the reference that led to them; their
//! content is never inspected to guess what they are.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{RepositoryError, require_referenced};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushObject {
    pub kind: ObjectKind,
    pub oid: ObjectId,
}

/// Objects to transfer, in discovery order and without duplicates.
#[derive(Debug, Clone, Default)]
pub struct PushSet {
    objects: Vec<PushObject>,
    seen: HashSet<ObjectId>,
}

impl PushSet {
    fn insert(&mut self, kind: ObjectKind, oid: &ObjectId) -> bool {
        if !self.seen.insert(oid.clone()) {
            return false;
        }

        self.objects.push(PushObject {
            kind,
            oid: oid.clone(),
        });
        true
    }

    pub fn objects(&self) -> &[PushObject] {
        &self.objects
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.seen.contains(oid)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn oids_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &ObjectId> {
        self.objects
            .iter()
            .filter(move |object| object.kind == kind)
            .map(|object| &object.oid)
    }
}

/// Objects reachable from `new_commit` that the remote does not have yet.
///
/// With no `last_known_remote_commit` (first push) the whole ancestry is collected.
pub fn collect_objects_to_send(
    database: &Database,
    new_commit: &ObjectId,
    last_known_remote_commit: Option<&ObjectId>,
) -> anyhow::Result<PushSet> {
    let mut push_set = PushSet::default();
    let mut visited_commits = HashSet::new();
    let mut visited_trees = HashSet::new();

    let mut referrer = "pushed branch".to_string();
    let mut next_commit = Some(new_commit.clone());

    while let Some(commit_oid) = next_commit.take() {
        if Some(&commit_oid) == last_known_remote_commit {
            break;
        }
        if !visited_commits.insert(commit_oid.clone()) {
            tracing::warn!(oid = %commit_oid, "commit chain loops back on itself");
            break;
        }

        let commit = require_referenced(database.load_commit(&commit_oid), || referrer.clone())?;
        push_set.insert(ObjectKind::Commit, &commit_oid);

        let tree_oid = commit.tree_oid();
        if visited_trees.insert(tree_oid.clone()) {
            let tree = require_referenced(database.load_tree(tree_oid), || {
                format!("commit {commit_oid}")
            })?;
            push_set.insert(ObjectKind::Tree, tree_oid);

            for (path, blob_oid) in tree.entries() {
                if !database.contains(blob_oid) {
                    return Err(RepositoryError::CorruptObjectGraph {
                        missing: blob_oid.clone(),
                        context: format!("tree {tree_oid} (entry {path})"),
                    }
                    .into());
                }
                push_set.insert(ObjectKind::Blob, blob_oid);
            }
        }

        referrer = format!("parent of commit {commit_oid}");
        next_commit = commit.parent().cloned();
    }

    tracing::debug!(
        commits = visited_commits.len(),
        objects = push_set.len(),
        "collected objects to push"
    );

    Ok(push_set)
}
