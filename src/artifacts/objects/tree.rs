//! Tree object
//!
//! A tree is a flat snapshot of every tracked file: one `<blob_hash> <path>` line
//! per file, sorted by path. Directory structure is not represented; it is derived
//! from the path strings whenever it is needed.
//!
//! Because entries are kept in a `BTreeMap` keyed by path, the serialized form (and
//! therefore the tree hash) depends only on the set of entries, never on the order
//! they were staged in.

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    /// Snapshot a set of index entries into a tree.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut tree = Tree::default();

        for entry in entries {
            tree.insert(entry.path.clone(), entry.oid.clone())?;
        }

        Ok(tree)
    }

    fn insert(&mut self, path: String, oid: ObjectId) -> anyhow::Result<()> {
        if self.entries.insert(path.clone(), oid).is_some() {
            anyhow::bail!("duplicate tree entry for path {path}");
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = String::new();

        for (path, oid) in &self.entries {
            content.push_str(oid.as_ref());
            content.push(' ');
            content.push_str(path);
            content.push('\n');
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tree = Tree::default();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let entry = IndexEntry::parse_line(&line)?;
            tree.insert(entry.path, entry.oid)?;
        }

        Ok(tree)
    }
}

impl Object for Tree {}
