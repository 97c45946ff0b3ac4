use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::errors::require_referenced;
use std::io::Write;

impl Repository {
    /// Print `<blob_hash> <path>` for every entry of a commit's tree.
    pub fn ls_tree(&mut self, revision: &str) -> anyhow::Result<()> {
        let commit_oid = Revision::try_parse(self, revision)?.resolve(self)?;
        let commit = self.database().load_commit(&commit_oid)?;
        let tree = require_referenced(self.database().load_tree(commit.tree_oid()), || {
            format!("commit {commit_oid}")
        })?;

        for (path, blob_oid) in tree.entries() {
            writeln!(self.writer(), "{} {}", blob_oid, path)?;
        }

        Ok(())
    }
}
