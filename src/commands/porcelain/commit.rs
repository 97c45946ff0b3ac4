use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, require_referenced};
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!("Aborting commit due to empty commit message");
        }

        let head = self.refs().head()?;
        if head.is_detached() {
            return Err(RepositoryError::DetachedHead.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let tree = Tree::build(&index.snapshot())?;
        let tree_id = tree.object_id()?;

        let parent = head.commit().cloned();
        let unchanged = match &parent {
            None => index.is_empty(),
            Some(parent) => {
                let parent_commit = require_referenced(self.database().load_commit(parent), || {
                    "HEAD".to_string()
                })?;
                *parent_commit.tree_oid() == tree_id
            }
        };

        if unchanged {
            if index.is_changed() {
                index.write_updates()?;
            }
            writeln!(self.writer(), "nothing to commit")?;
            return Ok(());
        }

        self.database().store(&tree)?;

        let config = self.remote().load_config()?;
        let author = Author::load_from_env(config.username.as_deref())?;

        let commit = Commit::new(parent, tree_id, author, message.to_string());
        let commit_id = self.database().store(&commit)?;
        let branch = self.refs().advance_current_branch(&commit_id)?;

        index.write_updates()?;

        let is_root = match head {
            HeadState::Unborn(_) => " (root-commit)",
            _ => "",
        };
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
