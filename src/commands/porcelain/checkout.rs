use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::{Migration, load_commit_tree};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around and check out other
commits, but new commits need a branch: create one with

    mgit branch <new-branch-name>

and check it out before committing.
"#;

impl Repository {
    /// Switch the working directory, index and HEAD to `target` (a branch name or
    /// a full commit hash).
    ///
    /// Refuses to run over staged changes unless `force` is set. Every object of
    /// the target is verified before any file is touched.
    pub async fn checkout(&mut self, target: &str, force: bool) -> anyhow::Result<()> {
        let revision = Revision::try_parse(self, target)?;
        let target_oid = revision.resolve(self)?;
        let current_head = self.refs().head()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let current_tree = current_head
            .commit()
            .map(|oid| load_commit_tree(self.database(), oid))
            .transpose()?;

        if !force && index.differs_from(current_tree.as_ref()) {
            return Err(RepositoryError::DirtyWorkingState.into());
        }

        let migration =
            Migration::plan(self.database(), self.workspace(), current_tree, &target_oid)?;
        migration.apply(self.workspace())?;

        let new_head = match revision {
            Revision::Branch(branch_name) => {
                self.refs().set_head_branch(&branch_name)?;
                HeadState::OnBranch(branch_name, target_oid.clone())
            }
            Revision::Commit(oid) => {
                self.refs().set_head_detached(&oid)?;
                HeadState::Detached(oid)
            }
            Revision::Head => current_head.clone(),
        };

        index.replace_with_tree(migration.target_tree());
        index.write_updates()?;

        self.print_previous_head(&current_head, &target_oid)?;
        self.print_detachment_notice(&current_head, &new_head, target);
        self.print_new_head(&current_head, &new_head, &target_oid)?;

        Ok(())
    }

    fn print_previous_head(
        &self,
        current_head: &HeadState,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        if let HeadState::Detached(current_oid) = current_head
            && current_oid != target_oid
        {
            self.print_head_position("Previous HEAD position was", current_oid)?;
        }

        Ok(())
    }

    fn print_detachment_notice(&self, current_head: &HeadState, new_head: &HeadState, target: &str) {
        if !current_head.is_detached() && new_head.is_detached() {
            eprintln!("Note: checking out '{}'.\n{}", target, DETACHMENT_NOTICE);
        }
    }

    fn print_new_head(
        &self,
        current_head: &HeadState,
        new_head: &HeadState,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        match new_head.branch() {
            None => self.print_head_position("HEAD is now at", target_oid)?,
            Some(branch) if current_head.branch() == Some(branch) => {
                eprintln!("Already on '{}'", branch)
            }
            Some(branch) => eprintln!("Switched to branch '{}'", branch),
        }

        Ok(())
    }

    fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.database().load_commit(oid)?;

        eprintln!("{} {} {}", message, oid.to_short_oid(), commit.short_message());
        Ok(())
    }
}
