use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(
                RepositoryError::AlreadyInitialized(self.path().display().to_string()).into(),
            );
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .mgit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .mgit/refs/heads directory")?;

        self.refs()
            .set_head_branch(&BranchName::try_parse(DEFAULT_BRANCH.to_string())?)
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let index = index.lock().await;
        if !index.path().exists() {
            fs::write(index.path(), b"").context("Failed to create .mgit/index file")?;
        }

        writeln!(
            self.writer(),
            "Initialized empty mgit repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
