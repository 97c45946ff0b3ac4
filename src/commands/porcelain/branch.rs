use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Create `branch_name` at HEAD's commit, or list branches when no name is given.
    pub fn branch(&mut self, branch_name: Option<&str>) -> anyhow::Result<()> {
        match branch_name {
            Some(branch_name) => self.create_branch(branch_name),
            None => self.list_branches(),
        }
    }

    fn create_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let source_oid = match self.refs().head()? {
            HeadState::Unborn(current) => {
                return Err(RepositoryError::UnbornHead(current.to_string()).into());
            }
            HeadState::OnBranch(_, oid) | HeadState::Detached(oid) => oid,
        };

        self.refs().create_branch(&branch_name, &source_oid)?;
        writeln!(
            self.writer(),
            "Created branch '{}' at {}",
            branch_name,
            source_oid.to_short_oid()
        )?;

        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let head = self.refs().head()?;

        if let HeadState::Detached(oid) = &head {
            let label = format!("(HEAD detached at {})", oid.to_short_oid());
            writeln!(self.writer(), "* {}", label.green())?;
        }

        for branch in self.refs().list_branches()? {
            if head.branch() == Some(&branch) {
                writeln!(self.writer(), "* {}", branch.as_ref().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch)?;
            }
        }

        Ok(())
    }
}
