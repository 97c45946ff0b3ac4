use crate::areas::remote::RemoteBranches;
use crate::areas::repository::Repository;
use crate::artifacts::push::transport::{RemoteAddRequest, RemoteTransport, ResponseStatus};
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// Connect the repository to `repo` on the remote service and record the
    /// branches it already has.
    pub async fn remote_add<T: RemoteTransport>(
        &mut self,
        transport: &T,
        repo: &str,
    ) -> anyhow::Result<()> {
        let mut config = self.remote().load_config()?;
        let request = RemoteAddRequest {
            user: config.require_username()?.to_string(),
            api_key: config.hashed_api_key()?,
            repo: repo.to_string(),
        };

        let response = transport.add_remote(&request).await?;
        if response.status != ResponseStatus::Ok {
            return Err(RepositoryError::RemoteRejected(
                response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )
            .into());
        }

        let branches = RemoteBranches::from_raw(response.branches)?;
        config.repo = Some(repo.to_string());
        self.remote().save_config(&config)?;
        self.remote().save_remote_branches(&branches)?;

        writeln!(self.writer(), "Connected to remote '{}'.", repo)?;
        for (branch, commit) in branches.iter() {
            match commit {
                Some(commit) => writeln!(self.writer(), "  {} {}", branch, commit.to_short_oid())?,
                None => writeln!(self.writer(), "  {} (empty)", branch)?,
            }
        }

        Ok(())
    }
}
