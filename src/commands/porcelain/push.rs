use crate::areas::refs::HeadState;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::push::bundle::bundle_objects;
use crate::artifacts::push::transport::{PushRequest, RemoteTransport, ResponseStatus};
use crate::artifacts::push::walker::collect_objects_to_send;
use crate::errors::RepositoryError;
use std::io::Write;

/// `<local>[:<remote>]`; either side may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRefspec {
    pub local: Option<String>,
    pub remote: Option<String>,
}

impl PushRefspec {
    pub fn parse(refspec: Option<&str>) -> Self {
        let non_empty = |name: &str| (!name.is_empty()).then(|| name.to_string());

        match refspec {
            None => PushRefspec {
                local: None,
                remote: None,
            },
            Some(refspec) => match refspec.split_once(':') {
                Some((local, remote)) => PushRefspec {
                    local: non_empty(local),
                    remote: non_empty(remote),
                },
                None => PushRefspec {
                    local: non_empty(refspec),
                    remote: None,
                },
            },
        }
    }
}

impl Repository {
    /// Send a local branch to the remote service.
    ///
    /// The remote-tracking record is advanced only once the remote confirmed the
    /// push; a rejection or a network failure leaves it untouched.
    pub async fn push<T: RemoteTransport>(
        &mut self,
        transport: &T,
        refspec: Option<&str>,
    ) -> anyhow::Result<()> {
        let config = self.remote().load_config()?;
        let user = config.require_username()?.to_string();
        let api_key = config.hashed_api_key()?;
        let repo = config.require_repo()?.to_string();

        let refspec = PushRefspec::parse(refspec);
        let local_branch = match refspec.local {
            Some(local) => BranchName::try_parse(local)?,
            None => match self.refs().head()? {
                HeadState::Detached(_) => return Err(RepositoryError::DetachedHead.into()),
                HeadState::Unborn(branch) | HeadState::OnBranch(branch, _) => branch,
            },
        };
        let remote_branch = refspec
            .remote
            .unwrap_or_else(|| local_branch.to_string());

        if !self.refs().branch_exists(&local_branch) {
            match self.refs().head()? {
                HeadState::Unborn(branch) if branch == local_branch => {
                    return Err(RepositoryError::UnbornHead(local_branch.to_string()).into());
                }
                _ => return Err(RepositoryError::UnknownBranch(local_branch.to_string()).into()),
            }
        }
        let new_commit = self
            .refs()
            .read_branch(&local_branch)?
            .ok_or_else(|| RepositoryError::UnbornHead(local_branch.to_string()))?;

        let mut remote_branches = self.remote().load_remote_branches()?;
        let last_known = remote_branches.last_known(&remote_branch).cloned();

        if last_known.as_ref() == Some(&new_commit) {
            writeln!(self.writer(), "Everything up-to-date")?;
            return Ok(());
        }

        let push_set = collect_objects_to_send(self.database(), &new_commit, last_known.as_ref())?;
        let object_bundle = bundle_objects(self.database(), &push_set)?;
        tracing::info!(
            branch = %local_branch,
            remote_branch = %remote_branch,
            objects = push_set.len(),
            "pushing"
        );

        let request = PushRequest {
            user,
            api_key,
            repo: repo.clone(),
            branch: remote_branch.clone(),
            last_known_remote_commit: last_known.as_ref().map(ToString::to_string),
            new_commit: new_commit.to_string(),
            object_bundle,
        };
        let response = transport.push(request).await?;

        if response.status != ResponseStatus::Ok {
            let mut message = response
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            if let Some(remote_commit) = response.most_recent_remote_branch_commit {
                message = format!("{message} (remote '{remote_branch}' is at {remote_commit})");
            }

            return Err(RepositoryError::RemoteRejected(message).into());
        }

        remote_branches.set(&remote_branch, new_commit.clone());
        self.remote().save_remote_branches(&remote_branches)?;

        if let Some(message) = response.message {
            writeln!(self.writer(), "{}", message)?;
        }
        writeln!(self.writer(), "To {}", repo)?;
        match last_known {
            Some(last_known) => writeln!(
                self.writer(),
                "   {}..{}  {} -> {}",
                last_known.to_short_oid(),
                new_commit.to_short_oid(),
                local_branch,
                remote_branch
            )?,
            None => writeln!(
                self.writer(),
                " * [new branch]      {} -> {}",
                local_branch,
                remote_branch
            )?,
        }

        Ok(())
    }
}
