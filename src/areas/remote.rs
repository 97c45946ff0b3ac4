//! Remote configuration and remote-tracking record
//!
//! - `config.json`: credentials and remote settings written by `login` and `remote add`
//! - `refs/remote_branches.json`: `remote branch → last known remote commit`, advanced
//!   only after the remote confirmed a push
//!
//! Both files are replaced atomically on every write.

use crate::artifacts::core::{read_locked, write_atomically};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.json";
pub const REMOTE_BRANCHES_FILENAME: &str = "remote_branches.json";
pub const API_URL_ENV: &str = "MGIT_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl RemoteConfig {
    /// Base URL of the remote service: CLI flag, then `MGIT_API_URL`, then the
    /// configured `api_url`, then the default.
    pub fn resolve_api_url(&self, cli_url: Option<&str>) -> String {
        let env_url = std::env::var(API_URL_ENV).ok();

        Self::pick_api_url(cli_url, env_url.as_deref(), self.api_url.as_deref())
    }

    fn pick_api_url(cli_url: Option<&str>, env_url: Option<&str>, config_url: Option<&str>) -> String {
        [cli_url, env_url, config_url]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn require_username(&self) -> anyhow::Result<&str> {
        self.username
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RepositoryError::MissingConfig("username").into())
    }

    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RepositoryError::MissingConfig("api_key").into())
    }

    pub fn require_repo(&self) -> anyhow::Result<&str> {
        self.repo
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RepositoryError::MissingConfig("repo").into())
    }

    /// The raw key never leaves the machine; requests carry its SHA-256.
    pub fn hashed_api_key(&self) -> anyhow::Result<String> {
        Ok(hash_api_key(self.require_api_key()?))
    }
}

pub fn hash_api_key(raw_api_key: &str) -> String {
    format!("{:x}", Sha256::digest(raw_api_key.as_bytes()))
}

/// Last commit each remote branch is known to hold; `None` means the branch has
/// never been pushed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteBranches {
    branches: BTreeMap<String, Option<ObjectId>>,
}

impl RemoteBranches {
    pub fn from_raw(raw: BTreeMap<String, Option<String>>) -> anyhow::Result<Self> {
        let mut branches = BTreeMap::new();

        for (name, commit) in raw {
            let commit = match commit.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(commit) => Some(
                    ObjectId::try_parse(commit.to_string())
                        .with_context(|| format!("invalid commit for remote branch {name}"))?,
                ),
            };
            branches.insert(name, commit);
        }

        Ok(RemoteBranches { branches })
    }

    pub fn last_known(&self, remote_branch: &str) -> Option<&ObjectId> {
        self.branches.get(remote_branch).and_then(Option::as_ref)
    }

    pub fn set(&mut self, remote_branch: &str, commit: ObjectId) {
        self.branches.insert(remote_branch.to_string(), Some(commit));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<ObjectId>)> {
        self.branches.iter()
    }

    fn to_raw(&self) -> BTreeMap<String, Option<String>> {
        self.branches
            .iter()
            .map(|(name, commit)| (name.clone(), commit.as_ref().map(ToString::to_string)))
            .collect()
    }
}

#[derive(Debug, new)]
pub struct Remote {
    /// Path to the metadata directory (typically `.mgit`)
    path: Box<Path>,
}

impl Remote {
    pub fn config_path(&self) -> Box<Path> {
        self.path.join(CONFIG_FILENAME).into_boxed_path()
    }

    pub fn remote_branches_path(&self) -> Box<Path> {
        self.path
            .join("refs")
            .join(REMOTE_BRANCHES_FILENAME)
            .into_boxed_path()
    }

    pub fn load_config(&self) -> anyhow::Result<RemoteConfig> {
        let path = self.config_path();
        match read_locked(&path)? {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)
                .with_context(|| format!("invalid configuration file {}", path.display())),
            _ => Ok(RemoteConfig::default()),
        }
    }

    pub fn save_config(&self, config: &RemoteConfig) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(config)?;
        write_atomically(&self.config_path(), &content)
    }

    pub fn load_remote_branches(&self) -> anyhow::Result<RemoteBranches> {
        let path = self.remote_branches_path();
        match read_locked(&path)? {
            Some(content) if !content.trim().is_empty() => {
                let raw = serde_json::from_str(&content)
                    .with_context(|| format!("invalid remote-tracking file {}", path.display()))?;
                RemoteBranches::from_raw(raw)
            }
            _ => Ok(RemoteBranches::default()),
        }
    }

    pub fn save_remote_branches(&self, branches: &RemoteBranches) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(&branches.to_raw())?;
        write_atomically(&self.remote_branches_path(), &content)
    }
}
