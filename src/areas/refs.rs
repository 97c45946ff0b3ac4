//! References (HEAD and branches)
//!
//! ## Reference Types
//!
//! - HEAD: either symbolic (`ref: refs/heads/<branch>`) or a raw commit hash (detached)
//! - Branches: `refs/heads/*`, each file holding one commit hash
//!
//! ## HEAD states
//!
//! - `Unborn`: HEAD names a branch that has no commit yet (right after init)
//! - `OnBranch`: HEAD names a branch pointing at a commit
//! - `Detached`: HEAD holds a commit hash directly
//!
//! Only the branch HEAD is bound to can be advanced by a commit. In the detached
//! state, HEAD itself has to be re-pointed explicitly; no branch file is touched.

use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::{read_locked, write_atomically};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Resolved state of HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Unborn(BranchName),
    OnBranch(BranchName, ObjectId),
    Detached(ObjectId),
}

impl HeadState {
    /// The commit HEAD resolves to, if any.
    pub fn commit(&self) -> Option<&ObjectId> {
        match self {
            HeadState::Unborn(_) => None,
            HeadState::OnBranch(_, oid) | HeadState::Detached(oid) => Some(oid),
        }
    }

    /// The branch HEAD is bound to, if any.
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            HeadState::Unborn(branch) | HeadState::OnBranch(branch, _) => Some(branch),
            HeadState::Detached(_) => None,
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, HeadState::Detached(_))
    }
}

/// Raw content of a ref file.
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { branch_name: BranchName },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        let Some(content) = read_locked(path)? else {
            return Ok(None);
        };
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                branch_name: BranchName::try_parse_ref_path(&symref_match[1])?,
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content.to_string())
                    .with_context(|| format!("invalid ref file {}", path.display()))?,
            )))
        }
    }
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.mgit`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path
            .join(branch_name.as_ref_path())
            .into_boxed_path()
    }

    pub fn head(&self) -> anyhow::Result<HeadState> {
        match SymRefOrOid::read_symref_or_oid(&self.head_path())? {
            Some(SymRefOrOid::Oid(oid)) => Ok(HeadState::Detached(oid)),
            Some(SymRefOrOid::SymRef { branch_name }) => match self.read_branch(&branch_name)? {
                Some(oid) => Ok(HeadState::OnBranch(branch_name, oid)),
                None => Ok(HeadState::Unborn(branch_name)),
            },
            None => Ok(HeadState::Unborn(BranchName::try_parse(
                DEFAULT_BRANCH.to_string(),
            )?)),
        }
    }

    /// Commit HEAD resolves to, `None` while unborn.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        Ok(self.head()?.commit().cloned())
    }

    /// Bind HEAD to a branch: `ref: refs/heads/<branch>`
    pub fn set_head_branch(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        write_atomically(
            &self.head_path(),
            format!("ref: {}", branch_name.as_ref_path()).as_bytes(),
        )?;
        tracing::debug!(branch = %branch_name, "HEAD now on branch");

        Ok(())
    }

    /// Detach HEAD at a commit.
    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        write_atomically(&self.head_path(), oid.as_ref().as_bytes())?;
        tracing::debug!(%oid, "HEAD detached");

        Ok(())
    }

    /// Move the branch HEAD is bound to. Fails when HEAD is detached.
    pub fn advance_current_branch(&self, oid: &ObjectId) -> anyhow::Result<BranchName> {
        match self.head()? {
            HeadState::Detached(_) => Err(RepositoryError::DetachedHead.into()),
            HeadState::Unborn(branch_name) | HeadState::OnBranch(branch_name, _) => {
                self.write_branch(&branch_name, oid)?;
                tracing::debug!(branch = %branch_name, %oid, "advanced branch");
                Ok(branch_name)
            }
        }
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read_symref_or_oid(&self.branch_path(branch_name))? {
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            Some(SymRefOrOid::SymRef { .. }) => {
                anyhow::bail!("branch {branch_name} is a symbolic ref")
            }
            None => Ok(None),
        }
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    fn write_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        write_atomically(&self.branch_path(branch_name), oid.as_ref().as_bytes())
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(RepositoryError::BranchAlreadyExists(name.to_string()).into());
        }

        self.write_branch(name, source_oid)
    }

    /// Branch names in sorted order.
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !heads_path.exists() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }
}
