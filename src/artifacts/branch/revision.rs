use crate::areas::repository::Repository;
use crate::artifacts::branch::REF_ALIASES;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;

/// A user-supplied name for a commit.
///
/// Resolution order:
/// - `HEAD` and its alias `@`
/// - an existing branch name
/// - a full 40-character hash of a stored commit
///
/// Branches win over hashes, so a branch that happens to be named like a hash is
/// still checked out as a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    Branch(BranchName),
    Commit(ObjectId),
}

impl Revision {
    pub fn try_parse(repository: &Repository, name: &str) -> anyhow::Result<Self> {
        let name = REF_ALIASES.get(name).copied().unwrap_or(name);
        if name == "HEAD" {
            return Ok(Revision::Head);
        }

        if let Ok(branch_name) = BranchName::try_parse(name.to_string())
            && repository.refs().branch_exists(&branch_name)
        {
            return Ok(Revision::Branch(branch_name));
        }

        if name.len() == OBJECT_ID_LENGTH
            && let Ok(oid) = ObjectId::try_parse(name.to_string())
            && repository.database().contains(&oid)
            && repository.database().try_load_commit(&oid)?.is_some()
        {
            return Ok(Revision::Commit(oid));
        }

        Err(RepositoryError::UnknownRevision(name.to_string()).into())
    }

    /// The commit this revision points at.
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Head => {
                let head = repository.refs().head()?;
                head.commit().cloned().ok_or_else(|| {
                    let branch = head.branch().map(ToString::to_string).unwrap_or_default();
                    RepositoryError::UnbornHead(branch).into()
                })
            }
            Revision::Branch(branch_name) => repository
                .refs()
                .read_branch(branch_name)?
                .ok_or_else(|| RepositoryError::UnbornHead(branch_name.to_string()).into()),
            Revision::Commit(oid) => Ok(oid.clone()),
        }
    }
}
