//! Repository error taxonomy
//!
//! Operations return `anyhow::Result` and attach I/O context with `.context(...)`.
//! Failures that callers need to react to are raised as [`RepositoryError`] values,
//! so they can be recovered with `err.downcast_ref::<RepositoryError>()`.
//!
//! Remote failures (`RemoteRejected`, `RemoteUnreachable`) are kept apart from local
//! ones: retrying them only replays the network leg, never a local mutation.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("object {0} not found in the object store")]
    ObjectNotFound(ObjectId),

    #[error("cannot switch with staged changes; commit them or use --force")]
    DirtyWorkingState,

    #[error("untracked files would be lost by checkout: {}; move or remove them first", .0.join(", "))]
    CheckoutConflict(Vec<String>),

    #[error("HEAD is detached; there is no current branch to advance")]
    DetachedHead,

    #[error("branch '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("corrupt object graph: {context} references missing object {missing}")]
    CorruptObjectGraph { missing: ObjectId, context: String },

    #[error("remote rejected the request: {0}")]
    RemoteRejected(String),

    #[error("remote unreachable: {0}")]
    RemoteUnreachable(String),

    #[error("branch '{0}' does not have any commits yet")]
    UnbornHead(String),

    #[error("branch or commit '{0}' not found")]
    UnknownRevision(String),

    #[error("branch '{0}' does not exist")]
    UnknownBranch(String),

    #[error("not an mgit repository (or any of the parent directories): {0}")]
    NotARepository(String),

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("configuration is missing '{0}'; run `mgit login` and `mgit remote add` first")]
    MissingConfig(&'static str),

    #[error("authentication timed out, please try again")]
    LoginTimedOut,

    #[error("invalid path '{0}'")]
    InvalidPath(String),
}

/// Turn an `ObjectNotFound` raised while following a reference into a
/// `CorruptObjectGraph` naming the referrer.
pub fn require_referenced<T>(
    result: anyhow::Result<T>,
    context: impl FnOnce() -> String,
) -> anyhow::Result<T> {
    result.map_err(|error| match error.downcast_ref::<RepositoryError>() {
        Some(RepositoryError::ObjectNotFound(missing)) => RepositoryError::CorruptObjectGraph {
            missing: missing.clone(),
            context: context(),
        }
        .into(),
        _ => error,
    })
}
