//! Index entry
//!
//! Both the index file and tree objects use the same line shape:
//!
//! ```text
//! <blob_hash> <path>
//! ```
//!
//! Paths are repository-relative, `/`-separated and may contain spaces
//! (everything after the first space belongs to the path).

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub path: String,
    pub oid: ObjectId,
}

impl IndexEntry {
    pub fn to_line(&self) -> String {
        format!("{} {}", self.oid, self.path)
    }

    pub fn parse_line(line: &str) -> anyhow::Result<Self> {
        let (oid, path) = line
            .split_once(' ')
            .with_context(|| format!("malformed entry line: {line:?}"))?;

        if path.is_empty() {
            anyhow::bail!("malformed entry line (empty path): {line:?}");
        }

        Ok(Self::new(
            path.to_string(),
            ObjectId::try_parse(oid.to_string())?,
        ))
    }
}

/// Convert a relative filesystem path into the `/`-separated form stored in
/// entries, rejecting anything that could escape the repository or break the
/// line format.
pub fn to_entry_path(path: &Path) -> anyhow::Result<String> {
    let invalid = || RepositoryError::InvalidPath(path.display().to_string());

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(invalid)?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => return Err(invalid().into()),
        }
    }

    let entry_path = parts.join("/");
    if entry_path.is_empty() || entry_path.contains('\n') || entry_path.contains('\r') {
        return Err(invalid().into());
    }

    Ok(entry_path)
}
