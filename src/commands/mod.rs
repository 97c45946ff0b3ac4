//! Command implementations
//!
//! - `plumbing`: Low-level commands for direct object access (hash-object, cat-file, ls-tree)
//! - `porcelain`: User-facing commands for version control workflows (add, commit, push, etc.)
//!
//! Commands are `impl Repository` blocks writing their output through
//! `Repository::writer`.

pub mod plumbing;
pub mod porcelain;
