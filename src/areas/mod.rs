//! Core repository components
//!
//! - `database`: Object store for blobs, trees, and commits
//! - `index`: Staging area tracking what the next commit will contain
//! - `refs`: HEAD and branches
//! - `remote`: Remote configuration and remote-tracking record
//! - `repository`: High-level repository coordination
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod remote;
pub mod repository;
pub mod workspace;
