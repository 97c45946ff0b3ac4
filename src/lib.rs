//! mgit: a minimal version-control engine
//!
//! Content-addressed object storage, a staging index, branch/HEAD references,
//! checkout and push to a remote service.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
