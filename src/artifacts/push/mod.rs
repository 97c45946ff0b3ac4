//! Pushing commits to the remote service
//!
//! - `walker`: objects reachable from a commit and unknown to the remote
//! - `bundle`: tar+gzip packaging of those objects
//! - `transport`: the remote service client

pub mod bundle;
pub mod transport;
pub mod walker;
