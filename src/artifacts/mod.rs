//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Planning and applying a switch between commits
//! - `core`: Shared file utilities (atomic writes, locked reads)
//! - `index`: Index entry types
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit)
//! - `push`: Reachability walk, object bundling and the remote transport

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod objects;
pub mod push;
