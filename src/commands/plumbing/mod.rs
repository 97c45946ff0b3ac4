//! Plumbing commands (low-level object access)
//!
//! - `cat-file`: Print an object's raw content
//! - `hash-object`: Compute a blob's id and optionally store it
//! - `ls-tree`: List the entries of a commit's tree

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
