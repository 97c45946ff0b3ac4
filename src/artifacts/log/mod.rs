//! Commit history traversal
//!
//! History is linear, so walking it is a matter of following the single parent
//! link of each commit until a root is reached.

pub mod rev_list;
