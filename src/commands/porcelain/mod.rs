//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `log`: Show commit history
//! - `branch`: Create or list branches
//! - `checkout`: Switch branches or detach HEAD at a commit
//! - `login`: Authenticate with the remote service
//! - `remote`: Connect the repository to a remote
//! - `push`: Send a branch to the remote

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod login;
pub mod push;
pub mod remote;
