//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the object store, refs and workspace into
//! version control workflows.
//!
//! ## Commands
//!
//! - `init`: create a repository
//! - `commit`: snapshot the working tree and advance the current branch
//! - `log`: walk history from a ref or commit
//! - `checkout`: restore a commit's tree and move HEAD
//! - `branch`: create or list branches

pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
