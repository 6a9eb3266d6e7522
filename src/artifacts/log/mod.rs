//! Commit history traversal
//!
//! - `rev_list`: walks first parents from a starting commit, newest first
//!
//! Commits have at most one parent, so history is a chain and the walk needs
//! no queue or ordering: it follows `parent` until a root commit.

pub mod rev_list;
