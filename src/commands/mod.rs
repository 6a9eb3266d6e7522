//! Repository operations
//!
//! Every operation is an `impl Repository` block, split in two groups:
//!
//! - `plumbing`: direct object store access (hash-object, cat-file, write-tree)
//! - `porcelain`: workflows built on top of it (init, commit, log, checkout, branch)

pub mod plumbing;
pub mod porcelain;
