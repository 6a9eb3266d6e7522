//! Plumbing commands (low-level object operations)
//!
//! Direct access to the object store, used for scripting and as building
//! blocks for the porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: compute a blob id and optionally store the blob
//! - `cat-file`: read an object back by id
//! - `write-tree`: capture a directory as a tree

pub mod cat_file;
pub mod hash_object;
pub mod write_tree;
