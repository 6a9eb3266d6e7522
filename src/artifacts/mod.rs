//! Data structures and algorithms
//!
//! - `branch`: ref and branch names
//! - `checkout`: restoring stored trees into the working directory
//! - `core`: shared file system helpers
//! - `log`: commit history traversal
//! - `objects`: object types (blob, tree, commit) and their codecs

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod objects;
