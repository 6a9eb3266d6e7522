//! Object types
//!
//! All content is stored as objects identified by the SHA-1 of their framed
//! bytes. There are three kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (modes, names and object IDs)
//! - **Commit**: snapshot with metadata (tree, parent, authorship, message)
//!
//! Every object is framed as `<kind> <size>\0<payload>` before hashing and
//! compression.

pub mod blob;
pub mod commit;
pub mod entry_mode;
pub mod object;
pub mod object_id;
pub mod object_kind;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format, as embedded in tree entries
pub const RAW_ID_LENGTH: usize = 20;
