//! Content-addressed version control storage
//!
//! Objects (file contents, directory snapshots, commits) are stored once under
//! the SHA-1 of their framed bytes, zlib compressed. Refs name commits,
//! possibly through chains of symbolic refs, and a [`Repository`] ties the
//! store, the refs and a working directory together.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;

pub use areas::repository::Repository;
pub use commands::porcelain::checkout::SwitchOutcome;
pub use config::RepositoryConfig;
pub use errors::{Error, Result};
