//! Core repository components
//!
//! - `database`: content-addressed store for blobs, trees and commits
//! - `refs`: reference management (branches, tags, HEAD) and locked updates
//! - `repository`: ties the areas of one working tree together
//! - `workspace`: working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
