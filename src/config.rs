//! Repository configuration
//!
//! Everything a repository would otherwise read from process-wide constants
//! (directory names, committer identity, lock wait) travels in one value
//! handed to [`crate::areas::repository::Repository`] at construction.

use crate::artifacts::objects::commit::Author;
use std::time::Duration;

pub const DEFAULT_METADATA_DIR: &str = ".vault";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Directory names that are never captured by a snapshot, in addition to the
/// configured metadata directory
const ALWAYS_IGNORED: [&str; 2] = [".git", DEFAULT_METADATA_DIR];

/// Fixed identity recorded as author and committer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Author stamped with the current time
    pub fn author(&self) -> Author {
        Author::new(self.name.clone(), self.email.clone())
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity {
            name: "vault".to_string(),
            email: "vault@localhost".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Name of the metadata directory at the repository root
    pub metadata_dir: String,
    /// Branch HEAD points at after `init`
    pub default_branch: String,
    pub identity: Identity,
    /// Entry names skipped by snapshots
    pub ignored: Vec<String>,
    /// How long a ref update waits for a concurrent writer
    pub lock_timeout: Duration,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            metadata_dir: DEFAULT_METADATA_DIR.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            identity: Identity::default(),
            ignored: ALWAYS_IGNORED.iter().map(|name| name.to_string()).collect(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl RepositoryConfig {
    /// Defaults overlaid with `VAULT_AUTHOR_NAME`, `VAULT_AUTHOR_EMAIL` and
    /// `VAULT_DIR`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("VAULT_AUTHOR_NAME") {
            config.identity.name = name;
        }
        if let Ok(email) = std::env::var("VAULT_AUTHOR_EMAIL") {
            config.identity.email = email;
        }
        if let Ok(metadata_dir) = std::env::var("VAULT_DIR") {
            config = config.with_metadata_dir(metadata_dir);
        }

        config
    }

    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.identity = Identity {
            name: name.into(),
            email: email.into(),
        };
        self
    }

    pub fn with_metadata_dir(mut self, metadata_dir: impl Into<String>) -> Self {
        self.metadata_dir = metadata_dir.into();
        self
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Entry names excluded from snapshots, the metadata directory included
    pub fn ignored_names(&self) -> Vec<String> {
        let mut names = self.ignored.clone();
        if !names.contains(&self.metadata_dir) {
            names.push(self.metadata_dir.clone());
        }
        names
    }
}
