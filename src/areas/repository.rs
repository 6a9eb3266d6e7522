use crate::areas::database::Database;
use crate::areas::refs::{Head, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::RepositoryConfig;
use crate::errors::{Error, IoContext, Result};
use std::path::{Path, PathBuf};

/// A working tree together with its metadata directory
///
/// Holds no mutable state of its own: every operation reads refs and objects
/// from disk, so several `Repository` values (one per thread, say) may share
/// the same directory.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    config: RepositoryConfig,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open an existing repository rooted at `path`
    pub fn open(path: impl AsRef<Path>, config: RepositoryConfig) -> Result<Self> {
        let path = path.as_ref();
        let metadata_path = path.join(&config.metadata_dir);

        if !metadata_path.is_dir() {
            return Err(Error::RepositoryNotFound(metadata_path));
        }

        let path = path.canonicalize().at_path(path)?;
        tracing::debug!(path = ?path, "opened repository");

        Ok(Self::assemble(path, config))
    }

    pub(crate) fn assemble(path: PathBuf, config: RepositoryConfig) -> Self {
        let metadata_path = path.join(&config.metadata_dir);

        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path(), config.ignored_names());
        let refs = Refs::new(metadata_path.into_boxed_path(), config.lock_timeout);

        Repository {
            path: path.into_boxed_path(),
            config,
            database,
            workspace,
            refs,
        }
    }

    /// Root of the working tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(&self.config.metadata_dir)
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Resolve a ref name (short or full) or a raw object id
    pub fn resolve(&self, name_or_id: &str) -> Result<ObjectId> {
        self.refs.resolve(name_or_id)
    }

    pub fn head(&self) -> Result<Head> {
        self.refs.head()
    }
}
