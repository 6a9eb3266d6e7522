use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::config::RepositoryConfig;
use crate::errors::{Error, IoContext, Result};
use std::fs;
use std::path::Path;

impl Repository {
    /// Create an empty repository rooted at `path`
    ///
    /// Lays out `objects/`, `refs/heads/` and `refs/tags/` under the metadata
    /// directory and points HEAD at the default branch. The branch itself is
    /// not created until the first commit.
    pub fn init(path: impl AsRef<Path>, config: RepositoryConfig) -> Result<Self> {
        let path = path.as_ref();
        let metadata_path = path.join(&config.metadata_dir);

        if metadata_path.exists() {
            return Err(Error::AlreadyInitialized(metadata_path));
        }
        let default_branch = BranchName::try_parse(config.default_branch.as_str())?;

        fs::create_dir_all(path).at_path(path)?;
        let path = path.canonicalize().at_path(path)?;
        let repository = Self::assemble(path, config);

        let objects_path = repository.database().objects_path();
        fs::create_dir_all(objects_path).at_path(objects_path)?;

        let heads_path = repository.refs().heads_path();
        fs::create_dir_all(&heads_path).at_path(heads_path)?;

        let tags_path = repository.refs().tags_path();
        fs::create_dir_all(&tags_path).at_path(tags_path)?;

        repository
            .refs()
            .set_head(&Head::Symbolic(default_branch.to_ref_name()))?;

        tracing::info!(path = ?repository.path(), branch = %default_branch, "initialized repository");

        Ok(repository)
    }
}
