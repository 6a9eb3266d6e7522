use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Store a directory (relative to the working tree root) as a tree
    ///
    /// Every file and subdirectory is stored before the tree naming it. The
    /// metadata directory and the configured ignored names are skipped at
    /// every depth.
    pub fn snapshot(&self, dir: impl AsRef<Path>) -> Result<ObjectId> {
        let dir = self.workspace().absolute(dir.as_ref());
        let tree = self.workspace().build_tree(&dir, self.database())?;
        let tree_oid = self.database().store(&tree)?;
        tracing::debug!(path = ?dir, %tree_oid, entries = tree.entries().len(), "stored snapshot");

        Ok(tree_oid)
    }
}
