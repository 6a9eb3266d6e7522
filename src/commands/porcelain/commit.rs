use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};

impl Repository {
    /// Snapshot the working tree and record it on the current branch
    ///
    /// The parent is whatever the branch points at when its lock is taken, so
    /// concurrent commits on one branch line up one after another. Committing
    /// on a detached HEAD is refused before anything is stored.
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        let branch = self.refs().current_ref()?.ok_or_else(|| {
            Error::ref_unreadable(HEAD_REF_NAME, "HEAD is detached, there is no branch to advance")
        })?;

        let tree_oid = self.snapshot("")?;
        let author = self.config().identity.author();

        let commit_oid = self.refs().update_ref(&branch, |parent| {
            if let Some(parent) = &parent {
                let kind = self.database().kind(parent)?;
                if kind != ObjectKind::Commit {
                    return Err(Error::corrupt_object(
                        parent,
                        format!("{branch} points at a {kind}, not a commit"),
                    ));
                }
            }

            let commit = Commit::new(
                tree_oid.clone(),
                parent,
                author.clone(),
                author,
                message.to_string(),
            );
            self.database().store(&commit)
        })?;

        tracing::info!(%branch, %commit_oid, %tree_oid, "committed");

        Ok(commit_oid)
    }
}
