use crate::areas::refs::{HEAD_REF_NAME, Head};
use crate::areas::repository::Repository;
use crate::artifacts::checkout::restore::Restore;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::path::Path;

/// What a checkout did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// HEAD already denoted the target; nothing was read or written
    Unchanged(Head),
    /// The target's tree was restored and HEAD moved
    Switched { head: Head, commit: ObjectId },
}

impl Repository {
    /// Switch to a branch, tag or commit
    ///
    /// A raw commit id detaches HEAD; a ref name (short or full) makes HEAD
    /// point at that ref. Nothing happens when HEAD already names the target
    /// ref, or already resolves to the target id. Files of the target tree are written over the working
    /// tree; files it does not mention are left in place. HEAD moves only after
    /// the whole tree has been restored.
    pub fn checkout(&self, target: &str) -> Result<SwitchOutcome> {
        let current = self.head()?;

        let wanted = if ObjectId::is_valid(target) {
            Head::Detached(ObjectId::try_parse(target)?)
        } else {
            let name = self
                .refs()
                .find_ref(target)?
                .ok_or_else(|| Error::ref_unreadable(target, "no such ref"))?;

            if name.is_head() {
                return Ok(SwitchOutcome::Unchanged(current));
            }
            Head::Symbolic(name)
        };

        let already_there = match &wanted {
            // a raw id also matches the commit HEAD currently resolves to
            Head::Detached(oid) => {
                wanted == current || self.resolve(HEAD_REF_NAME).ok().as_ref() == Some(oid)
            }
            Head::Symbolic(_) => wanted == current,
        };
        if already_there {
            tracing::debug!(target, "already on target");
            return Ok(SwitchOutcome::Unchanged(current));
        }

        let commit_oid = match &wanted {
            Head::Detached(oid) => oid.clone(),
            Head::Symbolic(name) => self.refs().resolve_ref(name)?,
        };
        let commit = self
            .database()
            .load_commit(&commit_oid)
            .map_err(|e| match e {
                Error::ObjectNotFound(id) => Error::MissingObject {
                    id,
                    path: self.path().to_path_buf(),
                },
                other => other,
            })?;
        let tree_oid = commit.tree_oid().map_err(|e| e.with_object(&commit_oid))?;

        Restore::new(self.database(), self.workspace()).restore_tree(&tree_oid, Path::new(""))?;
        self.refs().set_head(&wanted)?;

        tracing::info!(target, commit = %commit_oid, "switched");

        Ok(SwitchOutcome::Switched {
            head: wanted,
            commit: commit_oid,
        })
    }
}
