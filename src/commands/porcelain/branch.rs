use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::{BranchName, RefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};

impl Repository {
    /// Create a branch at `start` (a ref or commit id), HEAD by default
    pub fn create_branch(&self, branch_name: &str, start: Option<&str>) -> Result<ObjectId> {
        let branch_name = BranchName::try_parse(branch_name)?;
        let start_oid = self.resolve(start.unwrap_or(HEAD_REF_NAME))?;

        let kind = self.database().kind(&start_oid)?;
        if kind != ObjectKind::Commit {
            return Err(Error::corrupt_object(
                &start_oid,
                format!("cannot branch from a {kind}"),
            ));
        }

        self.refs().create_branch(&branch_name, &start_oid)?;

        Ok(start_oid)
    }

    pub fn branches(&self) -> Result<Vec<RefName>> {
        self.refs().list_branches()
    }
}
