use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::errors::Result;

impl Repository {
    /// History starting at a ref or commit id, HEAD by default
    ///
    /// The start is resolved now; commits are read as the walk proceeds.
    pub fn log(&self, start: Option<&str>) -> Result<RevList<'_>> {
        let start = self.resolve(start.unwrap_or(HEAD_REF_NAME))?;

        Ok(RevList::new(self.database(), start))
    }
}
