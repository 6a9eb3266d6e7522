use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;
use std::iter::FusedIterator;

/// One commit in a history walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
}

impl LogEntry {
    pub fn message(&self) -> &str {
        self.commit.message()
    }
}

/// Lazy, restartable history starting at a commit
///
/// Nothing is read until iteration starts, and each iteration starts again
/// from the first commit. A failure to load or decode a commit is yielded once
/// and ends that iteration.
#[derive(Debug, Clone, new)]
pub struct RevList<'r> {
    database: &'r Database,
    start: ObjectId,
}

impl<'r> RevList<'r> {
    pub fn start(&self) -> &ObjectId {
        &self.start
    }

    pub fn iter(&self) -> RevListIter<'r> {
        RevListIter {
            database: self.database,
            next_oid: Some(self.start.clone()),
        }
    }
}

impl<'r> IntoIterator for &RevList<'r> {
    type Item = Result<LogEntry>;
    type IntoIter = RevListIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct RevListIter<'r> {
    database: &'r Database,
    next_oid: Option<ObjectId>,
}

impl Iterator for RevListIter<'_> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next_oid.take()?;

        let commit = match self.database.load_commit(&oid) {
            Ok(commit) => commit,
            Err(e) => return Some(Err(e)),
        };
        match commit.parent() {
            Ok(parent) => self.next_oid = parent,
            Err(e) => return Some(Err(e.with_object(&oid))),
        }

        Some(Ok(LogEntry { oid, commit }))
    }
}

impl FusedIterator for RevListIter<'_> {}
