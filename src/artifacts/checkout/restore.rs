//! Writing stored trees and blobs back to disk
//!
//! Trees are walked with an explicit stack rather than recursion, so nesting
//! depth is bounded only by the file system. The whole tree is listed and
//! checked before the first write, then entries are restored in tree order
//! (depth first, parents before children).

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};
use derive_new::new;
use std::path::{Path, PathBuf};

/// Pending unit of work while restoring a tree
#[derive(Debug)]
enum Pending {
    Blob(ObjectId, PathBuf),
    Tree(ObjectId, PathBuf),
}

#[derive(Debug, new)]
pub struct Restore<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
}

impl Restore<'_> {
    /// Write a blob's content to `path`, replacing an existing file
    pub fn restore_blob(&self, oid: &ObjectId, path: &Path) -> Result<()> {
        let (kind, content) = self
            .database
            .get(oid)
            .map_err(|e| Self::missing(e, path))?;

        if kind != ObjectKind::Blob {
            return Err(Error::corrupt_object(
                oid,
                format!("expected a blob at {}, found a {kind}", path.display()),
            ));
        }

        self.workspace.write_file(path, &content)?;
        tracing::trace!(%oid, path = ?path, "restored file");

        Ok(())
    }

    /// Recreate the tree `oid` under `dir`
    ///
    /// Fails with `TreeCorrupt` before touching the working tree if any entry
    /// at any depth is named like a metadata directory.
    pub fn restore_tree(&self, oid: &ObjectId, dir: &Path) -> Result<()> {
        for pending in self.plan(oid, dir)? {
            match pending {
                Pending::Blob(oid, path) => self.restore_blob(&oid, &path)?,
                Pending::Tree(_, dir) => self.workspace.make_directory(&dir)?,
            }
        }

        Ok(())
    }

    /// List every directory and file of the tree in restore order
    fn plan(&self, oid: &ObjectId, dir: &Path) -> Result<Vec<Pending>> {
        let mut planned = Vec::new();
        let mut stack = vec![Pending::Tree(oid.clone(), dir.to_path_buf())];

        while let Some(pending) = stack.pop() {
            let (oid, dir) = match pending {
                Pending::Tree(oid, dir) => (oid, dir),
                blob => {
                    planned.push(blob);
                    continue;
                }
            };

            let tree = self
                .database
                .load_tree(&oid)
                .map_err(|e| Self::missing(e, &dir))?;
            tracing::trace!(%oid, path = ?dir, entries = tree.entries().len(), "listing directory");

            let mut children = Vec::with_capacity(tree.entries().len());
            for entry in tree.into_entries() {
                if self.workspace.is_ignored(&entry.name) {
                    return Err(Error::TreeCorrupt(format!(
                        "entry {:?} under {} uses a reserved name",
                        entry.name,
                        dir.display()
                    )));
                }

                let path = dir.join(&entry.name);
                children.push(match entry.kind {
                    ObjectKind::Blob => Pending::Blob(entry.oid, path),
                    ObjectKind::Tree => Pending::Tree(entry.oid, path),
                    ObjectKind::Commit => {
                        return Err(Error::TreeCorrupt(format!(
                            "entry {} refers to a commit",
                            entry.name
                        )));
                    }
                });
            }

            planned.push(Pending::Tree(oid, dir));
            // reversed so the first entry is popped first
            stack.extend(children.into_iter().rev());
        }

        Ok(planned)
    }

    /// An object the walk needs but the store does not have
    fn missing(error: Error, path: &Path) -> Error {
        match error {
            Error::ObjectNotFound(id) => Error::MissingObject {
                id,
                path: path.to_path_buf(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::tree::{Tree, TreeEntry};
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn work_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn setup(dir: &TempDir) -> (Database, Workspace) {
        let database = Database::new(dir.path().join(".vault/objects").into_boxed_path());
        let workspace = Workspace::new(
            dir.path().to_path_buf().into_boxed_path(),
            vec![".vault".to_string(), ".git".to_string()],
        );
        (database, workspace)
    }

    fn blob(database: &Database, content: &'static str) -> ObjectId {
        database
            .store(&Blob::new(Bytes::from_static(content.as_bytes())))
            .unwrap()
    }

    #[rstest]
    fn nested_tree_is_written_out(work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        let inner = database
            .store(&Tree::new(vec![
                TreeEntry::file("deep.txt", blob(&database, "deep")).unwrap(),
            ]))
            .unwrap();
        let root = database
            .store(&Tree::new(vec![
                TreeEntry::file("top.txt", blob(&database, "top")).unwrap(),
                TreeEntry::directory("nested", inner).unwrap(),
            ]))
            .unwrap();

        Restore::new(&database, &workspace)
            .restore_tree(&root, Path::new(""))
            .unwrap();

        work_dir.child("top.txt").assert("top");
        work_dir.child("nested/deep.txt").assert("deep");
    }

    #[rstest]
    fn existing_files_are_overwritten(work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        work_dir.child("a.txt").write_str("stale").unwrap();
        let oid = blob(&database, "fresh");

        Restore::new(&database, &workspace)
            .restore_blob(&oid, Path::new("a.txt"))
            .unwrap();

        work_dir.child("a.txt").assert("fresh");
    }

    #[rstest]
    fn absent_blob_is_reported_with_its_path(work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        let ghost = ObjectId::hash(b"blob 5\0ghost");

        let err = Restore::new(&database, &workspace)
            .restore_blob(&ghost, Path::new("ghost.txt"))
            .unwrap_err();

        match err {
            Error::MissingObject { id, path } => {
                assert_eq!(id, ghost);
                assert_eq!(path, PathBuf::from("ghost.txt"));
            }
            other => panic!("expected a missing object, got {other:?}"),
        }
    }

    #[rstest]
    fn absent_tree_is_missing(work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        let ghost = ObjectId::hash(b"tree 0\0");

        assert!(matches!(
            Restore::new(&database, &workspace).restore_tree(&ghost, Path::new("")),
            Err(Error::MissingObject { .. })
        ));
    }

    #[rstest]
    #[case(".vault")]
    #[case(".VAULT")]
    #[case(".git")]
    fn reserved_names_fail_before_any_write(#[case] reserved: &str, work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        let inner = database
            .store(&Tree::new(vec![
                TreeEntry::file("HEAD", blob(&database, "hijacked")).unwrap(),
            ]))
            .unwrap();
        let nested = database
            .store(&Tree::new(vec![
                TreeEntry::directory(reserved, inner).unwrap(),
            ]))
            .unwrap();
        let root = database
            .store(&Tree::new(vec![
                TreeEntry::file("a.txt", blob(&database, "first")).unwrap(),
                TreeEntry::directory("sub", nested).unwrap(),
            ]))
            .unwrap();

        let result = Restore::new(&database, &workspace).restore_tree(&root, Path::new(""));

        assert!(matches!(result, Err(Error::TreeCorrupt(_))));
        work_dir.child("a.txt").assert(predicates::path::missing());
        work_dir.child("sub").assert(predicates::path::missing());
    }

    #[rstest]
    fn restoring_a_tree_as_a_blob_is_corrupt(work_dir: TempDir) {
        let (database, workspace) = setup(&work_dir);
        let tree = database.store(&Tree::new(Vec::new())).unwrap();

        assert!(matches!(
            Restore::new(&database, &workspace).restore_blob(&tree, Path::new("x")),
            Err(Error::CorruptObject { .. })
        ));
    }
}
