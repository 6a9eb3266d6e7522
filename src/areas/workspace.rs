use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{Error, IoContext, Result};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Working directory file system access
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
    /// Entry names never captured in a snapshot, at any depth
    ignored: Vec<String>,
}

impl Workspace {
    pub fn new(path: Box<Path>, ignored: Vec<String>) -> Self {
        Workspace { path, ignored }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `name` is reserved for metadata, compared ASCII case-insensitively
    /// so case-folding file systems cannot alias it
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(name))
    }

    /// Capture `dir` as a tree
    ///
    /// File contents and nested trees are stored as they are found, so every
    /// entry of the returned tree already exists in `database`. The returned
    /// tree itself is not stored. Entries are ordered by file name, which keeps
    /// the tree id independent of how the platform enumerates directories.
    pub fn build_tree(&self, dir: &Path, database: &Database) -> Result<Tree> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;
            let name = entry.file_name().to_str().ok_or_else(|| Error::Io {
                path: entry.path().to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "file name is not valid UTF-8",
                ),
            })?;

            if self.is_ignored(name) {
                tracing::trace!(path = ?entry.path(), "skipping ignored entry");
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_file() {
                let blob = Blob::new(self.read_file(entry.path())?);
                let oid = database.store(&blob)?;
                tracing::trace!(path = ?entry.path(), %oid, "captured file");
                entries.push(TreeEntry::file(name, oid)?);
            } else if file_type.is_dir() {
                let subtree = self.build_tree(entry.path(), database)?;
                let oid = database.store(&subtree)?;
                tracing::trace!(path = ?entry.path(), %oid, "captured directory");
                entries.push(TreeEntry::directory(name, oid)?);
            } else {
                tracing::warn!(path = ?entry.path(), "skipping entry that is neither file nor directory");
            }
        }

        Ok(Tree::new(entries))
    }

    /// Resolve a path against the workspace root
    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.path.join(path)
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let file_path = self.absolute(file_path);

        std::fs::read(&file_path).map(Bytes::from).at_path(file_path)
    }

    /// Write a file, replacing any existing file at that path
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> Result<()> {
        self.refuse_symlinks(file_path)?;
        let file_path = self.absolute(file_path);

        std::fs::write(&file_path, data).at_path(file_path)
    }

    /// Make sure a directory exists; a non-directory in the way is an error
    pub fn make_directory(&self, dir_path: &Path) -> Result<()> {
        self.refuse_symlinks(dir_path)?;
        let dir_path = self.absolute(dir_path);

        std::fs::create_dir_all(&dir_path).at_path(dir_path)
    }

    /// Fail if any existing component of `path` below the root is a symlink
    ///
    /// Snapshots never capture symlinks, so checkout never replaces them;
    /// following one would put restored content outside the working tree.
    fn refuse_symlinks(&self, path: &Path) -> Result<()> {
        let relative = path.strip_prefix(&self.path).unwrap_or(path);
        let mut current = self.path.to_path_buf();

        for component in relative.components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            current.push(segment);

            match std::fs::symlink_metadata(&current) {
                Ok(metadata) if metadata.file_type().is_symlink() => {
                    return Err(Error::Io {
                        path: current,
                        source: std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "refusing to write through a symlink",
                        ),
                    });
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => break,
                Err(e) => return Err(Error::Io { path: current, source: e }),
            }
        }

        Ok(())
    }
}
