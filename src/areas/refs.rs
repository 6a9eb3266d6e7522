//! References (branches, HEAD, tags)
//!
//! References are human-readable names pointing to commits. A ref file holds
//! either:
//! - a 40-character object id (direct reference), or
//! - `ref: <path>` naming another ref (symbolic reference)
//!
//! HEAD is the ref denoting the current position: symbolic while on a branch,
//! detached when it holds a commit id directly.
//!
//! ## Updates
//!
//! Refs are the only mutable state in a repository. Every write takes the
//! ref's lock file (`<ref>.lock`, created exclusively), writes the new content
//! into it and renames it over the ref, so readers never see a torn file and
//! concurrent writers queue up instead of overwriting each other.

use crate::artifacts::branch::branch_name::{BranchName, RefName};
use crate::artifacts::branch::{HEADS_PREFIX, TAGS_PREFIX};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, IoContext, Result};
use derive_new::new;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Marker opening a symbolic reference
pub const SYMREF_PREFIX: &str = "ref: ";

const SYMREF_REGEX: &str = r"^ref:\s*(\S+)$";

static SYMREF: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(SYMREF_REGEX).expect("symref pattern compiles"));

/// Pause between attempts to take a held ref lock
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// Where HEAD currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// On a branch: HEAD holds `ref: <name>`
    Symbolic(RefName),
    /// HEAD holds a commit id directly
    Detached(ObjectId),
}

impl Head {
    fn to_ref_content(&self) -> String {
        match self {
            Head::Symbolic(name) => format!("{SYMREF_PREFIX}{name}"),
            Head::Detached(oid) => oid.to_string(),
        }
    }
}

/// Parsed content of a single ref file
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef(RefName),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn parse(content: &str) -> Result<Self> {
        if let Some(symref_match) = SYMREF.captures(content) {
            Ok(SymRefOrOid::SymRef(RefName::try_parse(&symref_match[1])?))
        } else {
            Ok(SymRefOrOid::Oid(ObjectId::try_parse(content)?))
        }
    }
}

/// Exclusive hold on a ref's lock file
///
/// Dropping the lock without committing removes the lock file and leaves the
/// ref untouched.
struct RefLock {
    lock_path: PathBuf,
    ref_path: PathBuf,
    file: Option<File>,
    renamed: bool,
}

impl RefLock {
    fn commit(mut self, content: &str) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.write_all(content.as_bytes())
                .and_then(|_| file.sync_all())
                .at_path(&self.lock_path)?;
        }

        std::fs::rename(&self.lock_path, &self.ref_path).at_path(&self.ref_path)?;
        self.renamed = true;

        Ok(())
    }
}

impl Drop for RefLock {
    fn drop(&mut self) {
        if !self.renamed {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

/// References manager
///
/// Handles reading, resolving and updating refs under the metadata directory.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory
    path: Box<Path>,
    /// How long an update waits for a ref held by another writer
    lock_timeout: Duration,
}

impl Refs {
    /// Read the first line of a ref file, trimmed
    pub fn read_ref(&self, name: &RefName) -> Result<String> {
        let path = self.ref_path(name);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::ref_unreadable(name.as_ref(), e))?;
        let content = content.lines().next().unwrap_or_default().trim();

        if content.is_empty() {
            return Err(Error::ref_unreadable(name.as_ref(), "ref file is empty"));
        }

        Ok(content.to_string())
    }

    /// Resolve a ref name or a raw object id to an object id
    ///
    /// Raw ids are returned unchanged. Names are looked up as given, then under
    /// `refs/`, `refs/heads/` and `refs/tags/`; symbolic refs are followed until
    /// a terminal id is reached. A name seen twice on the way fails with
    /// [`Error::RefCycle`].
    pub fn resolve(&self, name_or_id: &str) -> Result<ObjectId> {
        if ObjectId::is_valid(name_or_id) {
            return ObjectId::try_parse(name_or_id);
        }

        let name = self
            .find_ref(name_or_id)?
            .ok_or_else(|| Error::ref_unreadable(name_or_id, "no such ref"))?;
        self.resolve_ref(&name)
    }

    /// Follow a ref (given by its exact path) to a terminal object id
    pub fn resolve_ref(&self, name: &RefName) -> Result<ObjectId> {
        let mut visited: Vec<RefName> = Vec::new();
        let mut current = name.clone();

        loop {
            if visited.contains(&current) {
                visited.push(current);
                return Err(Self::cycle(visited));
            }

            let content = self.read_ref(&current)?;
            visited.push(current);

            match SymRefOrOid::parse(&content)? {
                SymRefOrOid::SymRef(next) => current = next,
                SymRefOrOid::Oid(oid) => return Ok(oid),
            }
        }
    }

    /// Map a short or full ref name to the ref file that exists for it
    pub fn find_ref(&self, name: &str) -> Result<Option<RefName>> {
        let candidates = [
            RefName::try_parse(name)?,
            RefName::try_parse(format!("refs/{name}"))?,
            RefName::try_parse(format!("{HEADS_PREFIX}{name}"))?,
            RefName::try_parse(format!("{TAGS_PREFIX}{name}"))?,
        ];

        Ok(candidates
            .into_iter()
            .find(|candidate| self.ref_path(candidate).is_file()))
    }

    /// Read the state of HEAD without following it
    pub fn head(&self) -> Result<Head> {
        let content = self.read_ref(&RefName::head())?;

        match SymRefOrOid::parse(&content)? {
            SymRefOrOid::SymRef(name) => Ok(Head::Symbolic(name)),
            SymRefOrOid::Oid(oid) => Ok(Head::Detached(oid)),
        }
    }

    /// The ref a commit would advance: the last name in HEAD's symbolic chain
    ///
    /// Returns `None` when HEAD is detached. The returned ref may not exist yet
    /// (a branch with no commits).
    pub fn current_ref(&self) -> Result<Option<RefName>> {
        let mut visited: Vec<RefName> = Vec::new();
        let mut current = RefName::head();

        loop {
            if visited.contains(&current) {
                visited.push(current);
                return Err(Self::cycle(visited));
            }

            let path = self.ref_path(&current);
            if !path.exists() && !current.is_head() {
                return Ok(Some(current));
            }

            let content = self.read_ref(&current)?;
            match SymRefOrOid::parse(&content)? {
                SymRefOrOid::SymRef(next) => {
                    visited.push(current);
                    current = next;
                }
                SymRefOrOid::Oid(_) if current.is_head() => return Ok(None),
                SymRefOrOid::Oid(_) => return Ok(Some(current)),
            }
        }
    }

    /// Point HEAD at a branch or detach it at a commit
    pub fn set_head(&self, head: &Head) -> Result<()> {
        let name = RefName::head();
        self.lock(&name)?.commit(&head.to_ref_content())?;
        tracing::debug!(head = %head.to_ref_content(), "moved HEAD");

        Ok(())
    }

    /// Overwrite a ref with a terminal object id
    pub fn write_ref(&self, name: &RefName, oid: &ObjectId) -> Result<()> {
        self.lock(name)?.commit(oid.as_ref())?;
        tracing::debug!(%name, %oid, "updated ref");

        Ok(())
    }

    /// Compare-and-swap style update
    ///
    /// Takes the ref's lock, reads its current id (`None` if the ref does not
    /// resolve yet), lets `update` compute the new id and writes it before the
    /// lock is released. Two updates of the same ref therefore never observe
    /// the same old value.
    pub fn update_ref<F>(&self, name: &RefName, update: F) -> Result<ObjectId>
    where
        F: FnOnce(Option<ObjectId>) -> Result<ObjectId>,
    {
        let lock = self.lock(name)?;

        let current = match self.resolve_ref(name) {
            Ok(oid) => Some(oid),
            Err(Error::RefUnreadable { .. }) => None,
            Err(e) => return Err(e),
        };
        let new_oid = update(current.clone())?;

        lock.commit(new_oid.as_ref())?;
        tracing::debug!(%name, old = ?current, new = %new_oid, "advanced ref");

        Ok(new_oid)
    }

    pub fn create_branch(&self, branch: &BranchName, oid: &ObjectId) -> Result<()> {
        let name = branch.to_ref_name();
        let lock = self.lock(&name)?;

        if self.ref_path(&name).exists() {
            return Err(Error::RefExists(name.to_string()));
        }

        lock.commit(oid.as_ref())?;
        tracing::debug!(%name, %oid, "created branch");

        Ok(())
    }

    pub fn list_branches(&self) -> Result<Vec<RefName>> {
        let branches = WalkDir::new(self.heads_path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                let relative_path = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_str())
                    .collect::<Option<Vec<_>>>()?
                    .join("/");

                // lock and temp files fail ref name validation
                RefName::try_parse(relative_path).ok()
            })
            .collect::<Vec<_>>();

        Ok(branches)
    }

    fn lock(&self, name: &RefName) -> Result<RefLock> {
        let ref_path = self.ref_path(name);
        let lock_path = self.path.join(name.lock_path());
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        let started = Instant::now();
        loop {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(file) => {
                    return Ok(RefLock {
                        lock_path,
                        ref_path,
                        file: Some(file),
                        renamed: false,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if started.elapsed() >= self.lock_timeout {
                        return Err(Error::RefLocked {
                            name: name.to_string(),
                            waited: started.elapsed(),
                        });
                    }
                    std::thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(e) => return Err(e).at_path(&lock_path),
            }
        }
    }

    fn cycle(chain: Vec<RefName>) -> Error {
        Error::RefCycle {
            chain: chain.into_iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn ref_path(&self, name: &RefName) -> PathBuf {
        self.path.join(name.as_ref_path())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn tags_path(&self) -> PathBuf {
        self.refs_path().join("tags")
    }
}
