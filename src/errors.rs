//! Error taxonomy for repository operations
//!
//! Every failure is terminal to the operation that raised it. Variants carry
//! enough context (object id, ref name, path) for a front end to decide how
//! to present it.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a repository (missing metadata directory {0:?})")]
    RepositoryNotFound(PathBuf),

    #[error("repository already initialized at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("invalid object id: {0:?}")]
    InvalidId(String),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error(
        "corrupt object{}: {reason}",
        .id.as_ref().map(|id| format!(" {id}")).unwrap_or_default()
    )]
    CorruptObject {
        id: Option<ObjectId>,
        reason: String,
    },

    #[error("corrupt tree: {0}")]
    TreeCorrupt(String),

    #[error("cannot read ref {name}: {reason}")]
    RefUnreadable { name: String, reason: String },

    #[error("ref cycle detected: {}", .chain.join(" -> "))]
    RefCycle { chain: Vec<String> },

    #[error("missing object {id} needed for {path:?}")]
    MissingObject { id: ObjectId, path: PathBuf },

    #[error("ref {name} is locked by another update (waited {waited:?})")]
    RefLocked {
        name: String,
        waited: std::time::Duration,
    },

    #[error("ref {0} already exists")]
    RefExists(String),

    #[error("invalid ref name: {0:?}")]
    InvalidRefName(String),

    #[error("i/o failure at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Error::CorruptObject {
            id: None,
            reason: reason.into(),
        }
    }

    pub fn corrupt_object(id: &ObjectId, reason: impl Into<String>) -> Self {
        Error::CorruptObject {
            id: Some(id.clone()),
            reason: reason.into(),
        }
    }

    pub fn ref_unreadable(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::RefUnreadable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Attach an object id to a `CorruptObject` raised by a codec that only saw bytes.
    pub fn with_object(self, object_id: &ObjectId) -> Self {
        match self {
            Error::CorruptObject { id: None, reason } => Error::CorruptObject {
                id: Some(object_id.clone()),
                reason,
            },
            other => other,
        }
    }
}

/// Extension for tagging `std::io` failures with the path they happened at.
pub(crate) trait IoContext<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
