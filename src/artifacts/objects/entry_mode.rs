use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};

/// Filesystem mode token of a tree entry
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum EntryMode {
    #[default]
    Regular,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "040000",
        }
    }

    /// The object kind an entry with this mode must point at
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            EntryMode::Regular => ObjectKind::Blob,
            EntryMode::Directory => ObjectKind::Tree,
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "100644" => Ok(EntryMode::Regular),
            "040000" => Ok(EntryMode::Directory),
            _ => Err(Error::TreeCorrupt(format!("unknown entry mode {value:?}"))),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
