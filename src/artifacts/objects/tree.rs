//! Tree object
//!
//! Trees are directory snapshots: an ordered list of entries pointing at blobs
//! (files) and other trees (subdirectories).
//!
//! ## Format
//!
//! Entries are written back to back with no outer framing:
//! `<mode> <name>\0<20-byte-sha1>`
//!
//! Entry boundaries come only from scanning for the next NUL and then
//! consuming exactly 20 bytes of binary id. Entries carry no kind tag, so
//! decoding asks the object store for the kind of every referenced id.

use crate::artifacts::objects::RAW_ID_LENGTH;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{KindLookup, Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};
use bytes::Bytes;

/// One named child of a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub kind: ObjectKind,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>, oid: ObjectId) -> Result<Self> {
        Self::with_mode(EntryMode::Regular, name, oid)
    }

    pub fn directory(name: impl Into<String>, oid: ObjectId) -> Result<Self> {
        Self::with_mode(EntryMode::Directory, name, oid)
    }

    fn with_mode(mode: EntryMode, name: impl Into<String>, oid: ObjectId) -> Result<Self> {
        let name = name.into();
        check_entry_name(&name)?;

        Ok(TreeEntry {
            mode,
            kind: mode.object_kind(),
            oid,
            name,
        })
    }
}

#[cfg(windows)]
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', '\0'];
#[cfg(not(windows))]
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\0'];

/// A name must be a single path segment that cannot climb out of its directory
fn check_entry_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(Error::TreeCorrupt(format!("invalid entry name {name:?}")));
    }

    Ok(())
}

/// Directory snapshot
///
/// Entry order is significant: it is part of the encoded bytes and therefore
/// of the tree's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the entries back to back
    pub fn encode(entries: &[TreeEntry]) -> Vec<u8> {
        let mut buffer = Vec::new();

        for entry in entries {
            buffer.extend_from_slice(entry.mode.as_str().as_bytes());
            buffer.push(b' ');
            buffer.extend_from_slice(entry.name.as_bytes());
            buffer.push(0);
            buffer.extend_from_slice(&entry.oid.to_raw());
        }

        buffer
    }

    /// Decode a tree payload, resolving each entry's kind through `lookup`
    pub fn decode(buffer: &[u8], lookup: &impl KindLookup) -> Result<Self> {
        let entries = Self::scan(buffer)?
            .into_iter()
            .map(|(mode, oid, name)| {
                let kind = lookup.kind_of(&oid)?;
                if kind != mode.object_kind() {
                    return Err(Error::TreeCorrupt(format!(
                        "entry {name:?} has mode {mode} but points at a {kind}"
                    )));
                }

                Ok(TreeEntry {
                    mode,
                    kind,
                    oid,
                    name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Tree { entries })
    }

    /// Split a payload into `(mode, id, name)` triples without touching the store
    fn scan(buffer: &[u8]) -> Result<Vec<(EntryMode, ObjectId, String)>> {
        let mut entries = Vec::new();
        let mut offset = 0;

        while offset < buffer.len() {
            let Some(nul) = buffer[offset..].iter().position(|&byte| byte == 0) else {
                tracing::warn!(
                    trailing = buffer.len() - offset,
                    "ignoring tree bytes after the last entry"
                );
                break;
            };
            let info = &buffer[offset..offset + nul];
            let id_start = offset + nul + 1;
            let id_end = id_start + RAW_ID_LENGTH;

            if id_end > buffer.len() {
                return Err(Error::TreeCorrupt(format!(
                    "entry at offset {offset} is followed by {} id bytes, expected {RAW_ID_LENGTH}",
                    buffer.len() - id_start
                )));
            }

            let space = info.iter().position(|&byte| byte == b' ').ok_or_else(|| {
                Error::TreeCorrupt(format!("entry at offset {offset} has no mode separator"))
            })?;
            let mode = std::str::from_utf8(&info[..space])
                .map_err(|_| Error::TreeCorrupt(format!("bad mode at offset {offset}")))?;
            let mode = EntryMode::try_from(mode)?;
            let name = String::from_utf8(info[space + 1..].to_vec())
                .map_err(|_| Error::TreeCorrupt(format!("bad name at offset {offset}")))?;
            check_entry_name(&name)?;

            let oid = ObjectId::from_raw(&buffer[id_start..id_end])?;
            entries.push((mode, oid, name));

            offset = id_end;
        }

        Ok(entries)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Self::encode(&self.entries).into())
    }
}

impl Object for Tree {
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{} {} {}\t{}", entry.mode, entry.kind, entry.oid, entry.name))
            .collect::<Vec<String>>()
            .join("\n")
    }
}
