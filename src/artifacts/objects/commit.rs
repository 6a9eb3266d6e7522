//! Commit object
//!
//! Commits tie a tree snapshot to its history and authorship.
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! The header is an ordered list of unique keys; `parent` is absent on a root
//! commit. Everything after the first blank line is the message, verbatim.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::{Error, Result};
use bytes::Bytes;

pub const TREE_KEY: &str = "tree";
pub const PARENT_KEY: &str = "parent";
pub const AUTHOR_KEY: &str = "author";
pub const COMMITTER_KEY: &str = "committer";

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    /// "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let invalid = || Error::corrupt(format!("invalid author line {value:?}"));

        // "name <email> timestamp timezone", split from the right
        let mut parts = value.rsplitn(3, ' ');
        let timezone = parts.next().ok_or_else(invalid)?;
        let timestamp = parts.next().ok_or_else(invalid)?;
        let name_email = parts.next().ok_or_else(invalid)?;

        let email_start = name_email.find('<').ok_or_else(invalid)?;
        let email_end = name_email.rfind('>').ok_or_else(invalid)?;
        if email_end < email_start {
            return Err(invalid());
        }

        let timestamp =
            chrono::DateTime::parse_from_str(&format!("{timestamp} {timezone}"), "%s %z")
                .map_err(|_| invalid())?;

        Ok(Author {
            name: name_email[..email_start].trim().to_string(),
            email: name_email[email_start + 1..email_end].to_string(),
            timestamp,
        })
    }
}

/// Ordered commit header with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitHeader {
    fields: Vec<(String, String)>,
}

impl CommitHeader {
    /// Append a field; a repeated key is rejected rather than overwritten
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.get(&key).is_some() {
            return Err(Error::corrupt(format!("duplicate commit header {key:?}")));
        }

        self.fields.push((key, value.into()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    header: CommitHeader,
    message: String,
}

impl Commit {
    /// Build a commit from its parts, in canonical header order
    pub fn new(
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        let mut fields = vec![(TREE_KEY.to_string(), tree_oid.to_string())];
        if let Some(parent) = parent {
            fields.push((PARENT_KEY.to_string(), parent.to_string()));
        }
        fields.push((AUTHOR_KEY.to_string(), author.display()));
        fields.push((COMMITTER_KEY.to_string(), committer.display()));

        Commit {
            header: CommitHeader { fields },
            message,
        }
    }

    pub fn from_parts(header: CommitHeader, message: String) -> Self {
        Commit { header, message }
    }

    /// `"key value"` lines, a blank line, then the message bytes
    pub fn encode(header: &CommitHeader, message: &str) -> Vec<u8> {
        let mut lines = header
            .iter()
            .map(|(key, value)| format!("{key} {value}"))
            .collect::<Vec<String>>();
        lines.push(String::new());
        lines.push(message.to_string());

        lines.join("\n").into_bytes()
    }

    /// Split a payload at the first blank line into header and message
    pub fn decode(payload: &[u8]) -> Result<(CommitHeader, String)> {
        let content = std::str::from_utf8(payload)
            .map_err(|_| Error::corrupt("commit is not valid UTF-8"))?;
        let (raw_header, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::corrupt("commit has no blank line after its header"))?;

        let mut header = CommitHeader::default();
        for line in raw_header.split('\n') {
            let (key, value) = line
                .split_once(char::is_whitespace)
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| Error::corrupt(format!("malformed commit header line {line:?}")))?;

            header.insert(key, value.trim_start())?;
        }

        Ok((header, message.to_string()))
    }

    pub fn header(&self) -> &CommitHeader {
        &self.header
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn tree_oid(&self) -> Result<ObjectId> {
        let tree = self
            .header
            .get(TREE_KEY)
            .ok_or_else(|| Error::corrupt("commit has no tree"))?;

        ObjectId::try_parse(tree).map_err(|_| Error::corrupt(format!("bad tree id {tree:?}")))
    }

    pub fn parent(&self) -> Result<Option<ObjectId>> {
        self.header
            .get(PARENT_KEY)
            .map(|parent| {
                ObjectId::try_parse(parent)
                    .map_err(|_| Error::corrupt(format!("bad parent id {parent:?}")))
            })
            .transpose()
    }

    pub fn author(&self) -> Result<Author> {
        self.header
            .get(AUTHOR_KEY)
            .ok_or_else(|| Error::corrupt("commit has no author"))
            .and_then(Author::try_from)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Self::encode(&self.header, &self.message).into())
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: Bytes) -> Result<Self> {
        let (header, message) = Self::decode(&payload)?;
        Ok(Self::from_parts(header, message))
    }
}

impl Object for Commit {
    fn object_kind(&self) -> ObjectKind {
        ObjectKind::Commit
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&Self::encode(&self.header, &self.message)).into_owned()
    }
}
