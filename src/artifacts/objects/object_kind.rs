use crate::errors::{Error, Result};

/// The closed set of object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }

    /// Frame a payload as `"{kind} {length}\0{payload}"`
    pub fn frame(&self, payload: &[u8]) -> Vec<u8> {
        let header = format!("{} {}\0", self.as_str(), payload.len());

        let mut framed = Vec::with_capacity(header.len() + payload.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(payload);
        framed
    }

    /// Parse a `"{kind} {length}"` header (without the trailing NUL)
    pub fn parse_header(header: &[u8]) -> Result<(ObjectKind, usize)> {
        let header = std::str::from_utf8(header)
            .map_err(|_| Error::corrupt("object header is not valid UTF-8"))?;
        let (kind, length) = header
            .split_once(' ')
            .ok_or_else(|| Error::corrupt(format!("malformed object header {header:?}")))?;

        let kind = ObjectKind::try_from(kind)?;
        let length = length
            .parse::<usize>()
            .map_err(|_| Error::corrupt(format!("invalid object length {length:?}")))?;

        Ok((kind, length))
    }
}

impl TryFrom<&str> for ObjectKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            _ => Err(Error::corrupt(format!("unknown object kind {value:?}"))),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
