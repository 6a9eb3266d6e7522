//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings representing the
//! SHA-1 hash of an object's framed content (`<kind> <len>\0<payload>`).
//!
//! ## Storage
//!
//! Objects are stored in `<meta>/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_ID_LENGTH};
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Object identifier
///
/// Always holds a validated, lowercase 40-character hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase hex digits are accepted and normalized to lowercase so that the
    /// fan-out path of an id never depends on how it was typed.
    pub fn try_parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if !Self::is_valid(id) {
            return Err(Error::InvalidId(id.to_string()));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Check whether a string has the shape of an object id
    pub fn is_valid(id: &str) -> bool {
        id.len() == OBJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Hash an already framed object buffer
    pub fn hash(framed: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(framed);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Build an id from its 20-byte binary form, as embedded in tree entries
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() != RAW_ID_LENGTH {
            return Err(Error::InvalidId(format!("{} raw bytes", raw.len())));
        }

        Ok(Self(raw.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// Convert to the 20-byte binary form
    pub fn to_raw(&self) -> [u8; RAW_ID_LENGTH] {
        let mut raw = [0u8; RAW_ID_LENGTH];
        let digits = self.0.as_bytes();

        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = (hex_value(digits[2 * i]) << 4) | hex_value(digits[2 * i + 1]);
        }

        raw
    }

    /// Convert to file system path for object storage
    ///
    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

// the string is validated on construction, so every byte is a hex digit
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}
