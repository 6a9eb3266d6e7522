use crate::artifacts::branch::{HEADS_PREFIX, INVALID_REF_NAME_REGEX};
use crate::errors::{Error, Result};
use std::path::PathBuf;
use std::sync::LazyLock;

static INVALID_REF_NAME: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(INVALID_REF_NAME_REGEX).expect("ref name pattern compiles")
});

fn check_ref_name(name: &str) -> Result<()> {
    if name.is_empty() || INVALID_REF_NAME.is_match(name) {
        return Err(Error::InvalidRefName(name.to_string()));
    }

    Ok(())
}

/// Path of a ref file relative to the metadata directory, e.g. `HEAD` or
/// `refs/heads/main`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_ref_name(&name)?;

        Ok(Self(name))
    }

    pub fn head() -> Self {
        Self(crate::areas::refs::HEAD_REF_NAME.to_string())
    }

    pub fn is_head(&self) -> bool {
        self.0 == crate::areas::refs::HEAD_REF_NAME
    }

    /// Relative path of the ref file
    pub fn as_ref_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// Companion lock file serializing updates of this ref
    pub fn lock_path(&self) -> PathBuf {
        let mut path = self.as_ref_path();
        path.set_file_name(format!("{}.lock", self.short_name()));
        path
    }

    /// Last path segment, e.g. `main` for `refs/heads/main`
    pub fn short_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Branch name as typed by a user, e.g. `main` or `feature/login`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_ref_name(&name)?;

        Ok(Self(name))
    }

    pub fn to_ref_name(&self) -> RefName {
        RefName(format!("{HEADS_PREFIX}{}", self.0))
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
