//! Ref and branch names

pub mod branch_name;

/// Names matching this pattern are rejected: leading dots, `..`, `/.`,
/// leading or trailing slashes, `.lock` suffixes, `@{`, whitespace, control
/// and glob characters.
pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Directory holding branch refs, relative to the metadata directory
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Directory holding tag refs, relative to the metadata directory
pub const TAGS_PREFIX: &str = "refs/tags/";
