//! Shared filesystem utilities

use crate::errors::{Error, IoContext, Result};
use fake::rand;
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
///
/// The data goes to a uniquely named sibling first and is renamed over `path`
/// once flushed to disk.
pub(crate) fn write_atomically(path: &Path, content: &[u8], temp_prefix: &str) -> Result<()> {
    let dir = path.parent().ok_or_else(|| Error::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other("path has no parent directory"),
    })?;
    let temp_path = dir.join(format!(
        "{temp_prefix}-{}-{}",
        std::process::id(),
        rand::random::<u32>()
    ));

    // CREAT | EXCL so two writers never share a temp file
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .at_path(&temp_path)?;

    let written = file
        .write_all(content)
        .and_then(|_| file.sync_all())
        .and_then(|_| std::fs::rename(&temp_path, path));

    if let Err(source) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
