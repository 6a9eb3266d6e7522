#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use vault::{Repository, RepositoryConfig};

pub const AUTHOR_NAME: &str = "Ada Lovelace";
pub const AUTHOR_EMAIL: &str = "ada@example.com";

pub fn config() -> RepositoryConfig {
    RepositoryConfig::default().with_identity(AUTHOR_NAME, AUTHOR_EMAIL)
}

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn repository(repository_dir: TempDir) -> (TempDir, Repository) {
    let repository =
        Repository::init(repository_dir.path(), config()).expect("Failed to init repository");
    (repository_dir, repository)
}

pub fn write_file(dir: &Path, relative_path: &str, content: &str) {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

pub fn read_file(dir: &Path, relative_path: &str) -> String {
    std::fs::read_to_string(dir.join(relative_path)).expect("Failed to read file")
}

/// Number of object files in the store
pub fn stored_object_count(repository: &Repository) -> usize {
    walkdir::WalkDir::new(repository.database().objects_path())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Path, size and modification time of everything under `dir`
pub fn fs_state(dir: &Path) -> BTreeMap<PathBuf, (u64, SystemTime)> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let metadata = entry.metadata().expect("Failed to stat entry");
            let modified = metadata.modified().expect("Failed to read mtime");
            (entry.path().to_path_buf(), (metadata.len(), modified))
        })
        .collect()
}

pub fn run_vault_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vault").expect("Failed to find vault binary");
    cmd.current_dir(dir)
        .env("VAULT_AUTHOR_NAME", AUTHOR_NAME)
        .env("VAULT_AUTHOR_EMAIL", AUTHOR_EMAIL)
        .env_remove("VAULT_DIR")
        .env_remove("RUST_LOG")
        .args(args);
    cmd
}
