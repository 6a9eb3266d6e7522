use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use vault::areas::refs::Head;
use vault::artifacts::objects::object_id::ObjectId;
use vault::{Error, Repository};

mod common;

use common::{repository, repository_dir};

fn history(repository: &Repository, start: Option<&str>) -> Vec<(ObjectId, String)> {
    repository
        .log(start)
        .unwrap()
        .iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let message = entry.message().to_string();
            (entry.oid, message)
        })
        .collect()
}

#[rstest]
fn log_walks_parents_newest_first(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    common::write_file(dir.path(), "a.txt", "one");
    let first = repository.commit("msg1").unwrap();
    common::write_file(dir.path(), "a.txt", "two");
    let second = repository.commit("msg2").unwrap();

    assert_eq!(
        history(&repository, Some("HEAD")),
        vec![(second, "msg2".to_string()), (first, "msg1".to_string())]
    );
}

#[rstest]
fn log_can_be_walked_again(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    common::write_file(dir.path(), "a.txt", "one");
    repository.commit("first").unwrap();
    repository.commit("second").unwrap();

    let log = repository.log(None).unwrap();
    let first_walk = log.iter().map(|entry| entry.unwrap().oid).collect::<Vec<_>>();
    let second_walk = (&log)
        .into_iter()
        .map(|entry| entry.unwrap().oid)
        .collect::<Vec<_>>();

    assert_eq!(first_walk.len(), 2);
    assert_eq!(first_walk, second_walk);
}

#[rstest]
fn commit_records_tree_parent_and_identity(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    common::write_file(dir.path(), "a.txt", "one");
    let first = repository.commit("first").unwrap();
    let second = repository.commit("second\n\nwith a body").unwrap();

    let commit = repository.database().load_commit(&second).unwrap();

    assert_eq!(commit.parent().unwrap(), Some(first.clone()));
    assert_eq!(commit.tree_oid().unwrap(), repository.snapshot("").unwrap());
    assert_eq!(commit.author().unwrap().name(), common::AUTHOR_NAME);
    assert_eq!(commit.author().unwrap().email(), common::AUTHOR_EMAIL);
    assert_eq!(commit.message(), "second\n\nwith a body");
    assert_eq!(commit.short_message(), "second");
    let keys = commit.header().iter().map(|(key, _)| key).collect::<Vec<_>>();
    assert_eq!(keys, vec!["tree", "parent", "author", "committer"]);

    let root = repository.database().load_commit(&first).unwrap();
    assert_eq!(root.parent().unwrap(), None);
}

#[rstest]
fn first_commit_creates_the_branch(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;

    let oid = repository.commit("empty tree").unwrap();

    assert_eq!(common::read_file(dir.path(), ".vault/refs/heads/main"), oid.as_ref());
    assert_eq!(repository.resolve("HEAD").unwrap(), oid);
}

#[rstest]
fn commit_on_detached_head_stores_nothing(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    let oid = repository.commit("root").unwrap();
    common::write_file(dir.path(), ".vault/HEAD", oid.as_ref());
    assert_eq!(repository.head().unwrap(), Head::Detached(oid));
    let objects_before = common::stored_object_count(&repository);
    common::write_file(dir.path(), "new.txt", "never stored");

    assert!(matches!(
        repository.commit("detached"),
        Err(Error::RefUnreadable { name, .. }) if name == "HEAD"
    ));
    assert_eq!(common::stored_object_count(&repository), objects_before);
}

#[rstest]
fn log_from_a_raw_id_starts_there(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let first = repository.commit("first").unwrap();
    repository.commit("second").unwrap();

    assert_eq!(
        history(&repository, Some(first.as_ref())),
        vec![(first, "first".to_string())]
    );
}

#[rstest]
fn log_of_unborn_branch_fails(repository_dir: TempDir) {
    let repository = Repository::init(repository_dir.path(), common::config()).unwrap();

    assert!(matches!(
        repository.log(None),
        Err(Error::RefUnreadable { .. })
    ));
}

#[rstest]
fn missing_commit_in_history_is_reported(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let first = repository.commit("first").unwrap();
    repository.commit("second").unwrap();
    let first_path = repository.database().object_path(&first);
    std::fs::remove_file(&first_path).unwrap();

    let entries = repository.log(None).unwrap().iter().collect::<Vec<_>>();

    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_ok());
    assert!(matches!(&entries[1], Err(Error::ObjectNotFound(id)) if *id == first));
}
