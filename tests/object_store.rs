use assert_fs::TempDir;
use bytes::Bytes;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use vault::artifacts::objects::blob::Blob;
use vault::artifacts::objects::entry_mode::EntryMode;
use vault::artifacts::objects::object_id::ObjectId;
use vault::artifacts::objects::object_kind::ObjectKind;
use vault::artifacts::objects::tree::{Tree, TreeEntry};
use vault::{Error, Repository};

mod common;

use common::{repository, repository_dir};

#[rstest]
fn hello_blob_round_trips(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let oid = repository.put_blob(Bytes::from_static(b"hello")).unwrap();

    assert_eq!(oid, ObjectId::hash(b"blob 5\0hello"));
    assert_eq!(oid.as_ref(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
    assert_eq!(
        repository.cat_file(oid.as_ref()).unwrap(),
        (ObjectKind::Blob, Bytes::from_static(b"hello"))
    );
}

#[rstest]
fn storing_twice_keeps_one_object(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let first = repository.put_blob("same bytes").unwrap();
    let second = repository.put_blob("same bytes").unwrap();

    assert_eq!(first, second);
    assert_eq!(common::stored_object_count(&repository), 1);
}

#[rstest]
fn hash_object_without_write_stores_nothing(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    common::write_file(dir.path(), "note.txt", "hello");

    let oid = repository
        .hash_object(std::path::Path::new("note.txt"), false)
        .unwrap();

    assert_eq!(oid.as_ref(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
    assert_eq!(common::stored_object_count(&repository), 0);
}

#[rstest]
fn tree_entries_round_trip_through_the_store(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let file_oid = repository.put_blob("content of a").unwrap();
    let subtree_oid = repository.database().store(&Tree::new(Vec::new())).unwrap();
    let entries = vec![
        TreeEntry::file("a.txt", file_oid.clone()).unwrap(),
        TreeEntry::directory("sub", subtree_oid.clone()).unwrap(),
    ];

    let decoded = Tree::decode(&Tree::encode(&entries), repository.database()).unwrap();

    assert_eq!(decoded.entries(), entries.as_slice());
    assert_eq!(decoded.entries()[0].mode, EntryMode::Regular);
    assert_eq!(decoded.entries()[0].kind, ObjectKind::Blob);
    assert_eq!(decoded.entries()[1].mode, EntryMode::Directory);
    assert_eq!(decoded.entries()[1].kind, ObjectKind::Tree);
    assert_eq!(decoded.entries()[1].oid, subtree_oid);
}

#[rstest]
fn stored_tree_loads_back(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let blob_oid = repository.database().store(&Blob::new("x".into())).unwrap();
    let tree = Tree::new(vec![TreeEntry::file("x", blob_oid).unwrap()]);
    let tree_oid = repository.database().store(&tree).unwrap();

    assert_eq!(repository.database().load_tree(&tree_oid).unwrap(), tree);
}

#[rstest]
fn declared_length_mismatch_is_corrupt(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    let oid = ObjectId::hash(b"forged object");
    let path = repository.database().object_path(&oid);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"blob 10\0short").unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    assert!(matches!(
        repository.cat_file(oid.as_ref()),
        Err(Error::CorruptObject { id: Some(id), .. }) if id == oid
    ));
}

#[rstest]
#[case("")]
#[case("b6fc4c620b67")]
#[case("zzfc4c620b67d95f953a5c1c1230aaab5db5a1b0")]
#[case("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0ff")]
fn malformed_ids_are_rejected(
    repository: (TempDir, Repository),
    #[case] id: &str,
) {
    let (_dir, repository) = repository;
    assert!(matches!(repository.cat_file(id), Err(Error::InvalidId(_))));
}

#[rstest]
fn unknown_id_is_not_found(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    assert!(matches!(
        repository.cat_file("0000000000000000000000000000000000000000"),
        Err(Error::ObjectNotFound(_))
    ));
}

#[rstest]
fn snapshot_does_not_depend_on_creation_order(repository_dir: TempDir) {
    let repository = Repository::init(repository_dir.path(), common::config()).unwrap();
    for name in ["c.txt", "a.txt", "b.txt"] {
        common::write_file(repository_dir.path(), &format!("first/{name}"), name);
    }
    for name in ["b.txt", "c.txt", "a.txt"] {
        common::write_file(repository_dir.path(), &format!("second/{name}"), name);
    }

    let first = repository.snapshot("first").unwrap();
    let second = repository.snapshot("second").unwrap();

    assert_eq!(first, second);
    let names = repository
        .database()
        .load_tree(&first)
        .unwrap()
        .entries()
        .iter()
        .map(|entry| entry.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
}

#[rstest]
fn snapshot_skips_metadata_directory(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    common::write_file(dir.path(), "tracked.txt", "tracked");

    let tree_oid = repository.snapshot("").unwrap();

    let tree = repository.database().load_tree(&tree_oid).unwrap();
    assert_eq!(tree.entries().len(), 1);
    assert_eq!(tree.entries()[0].name, "tracked.txt");
}

#[rstest]
fn empty_directory_becomes_empty_tree(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    std::fs::create_dir_all(dir.path().join("empty")).unwrap();

    let tree_oid = repository.snapshot("").unwrap();

    let tree = repository.database().load_tree(&tree_oid).unwrap();
    let empty = &tree.entries()[0];
    assert_eq!(empty.name, "empty");
    assert_eq!(empty.kind, ObjectKind::Tree);
    assert!(repository.database().load_tree(&empty.oid).unwrap().is_empty());
}
