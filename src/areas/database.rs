//! Content-addressed object database
//!
//! Objects are framed as `<kind> <len>\0<payload>`, hashed with SHA-1, zlib
//! compressed and stored under a two-level fan-out path derived from the id.
//! The store is append-only: an id, once written, always resolves to the same
//! bytes.

use crate::artifacts::core::write_atomically;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{KindLookup, Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, IoContext, Result};
use bytes::Bytes;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Upper bound on the `<kind> <len>` header read when only the kind is needed
const MAX_HEADER_LENGTH: u64 = 64;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Store a payload and return its id
    ///
    /// Re-putting content that is already present writes nothing.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId> {
        let framed = kind.frame(payload);
        let object_id = ObjectId::hash(&framed);
        let object_path = self.object_path(&object_id);

        if object_path.exists() {
            tracing::trace!(%object_id, %kind, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path.parent().ok_or_else(|| Error::Io {
            path: object_path.clone(),
            source: std::io::Error::other("invalid object path"),
        })?;
        std::fs::create_dir_all(object_dir).at_path(object_dir)?;

        let compressed = Self::compress(&framed).at_path(&object_path)?;
        write_atomically(&object_path, &compressed, "tmp-obj")?;
        tracing::debug!(%object_id, %kind, size = payload.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.put(object.object_kind(), &object.serialize()?)
    }

    /// Fetch an object's kind and payload
    pub fn get(&self, object_id: &ObjectId) -> Result<(ObjectKind, Bytes)> {
        let compressed = self.read_object(object_id)?;
        let framed = Self::decompress(&compressed)
            .map_err(|e| Error::corrupt_object(object_id, format!("decompression failed: {e}")))?;

        let nul = framed
            .iter()
            .position(|&byte| byte == 0)
            .ok_or_else(|| Error::corrupt_object(object_id, "missing header terminator"))?;
        let (kind, length) =
            ObjectKind::parse_header(&framed[..nul]).map_err(|e| e.with_object(object_id))?;

        let payload = framed.slice(nul + 1..);
        if payload.len() != length {
            return Err(Error::corrupt_object(
                object_id,
                format!("header declares {length} bytes, found {}", payload.len()),
            ));
        }

        Ok((kind, payload))
    }

    /// Like [`Database::get`], for an id that has not been validated yet
    pub fn get_str(&self, object_id: &str) -> Result<(ObjectKind, Bytes)> {
        self.get(&ObjectId::try_parse(object_id)?)
    }

    /// Read the kind of an object by decompressing only its header
    pub fn kind(&self, object_id: &ObjectId) -> Result<ObjectKind> {
        let object_path = self.object_path(object_id);
        let file = std::fs::File::open(&object_path)
            .map_err(|_| Error::ObjectNotFound(object_id.clone()))?;

        let mut header = Vec::new();
        BufReader::new(flate2::read::ZlibDecoder::new(file))
            .take(MAX_HEADER_LENGTH)
            .read_until(0, &mut header)
            .map_err(|e| Error::corrupt_object(object_id, format!("decompression failed: {e}")))?;

        if header.pop() != Some(0) {
            return Err(Error::corrupt_object(object_id, "missing header terminator"));
        }

        ObjectKind::parse_header(&header)
            .map(|(kind, _)| kind)
            .map_err(|e| e.with_object(object_id))
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        Blob::deserialize(self.get_expecting(object_id, ObjectKind::Blob)?)
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        let payload = self.get_expecting(object_id, ObjectKind::Tree)?;
        Tree::decode(&payload, self)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        Commit::deserialize(self.get_expecting(object_id, ObjectKind::Commit)?)
            .map_err(|e| e.with_object(object_id))
    }

    fn get_expecting(&self, object_id: &ObjectId, expected: ObjectKind) -> Result<Bytes> {
        let (kind, payload) = self.get(object_id)?;
        if kind != expected {
            return Err(Error::corrupt_object(
                object_id,
                format!("expected a {expected}, found a {kind}"),
            ));
        }

        Ok(payload)
    }

    fn read_object(&self, object_id: &ObjectId) -> Result<Bytes> {
        // absent and unreadable are reported alike
        std::fs::read(self.object_path(object_id))
            .map(Bytes::from)
            .map_err(|_| Error::ObjectNotFound(object_id.clone()))
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }
}

impl KindLookup for Database {
    fn kind_of(&self, object_id: &ObjectId) -> Result<ObjectKind> {
        self.kind(object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    fn stored_files(dir: &Path) -> usize {
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .count()
    }

    #[rstest]
    fn put_then_get_returns_same_payload(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.put(ObjectKind::Blob, b"hello").unwrap();

        assert_eq!(oid, ObjectId::hash(b"blob 5\0hello"));
        assert_eq!(
            database.get(&oid).unwrap(),
            (ObjectKind::Blob, Bytes::from_static(b"hello"))
        );
    }

    #[rstest]
    fn identical_content_is_stored_once(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.put(ObjectKind::Blob, b"same").unwrap();
        let second = database.put(ObjectKind::Blob, b"same").unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_files(objects_dir.path()), 1);
    }

    #[rstest]
    fn object_lands_in_fan_out_directory(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.put(ObjectKind::Blob, b"hello").unwrap();

        let expected = objects_dir
            .path()
            .join(&oid.as_ref()[..2])
            .join(&oid.as_ref()[2..]);
        assert!(expected.is_file());
    }

    #[rstest]
    fn kind_reads_header_only(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.put(ObjectKind::Tree, b"").unwrap();

        assert_eq!(database.kind(&oid).unwrap(), ObjectKind::Tree);
    }

    #[rstest]
    fn malformed_id_is_invalid(objects_dir: TempDir) {
        let database = database(&objects_dir);

        assert!(matches!(
            database.get_str("not-an-id"),
            Err(Error::InvalidId(_))
        ));
    }

    #[rstest]
    fn absent_object_is_not_found(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::hash(b"blob 0\0");

        assert!(matches!(database.get(&oid), Err(Error::ObjectNotFound(_))));
    }

    #[rstest]
    fn length_mismatch_is_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::hash(b"forged");
        let path = database.object_path(&oid);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, Database::compress(b"blob 10\0short").unwrap()).unwrap();

        assert!(matches!(
            database.get(&oid),
            Err(Error::CorruptObject { id: Some(id), .. }) if id == oid
        ));
    }

    #[rstest]
    fn undecompressable_object_is_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::hash(b"garbage");
        let path = database.object_path(&oid);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"definitely not zlib").unwrap();

        assert!(matches!(
            database.get(&oid),
            Err(Error::CorruptObject { .. })
        ));
    }

    #[rstest]
    fn typed_load_rejects_other_kinds(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.put(ObjectKind::Blob, b"hello").unwrap();

        assert!(matches!(
            database.load_commit(&oid),
            Err(Error::CorruptObject { .. })
        ));
    }
}
