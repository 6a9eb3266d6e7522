use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;
use std::path::Path;

impl Repository {
    /// Store raw bytes as a blob
    pub fn put_blob(&self, data: impl Into<Bytes>) -> Result<ObjectId> {
        self.database().store(&Blob::new(data.into()))
    }

    /// Id of a file's content as a blob, stored only when `write` is set
    pub fn hash_object(&self, file_path: &Path, write: bool) -> Result<ObjectId> {
        let blob = Blob::new(self.workspace().read_file(file_path)?);

        if write {
            self.database().store(&blob)
        } else {
            blob.object_id()
        }
    }
}
