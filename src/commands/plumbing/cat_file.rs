use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::Result;
use bytes::Bytes;

impl Repository {
    /// Kind and raw payload of an object
    pub fn cat_file(&self, object_id: &str) -> Result<(ObjectKind, Bytes)> {
        self.database().get_str(object_id)
    }

    /// Human-readable rendering of an object
    ///
    /// Blobs print as their content, trees one entry per line, commits as
    /// stored.
    pub fn pretty_print(&self, object_id: &str) -> Result<String> {
        let object_id = ObjectId::try_parse(object_id)?;

        match self.database().kind(&object_id)? {
            ObjectKind::Blob => Ok(self.database().load_blob(&object_id)?.display()),
            ObjectKind::Tree => Ok(self.database().load_tree(&object_id)?.display()),
            ObjectKind::Commit => Ok(self.database().load_commit(&object_id)?.display()),
        }
    }
}
