use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_kind::ObjectKind;
use crate::errors::Result;
use bytes::Bytes;

/// Serialize an object to its payload (the bytes after the `kind len\0` header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuild an object from its payload
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

/// Answers "what kind is the stored object with this id"
///
/// Tree entries carry no kind tag of their own; decoding a tree asks the
/// object store.
pub trait KindLookup {
    fn kind_of(&self, object_id: &ObjectId) -> Result<ObjectKind>;
}

pub trait Object: Packable {
    fn object_kind(&self) -> ObjectKind;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        let payload = self.serialize()?;
        Ok(ObjectId::hash(&self.object_kind().frame(&payload)))
    }
}
