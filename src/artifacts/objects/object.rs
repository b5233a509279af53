use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Canonical serialization into the `<kind> <size>\0<content>` wire form.
///
/// Logically equal objects must serialize to identical bytes; the digest is
/// computed over exactly these bytes.
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Inverse of [`Packable`]; the reader is positioned after the header.
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> Result<String>;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::digest(&self.serialize()?))
    }
}

/// A parsed object of any kind, as returned by the database.
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }

    pub fn display(&self) -> Result<String> {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
