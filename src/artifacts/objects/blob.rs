//! Blob object
//!
//! Blobs store file content and nothing else: no path, name or permissions
//! (those live in tree entries). On disk: `blob <size>\0<content>`.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// File content at a point in time, identified solely by its digest
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been consumed
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> anyhow::Result<String> {
        Ok(String::from_utf8_lossy(&self.content).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    fn serializes_with_kind_and_length_header() {
        let blob = Blob::new(Bytes::from_static(b"hello"));

        let bytes = blob.serialize().unwrap();
        assert_eq!(&bytes[..], b"blob 5\0hello");
    }

    #[rstest]
    fn round_trips_binary_content() {
        let blob = Blob::new(Bytes::from_static(b"\x00\xffbinary\x00"));
        let bytes = blob.serialize().unwrap();

        let mut reader = Cursor::new(bytes);
        let kind = ObjectType::parse_header(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(parsed, blob);
    }

    #[rstest]
    fn identical_content_yields_identical_ids() {
        let first = Blob::new(Bytes::from_static(b"same bytes"));
        let second = Blob::new(Bytes::from_static(b"same bytes"));

        assert_eq!(
            first.object_id().unwrap(),
            second.object_id().unwrap()
        );
    }
}
