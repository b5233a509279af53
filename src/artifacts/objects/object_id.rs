//! Object identifier (SHA-1 digest)
//!
//! Object IDs are 40-character hexadecimal strings naming the SHA-1 digest of
//! an object's canonical bytes. Two objects with identical canonical bytes
//! always share an ID, which is what makes the store content-addressable.
//!
//! Objects live at `objects/<first-2-chars>/<remaining-38-chars>` so no
//! single directory grows unbounded.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_OBJECT_ID_LENGTH};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// A validated 40-character hexadecimal object identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Compute the identifier of a canonical byte-stream.
    ///
    /// Deterministic: the same bytes always produce the same ID, across
    /// calls and across processes.
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        let oid = hasher.finalize();
        ObjectId(format!("{oid:x}"))
    }

    /// Validate a 40-character hexadecimal string as an object ID.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_lowercase()))
    }

    /// Write the ID as 20 raw bytes, the form trees embed.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&self.0[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an ID back from its 20 raw bytes.
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        reader.read_exact(&mut raw)?;

        let mut hex = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in raw {
            hex.push_str(&format!("{byte:02x}"));
        }

        Self::try_parse(hex)
    }

    /// Storage location relative to the objects directory: `XX/YYYY...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form used in command output
    pub fn to_short_oid(&self) -> &str {
        &self.0[..7]
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
