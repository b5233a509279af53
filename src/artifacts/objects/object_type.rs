use crate::artifacts::core::CoreError;
use std::io::BufRead;

/// Closed set of object kinds; parsing and serialization match on it
/// exhaustively so a new kind cannot be half-supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<kind> <size>\0` header and return the kind.
    ///
    /// The reader is left positioned at the start of the object payload.
    pub fn parse_header(reader: &mut impl BufRead) -> anyhow::Result<ObjectType> {
        let mut kind = Vec::new();
        reader.read_until(b' ', &mut kind)?;
        if kind.pop() != Some(b' ') {
            return Err(CoreError::malformed("missing space after object kind").into());
        }

        let kind = std::str::from_utf8(&kind)
            .map_err(|_| CoreError::malformed("object kind is not valid UTF-8"))?;
        let kind = ObjectType::try_from(kind)?;

        let mut size = Vec::new();
        reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            return Err(CoreError::malformed("missing NUL after object size").into());
        }
        if size.is_empty() || !size.iter().all(u8::is_ascii_digit) {
            return Err(CoreError::malformed("object size is not numeric").into());
        }

        Ok(kind)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            kind => Err(CoreError::malformed(format!("unknown object kind {kind:?}")).into()),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
