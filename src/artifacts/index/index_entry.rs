//! Staging area entries
//!
//! An entry maps one working-tree relative path to the digest of its staged
//! blob plus the file mode. The blob is always written to the object database
//! before the entry is recorded, so every staged path resolves to real
//! content at commit time.

use crate::artifacts::core::CoreError;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Path, PathBuf};

/// One staged path and the blob it resolves to
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Digest of the staged blob
    pub oid: ObjectId,
    /// File mode recorded for the tree entry
    pub mode: EntryMode,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name"))
    }

    /// Ancestor directories from outermost to innermost, excluding the root.
    ///
    /// `a/b/c` yields `["a", "a/b"]`; a top-level path yields nothing.
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = Vec::new();
        let mut parent = self.path.parent();

        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            dirs.push(dir);
            parent = dir.parent();
        }
        dirs.reverse();

        dirs
    }

    /// Render the persisted record: `<octal-mode> <hex-digest> <path>`
    pub fn to_record(&self) -> String {
        format!(
            "{} {} {}",
            self.mode.as_str(),
            self.oid,
            self.path.display()
        )
    }

    /// Parse one persisted record line.
    pub fn parse_record(line: &str) -> anyhow::Result<Self> {
        let mut fields = line.splitn(3, ' ');

        let mode = fields
            .next()
            .ok_or_else(|| CoreError::malformed("index record missing mode"))?;
        let mode = EntryMode::from_octal_str(mode)?;

        let oid = fields
            .next()
            .ok_or_else(|| CoreError::malformed("index record missing digest"))?;
        let oid = ObjectId::try_parse(oid.to_string())?;

        let path = fields
            .next()
            .filter(|path| !path.is_empty())
            .ok_or_else(|| CoreError::malformed("index record missing path"))?;

        Ok(Self::new(PathBuf::from(path), oid, mode))
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path.cmp(&other.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn oid() -> ObjectId {
        ObjectId::digest(b"test data")
    }

    #[rstest]
    fn nested_entry_lists_its_parent_dirs(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("a/b/c"), oid, EntryMode::default());

        assert_eq!(entry.parent_dirs(), vec![Path::new("a"), Path::new("a/b")]);
    }

    #[rstest]
    fn top_level_entry_has_no_parent_dirs(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("a"), oid, EntryMode::default());

        assert_eq!(entry.parent_dirs(), Vec::<&Path>::new());
    }

    #[rstest]
    fn record_form_round_trips(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("dir/file.txt"), oid.clone(), EntryMode::default());

        let record = entry.to_record();
        assert_eq!(record, format!("100644 {oid} dir/file.txt"));

        let parsed = IndexEntry::parse_record(&record).unwrap();
        assert_eq!(parsed.path, entry.path);
        assert_eq!(parsed.oid, entry.oid);
        assert_eq!(parsed.mode, entry.mode);
    }

    #[rstest]
    fn record_keeps_spaces_inside_paths(oid: ObjectId) {
        let entry = IndexEntry::new(PathBuf::from("with space.txt"), oid, EntryMode::default());

        let parsed = IndexEntry::parse_record(&entry.to_record()).unwrap();
        assert_eq!(parsed.path, PathBuf::from("with space.txt"));
    }

    #[rstest]
    #[case::missing_fields("100644 abc")]
    #[case::bad_mode("999999 aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa f.txt")]
    #[case::bad_digest("100644 nothex f.txt")]
    fn rejects_malformed_records(#[case] line: &str) {
        assert!(IndexEntry::parse_record(line).is_err());
    }
}
