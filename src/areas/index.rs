//! Staging area (index)
//!
//! An ordered table mapping working-tree relative paths to staged blob
//! digests, persisted as sorted text records (see `artifacts::index`). The
//! index is the only mutable persisted state in the core; it bridges working
//! file state to the next commit and is rebuilt into a tree at commit time.
//!
//! Loading and saving take advisory file locks, but the persisted file is
//! not safe for concurrent unsynchronized writers across processes; the
//! caller owns repository-level serialization of load-mutate-save sequences.

use crate::artifacts::index::index_entry::IndexEntry;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::Read;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.kit/index`)
    path: Box<Path>,
    /// Staged entries keyed by path; BTreeMap keeps listing order canonical
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Set when the in-memory state has diverged from disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Load the persisted index. A missing file yields an empty index: a
    /// fresh repository has none and that is not an error.
    pub fn load(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut()
            .read_to_string(&mut content)
            .context("Unable to read index file")?;

        for line in content.lines() {
            let entry = IndexEntry::parse_record(line)
                .with_context(|| format!("Corrupt index record: {line:?}"))?;
            self.entries.insert(entry.path.clone(), entry);
        }

        Ok(())
    }

    /// Persist the current entries, sorted by path.
    pub fn save(&mut self) -> anyhow::Result<()> {
        let mut records = String::new();
        for entry in self.entries.values() {
            records.push_str(&entry.to_record());
            records.push('\n');
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        std::io::Write::write_all(lock.deref_mut(), records.as_bytes())
            .context("Unable to write index file")?;
        self.changed = false;

        Ok(())
    }

    /// Record `path -> digest`. Latest write wins; a path staged both as a
    /// file and as a directory cannot coexist, so conflicting entries are
    /// evicted first.
    pub fn stage(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        self.entries.insert(entry.path.clone(), entry);
        self.changed = true;
    }

    /// Drop the entry for `path` and anything staged beneath it. Unstaging
    /// an unknown path is a no-op, not an error.
    pub fn unstage(&mut self, path: &Path) {
        let mut removed = self.entries.remove(path).is_some();

        let nested: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|staged| staged.starts_with(path))
            .cloned()
            .collect();
        for staged in nested {
            self.entries.remove(&staged);
            removed = true;
        }

        if removed {
            self.changed = true;
        }
    }

    /// Empty the index, invoked after a successful commit.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.changed = true;
        }
        self.entries.clear();
    }

    /// Entries sorted by path, the order tree building relies on.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        // a parent directory of the new path may be staged as a file
        for parent in entry.parent_dirs() {
            self.entries.remove(parent);
        }

        // the new path may shadow files staged beneath it
        let nested: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|staged| staged.as_path() != entry.path && staged.starts_with(&entry.path))
            .cloned()
            .collect();
        for staged in nested {
            self.entries.remove(&staged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::EntryMode;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn entry(path: &str, content: &[u8]) -> IndexEntry {
        IndexEntry::new(
            PathBuf::from(path),
            ObjectId::digest(content),
            EntryMode::default(),
        )
    }

    #[fixture]
    fn index() -> (assert_fs::TempDir, Index) {
        let dir = assert_fs::TempDir::new().unwrap();
        let index = Index::new(dir.path().join("index").into_boxed_path());
        (dir, index)
    }

    #[rstest]
    fn stage_then_list_returns_the_entry(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("f.txt", b"hello"));

        let paths: Vec<_> = index.entries().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("f.txt")]);
    }

    #[rstest]
    fn restaging_a_path_overwrites_the_digest(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("f.txt", b"old"));
        index.stage(entry("f.txt", b"new"));

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.entry_by_path(Path::new("f.txt")).unwrap().oid,
            ObjectId::digest(b"new")
        );
    }

    #[rstest]
    fn unstaging_removes_the_entry(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("f.txt", b"hello"));
        index.unstage(Path::new("f.txt"));

        assert!(index.is_empty());
    }

    #[rstest]
    fn unstaging_an_unknown_path_is_a_no_op(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("f.txt", b"hello"));
        index.unstage(Path::new("missing.txt"));

        assert_eq!(index.len(), 1);
    }

    #[rstest]
    fn unstaging_a_directory_drops_everything_beneath_it(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("dir/a.txt", b"a"));
        index.stage(entry("dir/sub/b.txt", b"b"));
        index.stage(entry("other.txt", b"c"));

        index.unstage(Path::new("dir"));

        let paths: Vec<_> = index.entries().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("other.txt")]);
    }

    #[rstest]
    fn staging_a_nested_path_evicts_a_file_at_its_parent(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("a", b"file"));
        index.stage(entry("a/b.txt", b"nested"));

        let paths: Vec<_> = index.entries().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a/b.txt")]);
    }

    #[rstest]
    fn staging_a_file_evicts_entries_beneath_it(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("a/b.txt", b"nested"));
        index.stage(entry("a/c.txt", b"nested too"));
        index.stage(entry("a", b"file"));

        let paths: Vec<_> = index.entries().map(|e| e.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a")]);
    }

    #[rstest]
    fn save_and_load_round_trip(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("b.txt", b"2"));
        index.stage(entry("a.txt", b"1"));
        index.stage(entry("dir/c.txt", b"3"));
        index.save().unwrap();

        let mut reloaded = Index::new(index.path().to_path_buf().into_boxed_path());
        reloaded.load().unwrap();

        let paths: Vec<_> = reloaded.entries().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("dir/c.txt"),
            ]
        );
    }

    #[rstest]
    fn loading_a_missing_file_yields_an_empty_index(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.load().unwrap();

        assert!(index.is_empty());
    }

    #[rstest]
    fn clear_empties_the_index(index: (assert_fs::TempDir, Index)) {
        let (_dir, mut index) = index;

        index.stage(entry("f.txt", b"hello"));
        index.clear();

        assert!(index.is_empty());
        assert!(index.is_changed());
    }
}
