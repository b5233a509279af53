//! Tree object
//!
//! Trees are directory snapshots: an ordered list of named entries pointing
//! at blobs (files) and other trees (subdirectories). On disk:
//! `tree <size>\0<entries>`, each entry `<octal-mode> <name>\0<20-byte-digest>`.
//!
//! Entries are kept in a `BTreeMap`, so serialization is canonical by
//! construction: two trees with the same logical content produce identical
//! bytes and therefore the same digest, regardless of insertion order.
//! Directory keys carry a trailing `/` (stripped on serialization) so they
//! sort the same way git sorts them.

use crate::artifacts::core::CoreError;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// A resolved tree entry: the digest it points at and its mode
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeRecord {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

/// One child of a tree under construction or loaded from the database
#[derive(Debug, Clone)]
enum TreeNode {
    /// A reference whose digest is already known (blob, or a loaded subtree)
    Leaf(TreeRecord),
    /// A nested tree still being built; its digest is computed on demand
    Subtree(Tree),
}

impl TreeNode {
    fn mode(&self) -> EntryMode {
        match self {
            TreeNode::Leaf(record) => record.mode,
            TreeNode::Subtree(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeNode::Leaf(record) => Ok(record.oid.clone()),
            TreeNode::Subtree(tree) => tree.object_id(),
        }
    }
}

/// Directory snapshot, immutable once stored
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    /// Fold a flat, path-sorted sequence of index entries into a nested tree.
    ///
    /// Each path is partitioned on its directory segments; files become leaf
    /// entries, intermediate directories become subtrees.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs();
            root.add_entry(&parents, entry)?;
        }

        Ok(root)
    }

    /// Visit subtrees before their parent (post-order), so children are
    /// stored before the tree that references their digests.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for node in self.entries.values() {
            if let TreeNode::Subtree(tree) = node {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    fn add_entry(&mut self, parents: &[&Path], entry: &IndexEntry) -> anyhow::Result<()> {
        if parents.is_empty() {
            let name = entry.basename()?.to_string();
            if self.entries.contains_key(&format!("{name}/")) {
                return Err(anyhow::anyhow!(
                    "Path conflict: {name:?} is both a file and a directory"
                ));
            }
            self.entries.insert(
                name,
                TreeNode::Leaf(TreeRecord::new(entry.oid.clone(), entry.mode)),
            );
            return Ok(());
        }

        let dir = parents[0]
            .file_name()
            .and_then(|name| name.to_str())
            .context("Invalid directory name")?;
        if self.entries.contains_key(dir) {
            return Err(anyhow::anyhow!(
                "Path conflict: {dir:?} is both a file and a directory"
            ));
        }

        // directory keys end with '/' to keep git's sort order
        let key = format!("{dir}/");
        let node = self
            .entries
            .entry(key)
            .or_insert_with(|| TreeNode::Subtree(Tree::default()));
        match node {
            TreeNode::Subtree(tree) => tree.add_entry(&parents[1..], entry),
            TreeNode::Leaf(_) => unreachable!("leaf keys never carry the '/' marker"),
        }
    }

    /// Resolved entries in canonical order, names without the `/` marker.
    pub fn records(&self) -> anyhow::Result<Vec<(&str, TreeRecord)>> {
        self.entries
            .iter()
            .map(|(name, node)| {
                Ok((
                    name.trim_end_matches('/'),
                    TreeRecord::new(node.oid()?, node.mode()),
                ))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for (name, node) in &self.entries {
            let name = name.trim_end_matches('/');

            let header = format!("{} {}", node.mode().as_str(), name);
            content_bytes.write_all(header.as_bytes())?;
            content_bytes.push(0);
            node.oid()?.write_raw_to(&mut content_bytes)?;
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(CoreError::malformed("unexpected EOF in tree entry mode").into());
            }

            let mode_str = std::str::from_utf8(&mode_bytes)
                .map_err(|_| CoreError::malformed("tree entry mode is not valid UTF-8"))?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                return Err(CoreError::malformed("unexpected EOF in tree entry name").into());
            }
            let name = std::str::from_utf8(&name_bytes)
                .map_err(|_| CoreError::malformed("tree entry name is not valid UTF-8"))?;

            let oid = ObjectId::read_raw_from(&mut reader)
                .map_err(|_| CoreError::malformed("unexpected EOF in tree entry digest"))?;

            // keep the '/' marker on directory names so re-serialization
            // preserves the canonical sort order
            let key = if mode.is_directory() {
                format!("{name}/")
            } else {
                name.to_owned()
            };
            entries.insert(key, TreeNode::Leaf(TreeRecord::new(oid, mode)));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> anyhow::Result<String> {
        Ok(self
            .records()?
            .into_iter()
            .map(|(name, record)| {
                format!(
                    "{} {} {}\t{}",
                    record.mode.as_str(),
                    record.mode.object_type(),
                    record.oid,
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn entry(path: &str, content: &[u8]) -> IndexEntry {
        IndexEntry::new(
            PathBuf::from(path),
            ObjectId::digest(content),
            EntryMode::default(),
        )
    }

    #[fixture]
    fn nested_entries() -> Vec<IndexEntry> {
        vec![entry("a.txt", b"A"), entry("dir/b.txt", b"B")]
    }

    #[rstest]
    fn serialization_is_input_order_independent() {
        let forward = Tree::build([entry("a.txt", b"1"), entry("b.txt", b"2")].iter()).unwrap();
        let backward = Tree::build([entry("b.txt", b"2"), entry("a.txt", b"1")].iter()).unwrap();

        assert_eq!(
            forward.serialize().unwrap(),
            backward.serialize().unwrap()
        );
        assert_eq!(
            forward.object_id().unwrap(),
            backward.object_id().unwrap()
        );
    }

    #[rstest]
    fn nested_paths_become_subtrees(nested_entries: Vec<IndexEntry>) {
        let root = Tree::build(nested_entries.iter()).unwrap();

        let records = root.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "a.txt");
        assert_eq!(records[0].1.mode, EntryMode::default());
        assert_eq!(records[1].0, "dir");
        assert_eq!(records[1].1.mode, EntryMode::Directory);
    }

    #[rstest]
    fn round_trips_through_canonical_bytes(nested_entries: Vec<IndexEntry>) {
        let root = Tree::build(nested_entries.iter()).unwrap();
        let bytes = root.serialize().unwrap();

        let mut reader = Cursor::new(bytes.clone());
        ObjectType::parse_header(&mut reader).unwrap();
        let parsed = Tree::deserialize(reader).unwrap();

        assert_eq!(parsed.serialize().unwrap(), bytes);
        assert_eq!(parsed.object_id().unwrap(), root.object_id().unwrap());
    }

    #[rstest]
    fn display_resolves_every_entry_digest(nested_entries: Vec<IndexEntry>) {
        let root = Tree::build(nested_entries.iter()).unwrap();

        let display = root.display().unwrap();
        for line in display.lines() {
            let fields: Vec<&str> = line.split([' ', '\t']).collect();
            assert_eq!(fields[2].len(), 40);
        }
    }

    #[rstest]
    fn empty_tree_serializes_to_empty_payload() {
        let tree = Tree::default();

        let bytes = tree.serialize().unwrap();
        assert_eq!(&bytes[..], b"tree 0\0");
    }

    #[rstest]
    fn changing_one_blob_changes_only_that_entry() {
        let before = Tree::build([entry("a.txt", b"A"), entry("dir/b.txt", b"B")].iter()).unwrap();
        let after = Tree::build([entry("a.txt", b"A2"), entry("dir/b.txt", b"B")].iter()).unwrap();

        let before_records = before.records().unwrap();
        let after_records = after.records().unwrap();

        assert_ne!(before_records[0].1.oid, after_records[0].1.oid);
        assert_eq!(before_records[1].1.oid, after_records[1].1.oid);
    }

    #[rstest]
    fn file_and_directory_at_same_path_is_rejected() {
        let result = Tree::build([entry("a", b"file"), entry("a/b.txt", b"nested")].iter());

        assert!(result.is_err());
    }
}
