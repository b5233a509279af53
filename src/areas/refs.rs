//! Branch references and HEAD
//!
//! References are human-readable names pointing to commits, stored as text
//! files:
//!
//! - `HEAD` holds `ref: refs/heads/<branch>` (symbolic) naming the current
//!   branch
//! - `refs/heads/<branch>` holds the 40-hex digest of the branch tip, or is
//!   absent/empty for a branch with no commits yet
//!
//! The core only reads and advances digests here; it takes an exclusive file
//! lock per update, but concurrent unsynchronized writers across processes
//! remain the caller's responsibility.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Pattern for symbolic references in HEAD
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the HEAD file
pub const HEAD: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository metadata directory (typically `.kit`)
    path: Box<Path>,
}

impl Refs {
    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    fn head_path(&self) -> PathBuf {
        self.path.join(HEAD)
    }

    /// Name of the branch HEAD currently points at.
    pub fn current_branch(&self) -> anyhow::Result<String> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("Unable to read {}", head_path.display()))?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD is not a symbolic reference: {content:?}"))?;

        Ok(symref[1].to_string())
    }

    /// Point HEAD at a branch, creating the file if needed.
    pub fn set_head(&self, branch_name: &str) -> anyhow::Result<()> {
        std::fs::write(
            self.head_path(),
            format!("ref: refs/heads/{branch_name}\n"),
        )
        .context("Unable to write HEAD")
    }

    /// Digest of the current branch tip, or `None` before the first commit.
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        let branch_name = self.current_branch()?;
        self.read_branch(&branch_name)
    }

    pub fn read_branch(&self, branch_name: &str) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(branch_name);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("Unable to read {}", branch_path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content.to_string())?))
    }

    /// Advance the current branch to a new tip.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_name = self.current_branch()?;
        self.update_branch(&branch_name, oid)
    }

    pub fn update_branch(&self, branch_name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(branch_name);
        std::fs::create_dir_all(
            branch_path
                .parent()
                .context("Invalid branch reference path")?,
        )?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&branch_path)
            .with_context(|| format!("Unable to open {}", branch_path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, file_guard::Lock::Exclusive, 0, 1)?;

        writeln!(lock.deref_mut(), "{oid}")
            .with_context(|| format!("Unable to write {}", branch_path.display()))?;

        Ok(())
    }
}
