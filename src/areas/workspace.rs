//! Working directory byte source
//!
//! The workspace hands file bytes and modes to the staging machinery; it
//! never interprets content. Paths returned are always relative to the
//! repository root, and the repository metadata directory is skipped.

use crate::areas::repository::REPO_DIR;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use bytes::Bytes;
use is_executable::IsExecutable;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [REPO_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw bytes of a working-tree file, addressed relative to the root.
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(file_path)?;

        Ok(Bytes::from(content))
    }

    /// Mode a staged entry should record for this file.
    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMode> {
        let file_path = self.path.join(file_path);
        if !file_path.is_file() {
            anyhow::bail!("Not a regular file: {}", file_path.display());
        }

        Ok(match file_path.is_executable() {
            true => EntryMode::File(FileMode::Executable),
            false => EntryMode::File(FileMode::Regular),
        })
    }

    /// All files under `root_file_path` (the whole tree when `None`),
    /// relative to the repository root.
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(p)?,
            None => self.path.clone().into(),
        };

        if !root_file_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", root_file_path);
        }

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.relative_if_tracked_file(entry.path()))
                .collect::<Vec<_>>())
        } else {
            let relative_path = root_file_path
                .strip_prefix(self.path.as_ref())
                .map_err(|_| {
                    anyhow::anyhow!(
                        "Path is outside the repository: {}",
                        root_file_path.display()
                    )
                })?;

            Ok(vec![relative_path.to_path_buf()])
        }
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name = name.to_string_lossy();
                IGNORED_PATHS.contains(&name.as_ref())
            } else {
                false
            }
        })
    }

    fn relative_if_tracked_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn workspace_at(dir: &assert_fs::TempDir) -> Workspace {
        Workspace::new(dir.path().canonicalize().unwrap().into_boxed_path())
    }

    #[rstest]
    fn single_file_is_listed_relative_to_the_root() {
        let repo = assert_fs::TempDir::new().unwrap();
        let file_path = repo.path().join("a.txt");
        std::fs::write(&file_path, b"inside").unwrap();

        let files = workspace_at(&repo).list_files(Some(file_path)).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.txt")]);
    }

    #[rstest]
    fn file_outside_the_root_is_rejected() {
        let repo = assert_fs::TempDir::new().unwrap();
        let elsewhere = assert_fs::TempDir::new().unwrap();
        let stray = elsewhere.path().join("stray.txt");
        std::fs::write(&stray, b"outside").unwrap();

        let error = workspace_at(&repo).list_files(Some(stray)).unwrap_err();
        assert!(error.to_string().contains("outside the repository"));
    }
}
