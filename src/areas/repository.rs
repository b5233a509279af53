//! Repository session context
//!
//! Rather than ambient global state, every command operates on an explicit
//! [`Repository`] value holding the object database, the staging index, the
//! working tree and the refs. This keeps multiple repositories open in one
//! process independent, and tests run against isolated temp directories.
//!
//! The session is synchronous and single-threaded: the index lives in a
//! `RefCell` and a commit observes it as of the moment it is invoked.
//! Callers sharing one repository handle across threads must serialize
//! access themselves.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Repository metadata directory name
pub const REPO_DIR: &str = ".kit";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let index = Index::new(path.join(REPO_DIR).join("index").into_boxed_path());
        let database = Database::new(path.join(REPO_DIR).join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(path.join(REPO_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo_path(&self) -> std::path::PathBuf {
        self.path.join(REPO_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
