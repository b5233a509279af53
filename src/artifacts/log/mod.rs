//! Commit history traversal
//!
//! Walks the commit graph child-to-parent, following first parents only.
//! Merge commits are representable in the object model but no merge surface
//! exists, so a first-parent walk visits every reachable commit.

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Iterator over the ancestry of a commit, newest first
pub struct History<'d> {
    database: &'d Database,
    next: Option<ObjectId>,
}

impl<'d> History<'d> {
    /// Start a walk at `tip`; `None` yields an empty history.
    pub fn new(database: &'d Database, tip: Option<ObjectId>) -> Self {
        History {
            database,
            next: tip,
        }
    }
}

impl Iterator for History<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;

        match self.database.parse_as_commit(&oid) {
            Ok(Some(commit)) => {
                self.next = commit.parent().cloned();
                Some(Ok((oid, commit)))
            }
            Ok(None) => Some(Err(anyhow::anyhow!("object {oid} is not a commit"))),
            Err(err) => Some(Err(err)),
        }
    }
}
