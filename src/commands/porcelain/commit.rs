use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    /// Fold the staging area into a tree, wrap it in a commit chained to the
    /// current branch tip, and advance the branch.
    ///
    /// An empty staging area still commits: it produces a tree with zero
    /// entries, a degenerate but valid history node. Nothing is ever removed
    /// from the object database; a commit with no parent can only happen
    /// while the branch has no tip yet.
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.load()?;

        let tree = Tree::build(index.entries())?;
        // subtrees are stored before the trees that reference them
        let store_tree = &|tree: &Tree| self.database().store(tree).map(|_| ());
        tree.traverse(store_tree)?;
        let tree_id = tree.object_id()?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };
        let parents = parent.into_iter().collect();

        let author = Author::load_from_env()?;
        let message = message.trim().to_string();

        let commit = Commit::new(parents, tree_id, author, message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        // the staged snapshot is now captured by the commit's tree
        index.clear();
        index.save()?;

        write!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
