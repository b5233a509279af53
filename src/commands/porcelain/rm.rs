use crate::areas::repository::Repository;
use std::path::Path;

impl Repository {
    /// Remove paths from the staging area; working-tree files are untouched.
    ///
    /// Removing a path that is not staged is a quiet no-op.
    pub fn rm(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.load()?;

        for path in paths {
            index.unstage(Path::new(path));
        }

        index.save()?;

        Ok(())
    }
}
