use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print staged paths, sorted.
    pub fn ls_files(&self) -> anyhow::Result<()> {
        let mut index = self.index();
        index.load()?;

        for entry in index.entries() {
            writeln!(self.writer(), "{}", entry.path.display())?;
        }

        Ok(())
    }
}
