use crate::areas::repository::Repository;
use crate::artifacts::log::History;
use std::io::Write;

impl Repository {
    /// Print the ancestry of the current branch tip, newest first.
    pub fn log(&self) -> anyhow::Result<()> {
        let tip = self.refs().read_head()?;

        for step in History::new(self.database(), tip) {
            let (oid, commit) = step?;

            writeln!(self.writer(), "commit {oid}")?;
            writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
            writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {line}")?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
