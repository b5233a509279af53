use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create refs/heads directory")?;

        self.refs()
            .set_head(DEFAULT_BRANCH)
            .context("Failed to create initial HEAD reference")?;

        write!(
            self.writer(),
            "Initialized empty kit repository in {}",
            self.repo_path().display()
        )?;

        Ok(())
    }
}
