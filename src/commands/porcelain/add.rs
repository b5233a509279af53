use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::path::Path;

impl Repository {
    /// Stage files for the next commit.
    ///
    /// Each path is expanded to the files beneath it; every file is hashed
    /// as a blob, written to the object database, and then recorded in the
    /// index, in that order, so a staged entry always resolves to stored
    /// content. Paths that don't exist are skipped.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.load()?;

        let paths = paths
            .iter()
            .filter(|path| Path::new(path).exists())
            .map(|path| {
                let absolute_path = Path::new(path).canonicalize()?;
                self.workspace().list_files(Some(absolute_path))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten();

        for path in paths {
            let data = self.workspace().read_file(&path)?;
            let mode = self.workspace().stat_file(&path)?;

            let blob = Blob::new(data);
            let blob_id = self.database().store(&blob)?;

            index.stage(IndexEntry::new(path, blob_id, mode));
        }

        index.save()?;

        Ok(())
    }
}
