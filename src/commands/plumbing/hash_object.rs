use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<()> {
        let object_data = self.workspace().read_file(Path::new(object_path))?;
        let blob = Blob::new(object_data);

        let object_id = match write {
            true => self.database().store(&blob)?,
            false => blob.object_id()?,
        };

        write!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
