use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub fn cat_file(&self, sha: &str) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(sha.to_string())?;
        let object = self.database().parse_object(&object_id)?;

        write!(self.writer(), "{}", object.display()?)?;

        Ok(())
    }
}
