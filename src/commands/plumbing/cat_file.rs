use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Print an object's raw bytes. The kind is not guessed from the content.
    pub fn cat_file(&mut self, object_id: &str) -> anyhow::Result<()> {
        let object_id = ObjectId::try_parse(object_id.to_string())?;
        let object_data = self.database().load(&object_id)?;

        self.writer().write_all(&object_data)?;

        Ok(())
    }
}
