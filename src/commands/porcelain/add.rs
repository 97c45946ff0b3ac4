use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk, dropping entries for deleted files
        let removed = index.rehydrate()?;

        // Expand directories; every argument must exist
        let files = paths
            .iter()
            .map(|path| self.workspace().list_files(Some(Path::new(path).to_path_buf())))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect::<BTreeSet<_>>();

        for path in files {
            let data = self.workspace().read_file(&path)?;
            let blob_id = self.database().store(&Blob::new(data))?;

            let outcome = index.stage(IndexEntry::new(path.clone(), blob_id));
            writeln!(self.writer(), "{} {}", outcome.as_str(), path)?;
        }

        for path in removed {
            writeln!(self.writer(), "removed {}", path)?;
        }

        index.write_updates()?;

        Ok(())
    }
}
