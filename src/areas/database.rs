//! Object store
//!
//! Content-addressed, append-only storage for blobs, trees and commits. Each object
//! lives at `objects/<2 hex>/<38 hex>`, zlib-compressed; the hash is always computed
//! over the uncompressed bytes.
//!
//! Writes go to a temporary file in the destination directory and are published with
//! a rename, so an object visible under its final name is always complete. Storing
//! content that already exists is skipped and returns the existing hash.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable, hash_content};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Store raw bytes and return their hash.
    pub fn store_bytes(&self, content: &[u8]) -> anyhow::Result<ObjectId> {
        let object_id = hash_content(content);
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::debug!(oid = %object_id, "object already stored, skipping write");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, content)?;
        tracing::debug!(oid = %object_id, size = content.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.store_bytes(&object.serialize()?)
    }

    /// Load the raw bytes of an object.
    ///
    /// Fails with [`RepositoryError::ObjectNotFound`] when no object has that hash.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(object_path)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.load(object_id)?))
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        Tree::deserialize(Cursor::new(self.load(object_id)?))
            .with_context(|| format!("object {object_id} is not a valid tree"))
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        Commit::deserialize(Cursor::new(self.load(object_id)?))
            .with_context(|| format!("object {object_id} is not a valid commit"))
    }

    /// Like [`Database::load_commit`], but yields `None` when the object exists
    /// and simply is not a commit.
    pub fn try_load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let content = self.load(object_id)?;
        Ok(Commit::deserialize(Cursor::new(content)).ok())
    }

    /// Every object id currently in the store.
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut object_ids = Vec::new();

        for entry in WalkDir::new(&self.path).min_depth(2).max_depth(2) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let dir_name = entry
                .path()
                .parent()
                .and_then(|parent| parent.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            if let Ok(object_id) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                object_ids.push(object_id);
            }
        }

        object_ids.sort();
        Ok(object_ids)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;
        file.sync_all().context(format!(
            "Unable to flush object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        if let Err(error) = std::fs::rename(&temp_object_path, &object_path) {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(error).context(format!(
                "Unable to rename object file to {}",
                object_path.display()
            ));
        }

        Ok(())
    }

    fn compress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
