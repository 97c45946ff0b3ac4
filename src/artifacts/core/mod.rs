//! Core utilities shared by the repository areas
//!
//! - [`write_atomically`]: full-replace writes for index, ref and config files
//! - [`read_locked`]: reads under a shared advisory lock

use anyhow::Context;
use fake::rand;
use file_guard::Lock;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

/// Replace the content of `path` in one step.
///
/// The new content is written to a sibling temporary file under an exclusive lock,
/// flushed, then renamed over the destination, so readers observe either the old
/// or the new content and never a truncated file.
pub fn write_atomically(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("invalid destination path {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create directory {}", parent.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("invalid destination path {}", path.display()))?
        .to_string_lossy();
    let temp_path = parent.join(format!(".{}.tmp-{}", file_name, rand::random::<u32>()));

    let result = (|| -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("failed to open {}", temp_path.display()))?;
        let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut()
            .write_all(content)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        lock.deref_mut().sync_all()?;
        drop(lock);

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to publish {}", path.display()))
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }

    result
}

/// Read a whole file under a shared lock; `None` when the file does not exist.
pub fn read_locked(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut lock = file_guard::lock(&mut file, Lock::Shared, 0, 1)?;

    let mut content = String::new();
    lock.deref_mut()
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(Some(content))
}
