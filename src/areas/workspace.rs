use crate::artifacts::index::index_entry::to_entry_path;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const METADATA_DIR: &str = ".mgit";
pub const IGNORE_FILE: &str = ".mgitignore";

/// Exact-match ignore list read from `.mgitignore`.
///
/// One repository-relative path per line; blank lines and `#` comments are skipped.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: HashSet<String>,
}

impl IgnoreSet {
    pub fn parse(content: &str) -> Self {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.trim_start_matches("./").to_string())
            .collect();

        IgnoreSet { patterns }
    }

    pub fn should_ignore(&self, entry_path: &str) -> bool {
        self.patterns.contains(entry_path)
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_ignore(&self) -> anyhow::Result<IgnoreSet> {
        let ignore_path = self.path.join(IGNORE_FILE);
        if !ignore_path.is_file() {
            return Ok(IgnoreSet::default());
        }

        let content = std::fs::read_to_string(&ignore_path)
            .with_context(|| format!("failed to read {}", ignore_path.display()))?;
        Ok(IgnoreSet::parse(&content))
    }

    /// Repository-relative entry paths of every file below `root_file_path`
    /// (the whole working directory when `None`), skipping the metadata directory
    /// and ignored paths.
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<String>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(&p)
                .with_context(|| format!("The specified path does not exist: {:?}", p))?,
            None => self.path.to_path_buf(),
        };

        if !root_file_path.starts_with(&self.path) {
            anyhow::bail!(
                "The specified path is outside the repository: {:?}",
                root_file_path
            );
        }
        if self.is_metadata_path(&root_file_path) {
            return Err(RepositoryError::InvalidPath(root_file_path.display().to_string()).into());
        }

        let ignore = self.load_ignore()?;
        let mut files = Vec::new();

        let walker = WalkDir::new(&root_file_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.path)
                .with_context(|| format!("path outside repository: {:?}", entry.path()))?;
            let entry_path = to_entry_path(relative_path)?;

            if !ignore.should_ignore(&entry_path) {
                files.push(entry_path);
            }
        }

        Ok(files)
    }

    /// Whether `path` lies inside the metadata directory.
    fn is_metadata_path(&self, path: &Path) -> bool {
        path.strip_prefix(&self.path)
            .ok()
            .and_then(|relative| relative.components().next())
            .is_some_and(|first| first.as_os_str() == METADATA_DIR)
    }

    pub fn read_file(&self, entry_path: &str) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(entry_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    /// Entry paths of every file below the directory `entry_path`, ignored ones included.
    pub fn files_below(&self, entry_path: &str) -> anyhow::Result<Vec<String>> {
        let dir_path = self.path.join(entry_path);
        let mut files = Vec::new();

        for entry in WalkDir::new(&dir_path).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.path)
                .with_context(|| format!("path outside repository: {:?}", entry.path()))?;
            files.push(to_entry_path(relative_path)?);
        }

        Ok(files)
    }

    /// Write a file, creating parent directories.
    ///
    /// An empty directory standing at `entry_path` is replaced; anything holding
    /// files is left alone and the write fails.
    pub fn write_file(&self, entry_path: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(entry_path);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        if file_path.is_dir() {
            self.remove_empty_dirs(&file_path)?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Remove a tracked file and any parent directories left empty by it.
    pub fn remove_file(&self, entry_path: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(entry_path);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(&file_path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(&self.path)
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    /// Remove a directory tree that holds no files.
    fn remove_empty_dirs(&self, dir_path: &Path) -> anyhow::Result<()> {
        for entry in WalkDir::new(dir_path).contents_first(true) {
            let entry = entry?;
            // fails on the first directory that still holds a file
            std::fs::remove_dir(entry.path())
                .with_context(|| format!("Failed to remove directory: {:?}", entry.path()))?;
        }

        Ok(())
    }
}
