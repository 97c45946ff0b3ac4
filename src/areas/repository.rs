use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::remote::Remote;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::errors::RepositoryError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    remote: Remote,
}

impl Repository {
    /// Open the repository rooted at `path` (the directory holding `.mgit`).
    ///
    /// Nothing is read here; commands load the index and refs they need.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(
            metadata_path.join("index").into_boxed_path(),
            path.clone().into_boxed_path(),
        );
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let remote = Remote::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            remote,
        })
    }

    /// Walk up from `start` to the nearest directory holding `.mgit`.
    pub fn discover(start: &Path) -> anyhow::Result<PathBuf> {
        let start = start.canonicalize()?;

        start
            .ancestors()
            .find(|dir| dir.join(METADATA_DIR).is_dir())
            .map(Path::to_path_buf)
            .ok_or_else(|| RepositoryError::NotARepository(start.display().to_string()).into())
    }

    /// Open the repository enclosing `start`.
    pub fn open(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let root = Self::discover(start)?;
        Self::new(&root, writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }
}
