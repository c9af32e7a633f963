//! Repository handle: discovery, initialization, and cross-layer access.
//!
//! A repository is any directory holding a `.mgit/` metadata directory:
//!
//! ```text
//! .mgit/
//!   objects/      content-addressed object files
//!   refs/heads/   branch pointers
//!   HEAD          current branch
//!   index         staging manifest
//!   config.toml   repository configuration
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use mgit_commit::Commit;
use mgit_index::Index;
use mgit_refs::{FsRefStore, RefStore, DEFAULT_BRANCH};
use mgit_store::{FsObjectStore, ObjectStore};
use mgit_tree::Tree;
use mgit_types::Digest;

use crate::config::Config;

pub const META_DIR: &str = ".mgit";

/// Command was run outside any repository. Mapped to exit code 128.
#[derive(Debug, thiserror::Error)]
#[error("not an mgit repository (or any of the parent directories)")]
pub struct NotARepository;

#[derive(Debug)]
pub struct Repo {
    workdir: PathBuf,
    root: PathBuf,
    pub store: FsObjectStore,
    pub refs: FsRefStore,
}

impl Repo {
    /// Create the metadata layout in `workdir` and open the repository.
    pub fn init(workdir: &Path) -> anyhow::Result<Self> {
        let root = workdir.join(META_DIR);
        if root.is_dir() {
            anyhow::bail!("repository already initialized at {}", root.display());
        }
        std::fs::create_dir_all(&root)
            .with_context(|| format!("creating {}", root.display()))?;

        FsRefStore::init(&root, DEFAULT_BRANCH)?;
        Index::new().save(&root)?;
        Config::default().save(&root)?;

        Self::open_at(workdir.to_path_buf())
    }

    /// Walk up from `start` until a metadata directory is found.
    pub fn discover(start: &Path) -> anyhow::Result<Self> {
        let mut dir = start;
        loop {
            if dir.join(META_DIR).is_dir() {
                return Self::open_at(dir.to_path_buf());
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Err(NotARepository.into()),
            }
        }
    }

    fn open_at(workdir: PathBuf) -> anyhow::Result<Self> {
        let root = workdir.join(META_DIR);
        let store = FsObjectStore::open(&root)?;
        let refs = FsRefStore::open(&root)?;
        Ok(Self {
            workdir,
            root,
            store,
            refs,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_index(&self) -> anyhow::Result<Index> {
        Ok(Index::load(&self.root)?)
    }

    pub fn save_index(&self, index: &Index) -> anyhow::Result<()> {
        Ok(index.save(&self.root)?)
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        Config::load(&self.root)
    }

    /// The commit HEAD resolves to, or `None` on an unborn branch.
    pub fn head_commit(&self) -> anyhow::Result<Option<(Digest, Commit)>> {
        match self.refs.head_digest()? {
            Some(digest) => {
                let commit = Commit::from_object(&self.store.get(&digest)?)?;
                Ok(Some((digest, commit)))
            }
            None => Ok(None),
        }
    }

    pub fn load_commit(&self, digest: &Digest) -> anyhow::Result<Commit> {
        Ok(Commit::from_object(&self.store.get(digest)?)?)
    }

    pub fn load_tree(&self, digest: &Digest) -> anyhow::Result<Tree> {
        Ok(Tree::from_object(&self.store.get(digest)?)?)
    }

    /// Discard staged entries, e.g. after the commit that consumed them.
    pub fn clear_index(&self) -> anyhow::Result<()> {
        self.save_index(&Index::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_the_metadata_layout() {
        let dir = TempDir::new().unwrap();
        let repo = Repo::init(dir.path()).unwrap();

        assert!(repo.root().join("HEAD").is_file());
        assert!(repo.root().join("refs").join("heads").join("main").is_file());
        assert!(repo.root().join("index").is_file());
        assert!(repo.root().join("config.toml").is_file());
        assert_eq!(repo.refs.current_branch().unwrap(), "main");
        assert_eq!(repo.refs.head_digest().unwrap(), None);
    }

    #[test]
    fn double_init_fails() {
        let dir = TempDir::new().unwrap();
        Repo::init(dir.path()).unwrap();
        assert!(Repo::init(dir.path()).is_err());
    }

    #[test]
    fn discover_walks_up_from_nested_directories() {
        let dir = TempDir::new().unwrap();
        Repo::init(dir.path()).unwrap();

        let nested = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let repo = Repo::discover(&nested).unwrap();
        assert_eq!(repo.workdir(), dir.path());
    }

    #[test]
    fn discover_outside_a_repo_fails_with_marker_error() {
        let dir = TempDir::new().unwrap();
        let err = Repo::discover(dir.path()).unwrap_err();
        assert!(err.downcast_ref::<NotARepository>().is_some());
    }

    #[test]
    fn fresh_repo_has_no_head_commit_and_empty_index() {
        let dir = TempDir::new().unwrap();
        let repo = Repo::init(dir.path()).unwrap();

        assert!(repo.head_commit().unwrap().is_none());
        assert!(repo.load_index().unwrap().is_empty());
    }
}
