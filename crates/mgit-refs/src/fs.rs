//! Filesystem reference store: one file per branch plus a HEAD pointer.
//!
//! Layout under the repository directory:
//!
//! ```text
//! .mgit/
//!   HEAD                  "ref: refs/heads/<branch>\n"
//!   refs/heads/<branch>   "<40-hex-digest>\n", empty when unborn
//! ```
//!
//! Nested branch names (`feature/auth`) become nested directories under
//! `refs/heads/`.

use std::path::{Path, PathBuf};

use mgit_types::Digest;
use tracing::debug;

use crate::error::{RefError, RefResult};
use crate::names::validate_branch_name;
use crate::traits::RefStore;

const HEAD_PREFIX: &str = "ref: refs/heads/";

/// Filesystem-backed branch and HEAD store.
pub struct FsRefStore {
    /// The repository metadata directory (`<workdir>/.mgit`).
    root: PathBuf,
}

impl FsRefStore {
    /// Open a store rooted at an existing repository directory.
    pub fn open(root: impl Into<PathBuf>) -> RefResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RefError::RepoNotInitialized);
        }
        Ok(Self { root })
    }

    /// Set up the ref layout for a fresh repository: an unborn default
    /// branch with HEAD pointing at it.
    pub fn init(root: impl Into<PathBuf>, default_branch: &str) -> RefResult<Self> {
        validate_branch_name(default_branch)?;
        let root = root.into();

        let branch_path = root.join("refs").join("heads").join(default_branch);
        if let Some(parent) = branch_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&branch_path, b"")?;
        std::fs::write(root.join("HEAD"), format!("{HEAD_PREFIX}{default_branch}\n"))?;

        debug!(branch = default_branch, "ref layout initialized");
        Ok(Self { root })
    }

    fn heads_dir(&self) -> PathBuf {
        self.root.join("refs").join("heads")
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        let mut path = self.heads_dir();
        for component in name.split('/') {
            path.push(component);
        }
        path
    }

    fn write_branch(&self, name: &str, target: Option<Digest>) -> RefResult<()> {
        let path = self.branch_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = match target {
            Some(digest) => format!("{digest}\n"),
            None => String::new(),
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    fn collect_branches(
        &self,
        dir: &Path,
        prefix: &str,
        out: &mut Vec<(String, Option<Digest>)>,
    ) -> RefResult<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let name = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}/{file_name}")
            };

            if entry.file_type()?.is_dir() {
                self.collect_branches(&entry.path(), &name, out)?;
            } else {
                out.push((name.clone(), self.read_branch(&name)?));
            }
        }
        Ok(())
    }
}

impl RefStore for FsRefStore {
    fn current_branch(&self) -> RefResult<String> {
        let head = match std::fs::read_to_string(self.root.join("HEAD")) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RefError::RepoNotInitialized);
            }
            Err(e) => return Err(e.into()),
        };
        head.trim_end()
            .strip_prefix(HEAD_PREFIX)
            .map(str::to_string)
            .ok_or_else(|| RefError::CorruptRef {
                name: "HEAD".to_string(),
                reason: format!("unexpected content {:?}", head.trim_end()),
            })
    }

    fn branch_exists(&self, name: &str) -> RefResult<bool> {
        Ok(self.branch_path(name).is_file())
    }

    fn read_branch(&self, name: &str) -> RefResult<Option<Digest>> {
        let content = match std::fs::read_to_string(self.branch_path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RefError::BranchNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let content = content.trim_end();
        if content.is_empty() {
            return Ok(None);
        }
        Digest::from_hex(content)
            .map(Some)
            .map_err(|e| RefError::CorruptRef {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    fn update_branch(&self, name: &str, digest: Digest) -> RefResult<()> {
        if !self.branch_exists(name)? {
            return Err(RefError::BranchNotFound(name.to_string()));
        }
        self.write_branch(name, Some(digest))?;
        debug!(branch = name, target = %digest, "branch updated");
        Ok(())
    }

    fn create_branch(&self, name: &str, target: Option<Digest>) -> RefResult<()> {
        validate_branch_name(name)?;
        if self.branch_exists(name)? {
            return Err(RefError::BranchAlreadyExists(name.to_string()));
        }
        self.write_branch(name, target)?;
        debug!(branch = name, "branch created");
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> RefResult<bool> {
        if self.current_branch()? == name {
            return Err(RefError::DeleteCurrentBranch(name.to_string()));
        }
        match std::fs::remove_file(self.branch_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        if !self.branch_exists(branch)? {
            return Err(RefError::BranchNotFound(branch.to_string()));
        }
        std::fs::write(self.root.join("HEAD"), format!("{HEAD_PREFIX}{branch}\n"))?;
        debug!(branch, "HEAD moved");
        Ok(())
    }

    fn list_branches(&self) -> RefResult<Vec<(String, Option<Digest>)>> {
        let mut branches = Vec::new();
        let heads = self.heads_dir();
        if heads.is_dir() {
            self.collect_branches(&heads, "", &mut branches)?;
        }
        branches.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(branches)
    }
}

impl std::fmt::Debug for FsRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRefStore").field("root", &self.root).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, FsRefStore) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".mgit");
        std::fs::create_dir(&root).unwrap();
        let store = FsRefStore::init(root, "main").unwrap();
        (dir, store)
    }

    fn digest(b: u8) -> Digest {
        Digest::from_raw([b; 20])
    }

    #[test]
    fn init_creates_unborn_default_branch() {
        let (_dir, store) = make_store();
        assert_eq!(store.current_branch().unwrap(), "main");
        assert_eq!(store.head_digest().unwrap(), None);
        assert!(store.branch_exists("main").unwrap());
    }

    #[test]
    fn head_file_is_a_symbolic_pointer() {
        let (_dir, store) = make_store();
        let head = std::fs::read_to_string(store.root.join("HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/main\n");
    }

    #[test]
    fn update_head_writes_hex_digest_file() {
        let (_dir, store) = make_store();
        store.update_head(digest(7)).unwrap();

        let on_disk =
            std::fs::read_to_string(store.root.join("refs").join("heads").join("main")).unwrap();
        assert_eq!(on_disk, format!("{}\n", digest(7)));
        assert_eq!(store.head_digest().unwrap(), Some(digest(7)));
    }

    #[test]
    fn nested_branch_names_become_nested_files() {
        let (_dir, store) = make_store();
        store
            .create_branch("feature/auth", Some(digest(9)))
            .unwrap();

        assert!(store
            .root
            .join("refs")
            .join("heads")
            .join("feature")
            .join("auth")
            .is_file());
        assert_eq!(store.read_branch("feature/auth").unwrap(), Some(digest(9)));
    }

    #[test]
    fn create_duplicate_branch_fails() {
        let (_dir, store) = make_store();
        assert!(matches!(
            store.create_branch("main", None).unwrap_err(),
            RefError::BranchAlreadyExists(_)
        ));
    }

    #[test]
    fn set_head_switches_and_rejects_missing() {
        let (_dir, store) = make_store();
        store.create_branch("develop", Some(digest(2))).unwrap();

        store.set_head("develop").unwrap();
        assert_eq!(store.current_branch().unwrap(), "develop");

        assert!(matches!(
            store.set_head("ghost").unwrap_err(),
            RefError::BranchNotFound(_)
        ));
    }

    #[test]
    fn cannot_delete_current_branch() {
        let (_dir, store) = make_store();
        assert!(matches!(
            store.delete_branch("main").unwrap_err(),
            RefError::DeleteCurrentBranch(_)
        ));
    }

    #[test]
    fn delete_branch_removes_file() {
        let (_dir, store) = make_store();
        store.create_branch("doomed", None).unwrap();

        assert!(store.delete_branch("doomed").unwrap());
        assert!(!store.branch_exists("doomed").unwrap());
        assert!(!store.delete_branch("doomed").unwrap());
    }

    #[test]
    fn list_branches_includes_nested_names_sorted() {
        let (_dir, store) = make_store();
        store.create_branch("zeta", None).unwrap();
        store.create_branch("feature/auth", Some(digest(1))).unwrap();

        let names: Vec<_> = store
            .list_branches()
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, ["feature/auth", "main", "zeta"]);
    }

    #[test]
    fn corrupt_branch_file_is_reported() {
        let (_dir, store) = make_store();
        std::fs::write(
            store.root.join("refs").join("heads").join("main"),
            "not a digest\n",
        )
        .unwrap();

        assert!(matches!(
            store.read_branch("main").unwrap_err(),
            RefError::CorruptRef { .. }
        ));
    }

    #[test]
    fn corrupt_head_file_is_reported() {
        let (_dir, store) = make_store();
        std::fs::write(store.root.join("HEAD"), "garbage\n").unwrap();

        assert!(matches!(
            store.current_branch().unwrap_err(),
            RefError::CorruptRef { .. }
        ));
    }

    #[test]
    fn missing_head_reports_uninitialized() {
        let (_dir, store) = make_store();
        std::fs::remove_file(store.root.join("HEAD")).unwrap();

        assert!(matches!(
            store.current_branch().unwrap_err(),
            RefError::RepoNotInitialized
        ));
    }
}
