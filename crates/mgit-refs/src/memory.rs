//! In-memory reference store for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::RwLock;

use mgit_types::Digest;

use crate::error::{RefError, RefResult};
use crate::names::validate_branch_name;
use crate::traits::RefStore;
use crate::DEFAULT_BRANCH;

/// An in-memory implementation of [`RefStore`].
///
/// Starts with an unborn default branch checked out, matching the state of
/// a freshly initialized repository.
#[derive(Debug)]
pub struct InMemoryRefStore {
    branches: RwLock<HashMap<String, Option<Digest>>>,
    head: RwLock<String>,
}

impl InMemoryRefStore {
    pub fn new() -> Self {
        let mut branches = HashMap::new();
        branches.insert(DEFAULT_BRANCH.to_string(), None);
        Self {
            branches: RwLock::new(branches),
            head: RwLock::new(DEFAULT_BRANCH.to_string()),
        }
    }
}

impl Default for InMemoryRefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RefStore for InMemoryRefStore {
    fn current_branch(&self) -> RefResult<String> {
        Ok(self.head.read().expect("lock poisoned").clone())
    }

    fn branch_exists(&self, name: &str) -> RefResult<bool> {
        Ok(self
            .branches
            .read()
            .expect("lock poisoned")
            .contains_key(name))
    }

    fn read_branch(&self, name: &str) -> RefResult<Option<Digest>> {
        self.branches
            .read()
            .expect("lock poisoned")
            .get(name)
            .copied()
            .ok_or_else(|| RefError::BranchNotFound(name.to_string()))
    }

    fn update_branch(&self, name: &str, digest: Digest) -> RefResult<()> {
        let mut branches = self.branches.write().expect("lock poisoned");
        match branches.get_mut(name) {
            Some(target) => {
                *target = Some(digest);
                Ok(())
            }
            None => Err(RefError::BranchNotFound(name.to_string())),
        }
    }

    fn create_branch(&self, name: &str, target: Option<Digest>) -> RefResult<()> {
        validate_branch_name(name)?;
        let mut branches = self.branches.write().expect("lock poisoned");
        if branches.contains_key(name) {
            return Err(RefError::BranchAlreadyExists(name.to_string()));
        }
        branches.insert(name.to_string(), target);
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> RefResult<bool> {
        if *self.head.read().expect("lock poisoned") == name {
            return Err(RefError::DeleteCurrentBranch(name.to_string()));
        }
        let mut branches = self.branches.write().expect("lock poisoned");
        Ok(branches.remove(name).is_some())
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        if !self.branch_exists(branch)? {
            return Err(RefError::BranchNotFound(branch.to_string()));
        }
        *self.head.write().expect("lock poisoned") = branch.to_string();
        Ok(())
    }

    fn list_branches(&self) -> RefResult<Vec<(String, Option<Digest>)>> {
        let branches = self.branches.read().expect("lock poisoned");
        let mut list: Vec<_> = branches
            .iter()
            .map(|(name, target)| (name.clone(), *target))
            .collect();
        list.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(list)
    }
}
