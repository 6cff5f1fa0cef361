use git2::{Index, Oid, Repository, Tree};
use std::path::Path;

use crate::GitError;

/// Read-only access to blob content by hash, tree path or index path
pub struct ObjectStore<'r> {
    repo: &'r Repository,
}

impl<'r> ObjectStore<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self { repo }
    }

    pub fn read_blob(&self, oid: Oid) -> Result<Vec<u8>, GitError> {
        let blob = self
            .repo
            .find_blob(oid)
            .map_err(|e| GitError::storage_read(oid.to_string(), e))?;
        Ok(blob.content().to_vec())
    }

    /// Content of the blob at `path` inside a committed tree
    pub fn blob_at(&self, tree: &Tree<'_>, path: &Path) -> Result<Vec<u8>, GitError> {
        let entry = tree
            .get_path(path)
            .map_err(|e| GitError::storage_read(path.display().to_string(), e))?;
        self.read_blob(entry.id())
    }

    /// Content of the stage-0 index entry for `path`
    pub fn staged_blob(&self, index: &Index, path: &Path) -> Result<Vec<u8>, GitError> {
        let entry = index
            .get_path(path, 0)
            .ok_or_else(|| GitError::NotFound(path.display().to_string()))?;
        self.read_blob(entry.id)
    }
}
