use git2::{DiffFormat, Index, Repository, StatusOptions, Tree};
use std::path::Path;
use tracing::{debug, warn};

use crate::branch::resolve_branch_tip;
use crate::{ChangeKind, ChangeSet, FileChange, GitError, ObjectStore, StagingState};

/// Builds diff documents straight from repository objects, without shelling out
pub struct ChangeSetBuilder<'r> {
    repo: &'r Repository,
    remote: String,
}

impl<'r> ChangeSetBuilder<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            remote: "origin".to_string(),
        }
    }

    /// Remote whose tracking refs are used when a base branch has no local copy
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Staged paths with their index state, in status-report order
    pub fn staged_entries(&self) -> Result<Vec<(String, StagingState)>, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        let entries: Vec<(String, StagingState)> = statuses
            .iter()
            .filter_map(|entry| {
                let state = StagingState::from(entry.status());
                let path = entry.path()?.to_string();
                state.is_staged().then_some((path, state))
            })
            .collect();

        debug!(staged = entries.len(), "Captured staged status");
        Ok(entries)
    }

    pub fn has_staged_changes(&self) -> Result<bool, GitError> {
        Ok(!self.staged_entries()?.is_empty())
    }

    /// Collect every staged change with the content needed to render it
    pub fn collect_staged(&self) -> Result<ChangeSet, GitError> {
        let head_tree = self.head_tree()?;
        let index = self.repo.index()?;
        let store = ObjectStore::new(self.repo);

        let mut set = ChangeSet::new();
        for (path, state) in self.staged_entries()? {
            let change = match state {
                StagingState::Added => FileChange {
                    new_content: read_staged(&store, &index, &path),
                    old_content: None,
                    kind: ChangeKind::Added,
                    path,
                },
                StagingState::Modified => FileChange {
                    old_content: read_committed(&store, head_tree.as_ref(), &path),
                    new_content: read_staged(&store, &index, &path),
                    kind: ChangeKind::Modified,
                    path,
                },
                StagingState::Deleted => FileChange {
                    old_content: read_committed(&store, head_tree.as_ref(), &path),
                    new_content: None,
                    kind: ChangeKind::Deleted,
                    path,
                },
                StagingState::Unmodified | StagingState::Untracked => continue,
            };
            set.push(change);
        }

        Ok(set)
    }

    /// Diff of the index against HEAD, in the simplified line-presence format
    pub fn build_staged_diff(&self) -> Result<String, GitError> {
        let set = self.collect_staged()?;
        let diff_text = set.render();
        debug!(
            files = set.len(),
            diff_len = diff_text.len(),
            "Built staged diff"
        );
        Ok(diff_text)
    }

    /// Patch-format diff from the tip of `base` to HEAD
    pub fn build_branch_diff(&self, base: &str) -> Result<String, GitError> {
        let head_tree = self.repo.head()?.peel_to_tree()?;

        let base_oid = resolve_branch_tip(self.repo, base, &self.remote)?;
        let base_tree = self.repo.find_commit(base_oid)?.tree()?;

        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)?;

        let mut diff_text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => diff_text.push(line.origin()),
                _ => {}
            }
            diff_text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        debug!(
            base,
            files = diff.deltas().len(),
            diff_len = diff_text.len(),
            "Built branch diff"
        );

        Ok(diff_text)
    }

    fn head_tree(&self) -> Result<Option<Tree<'r>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_tree()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(GitError::Git(e)),
        }
    }
}

fn read_staged(store: &ObjectStore<'_>, index: &Index, path: &str) -> Option<Vec<u8>> {
    store
        .staged_blob(index, Path::new(path))
        .map_err(|e| warn!(path, error = %e, "Skipping unreadable staged content"))
        .ok()
}

fn read_committed(store: &ObjectStore<'_>, tree: Option<&Tree<'_>>, path: &str) -> Option<Vec<u8>> {
    let tree = tree?;
    store
        .blob_at(tree, Path::new(path))
        .map_err(|e| warn!(path, error = %e, "Skipping unreadable committed content"))
        .ok()
}
