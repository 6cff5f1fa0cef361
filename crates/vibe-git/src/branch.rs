use git2::{BranchType, Oid, Repository, Sort};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::GitError;

/// A commit on the feature branch, reduced to what a prompt needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub short_hash: String,
    pub first_line: String,
}

impl std::fmt::Display for CommitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.short_hash, self.first_line)
    }
}

/// Branch names and commit ranges relative to a base branch
pub struct BranchResolver<'r> {
    repo: &'r Repository,
    remote: String,
}

impl<'r> BranchResolver<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            remote: "origin".to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn current_branch(&self) -> Result<String, GitError> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }
        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Local `main`, then local `master`, then whatever the remote-tracking
    /// refs suggest (`main` wins as soon as it is seen).
    pub fn default_branch(&self) -> Result<String, GitError> {
        for candidate in ["main", "master"] {
            if self.repo.find_branch(candidate, BranchType::Local).is_ok() {
                debug!(branch = candidate, "Default branch found locally");
                return Ok(candidate.to_string());
            }
        }

        if self.repo.remotes()?.is_empty() {
            return Err(GitError::NoDefaultBranch);
        }

        let main_marker = format!("{}/main", self.remote);
        let master_marker = format!("{}/master", self.remote);
        let mut found = None;

        for reference in self.repo.references()? {
            let Ok(reference) = reference else { continue };
            let Some(name) = reference.name() else { continue };
            if name.contains(&main_marker) {
                found = Some("main");
                break;
            }
            if name.contains(&master_marker) {
                found = Some("master");
            }
        }

        found
            .map(|b| {
                debug!(branch = b, "Default branch found on remote");
                b.to_string()
            })
            .ok_or(GitError::NoDefaultBranch)
    }

    /// Commits reachable from HEAD, newest first, up to (not including) the
    /// tip of `base`.
    ///
    /// If the walk never meets the base tip, everything visited is returned.
    pub fn commits_ahead(&self, base: &str) -> Result<Vec<CommitRef>, GitError> {
        let head = self
            .repo
            .head()?
            .target()
            .ok_or_else(|| GitError::NotFound("HEAD".into()))?;
        let base_tip = resolve_branch_tip(self.repo, base, &self.remote)?;

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(head)?;

        let mut commits = Vec::new();
        let mut reached_base = false;
        for step in walk {
            let (oid, commit) = match step.and_then(|oid| self.repo.find_commit(oid).map(|c| (oid, c))) {
                Ok(found) => found,
                Err(e) if commits.is_empty() => return Err(GitError::Git(e)),
                Err(e) => {
                    warn!(error = %e, "History walk stopped early");
                    break;
                }
            };
            if oid == base_tip {
                reached_base = true;
                break;
            }
            let message = String::from_utf8_lossy(commit.message_bytes());
            commits.push(CommitRef {
                short_hash: short_hash(oid),
                first_line: message.split('\n').next().unwrap_or_default().to_string(),
            });
        }

        debug!(
            base,
            count = commits.len(),
            reached_base,
            "Collected commits ahead of base"
        );

        Ok(commits)
    }

    /// Whether the remote-tracking ref for the current branch is missing or
    /// points somewhere else than the local tip
    pub fn needs_push(&self) -> Result<bool, GitError> {
        let head = self.repo.head()?;
        let Some(branch) = head.shorthand() else {
            return Ok(true);
        };
        let tracking = format!("refs/remotes/{}/{}", self.remote, branch);

        match self.repo.find_reference(&tracking) {
            Ok(remote_ref) => Ok(remote_ref.target() != head.target()),
            Err(_) => Ok(true),
        }
    }
}

/// Tip of a local branch, falling back to its remote-tracking ref
pub(crate) fn resolve_branch_tip(
    repo: &Repository,
    name: &str,
    remote: &str,
) -> Result<Oid, GitError> {
    if let Ok(branch) = repo.find_branch(name, BranchType::Local) {
        if let Some(target) = branch.get().target() {
            return Ok(target);
        }
    }

    repo.find_reference(&format!("refs/remotes/{}/{}", remote, name))
        .ok()
        .and_then(|r| r.target())
        .ok_or_else(|| GitError::BaseBranchNotFound(name.to_string()))
}

pub(crate) fn short_hash(oid: Oid) -> String {
    oid.to_string().chars().take(7).collect()
}
