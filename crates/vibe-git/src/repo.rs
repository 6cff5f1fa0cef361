use git2::{Cred, CredentialType, PushOptions, RemoteCallbacks, Repository, Signature};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use tracing::{debug, info};

use crate::branch::short_hash;
use crate::{BranchResolver, ChangeSetBuilder, CommitRef, GitError, VersionControl};

/// Author/committer used for generated commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "Vibe User".to_string(),
            email: "vibe@local".to_string(),
        }
    }
}

/// A discovered repository plus the settings needed to talk to its remote
pub struct GitRepository {
    repo: Repository,
    remote: String,
    fallback_identity: Identity,
}

impl GitRepository {
    /// Open the repository containing `working_dir`
    pub fn discover(working_dir: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(working_dir)
            .map_err(|e| GitError::NoRepository(format!("{}: {}", working_dir.display(), e.message())))?;
        debug!(path = %repo.path().display(), "Opened repository");
        Ok(Self {
            repo,
            remote: "origin".to_string(),
            fallback_identity: Identity::default(),
        })
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Identity used when the repository config has no `user.name`/`user.email`
    pub fn with_fallback_identity(mut self, identity: Identity) -> Self {
        self.fallback_identity = identity;
        self
    }

    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    pub fn changes(&self) -> ChangeSetBuilder<'_> {
        ChangeSetBuilder::new(&self.repo).with_remote(self.remote.clone())
    }

    pub fn branches(&self) -> BranchResolver<'_> {
        BranchResolver::new(&self.repo).with_remote(self.remote.clone())
    }

    /// Repository config values win; each missing field falls back separately
    pub fn identity(&self) -> Identity {
        let config = self.repo.config().ok();
        let lookup = |key: &str| {
            config
                .as_ref()
                .and_then(|c| c.get_string(key).ok())
                .filter(|v| !v.trim().is_empty())
        };
        Identity {
            name: lookup("user.name").unwrap_or_else(|| self.fallback_identity.name.clone()),
            email: lookup("user.email").unwrap_or_else(|| self.fallback_identity.email.clone()),
        }
    }

    /// Commit the current index on top of HEAD; returns the short hash
    pub fn commit(&self, message: &str) -> Result<String, GitError> {
        let identity = self.identity();
        let signature = Signature::now(&identity.name, &identity.email)?;

        let mut index = self.repo.index()?;
        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(GitError::Git(e)),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        info!(commit = %oid, author = %identity.name, "Created commit");
        Ok(short_hash(oid))
    }

    pub fn remote_url(&self) -> Result<String, GitError> {
        let remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|_| GitError::NoRemote(self.remote.clone()))?;
        remote
            .url()
            .map(String::from)
            .ok_or_else(|| GitError::NoRemote(self.remote.clone()))
    }

    /// Push the current branch to the same-named branch on the remote,
    /// authenticating with a token the way GitHub expects
    pub fn push(&self, token: &str) -> Result<(), GitError> {
        let branch = self.branches().current_branch()?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");

        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .map_err(|_| GitError::NoRemote(self.remote.clone()))?;

        let url = remote.url().unwrap_or_default().to_string();
        let needs_https = || GitError::TokenPushNeedsHttps {
            remote: self.remote.clone(),
            url: url.clone(),
        };
        if is_ssh_url(&url) {
            return Err(needs_https());
        }

        let rejection: RefCell<Option<GitError>> = RefCell::new(None);
        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|_url, _username, allowed| {
                if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                    Cred::userpass_plaintext("x-access-token", token)
                } else {
                    *rejection.borrow_mut() = Some(needs_https());
                    Err(git2::Error::from_str("token credentials not accepted"))
                }
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    *rejection.borrow_mut() = Some(GitError::PushRejected {
                        refname: refname.to_string(),
                        message: message.to_string(),
                    });
                }
                Ok(())
            });

            let mut opts = PushOptions::new();
            opts.remote_callbacks(callbacks);

            debug!(remote = %self.remote, refspec = %refspec, "Pushing branch");
            if let Err(e) = remote.push(&[refspec.as_str()], Some(&mut opts)) {
                return Err(rejection.take().unwrap_or(GitError::Git(e)));
            }
        }

        if let Some(err) = rejection.into_inner() {
            return Err(err);
        }

        info!(remote = %self.remote, branch = %branch, "Pushed branch");
        Ok(())
    }
}

/// `git@host:path` and `ssh://` remotes authenticate with keys, not tokens
fn is_ssh_url(url: &str) -> bool {
    url.starts_with("ssh://") || (!url.contains("://") && url.contains('@') && url.contains(':'))
}

impl VersionControl for GitRepository {
    fn remote_name(&self) -> &str {
        &self.remote
    }

    fn has_staged_changes(&self) -> Result<bool, GitError> {
        self.changes().has_staged_changes()
    }

    fn staged_diff(&self) -> Result<String, GitError> {
        self.changes().build_staged_diff()
    }

    fn current_branch(&self) -> Result<String, GitError> {
        self.branches().current_branch()
    }

    fn default_branch(&self) -> Result<String, GitError> {
        self.branches().default_branch()
    }

    fn commits_ahead(&self, base: &str) -> Result<Vec<CommitRef>, GitError> {
        self.branches().commits_ahead(base)
    }

    fn branch_diff(&self, base: &str) -> Result<String, GitError> {
        self.changes().build_branch_diff(base)
    }

    fn remote_url(&self) -> Result<String, GitError> {
        GitRepository::remote_url(self)
    }

    fn needs_push(&self) -> Result<bool, GitError> {
        self.branches().needs_push()
    }

    fn push(&self, token: &str) -> Result<(), GitError> {
        GitRepository::push(self, token)
    }

    fn commit(&self, message: &str) -> Result<String, GitError> {
        GitRepository::commit(self, message)
    }
}
