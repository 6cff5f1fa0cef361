use crate::{CommitRef, GitError};

/// Repository operations the commit and pull-request flows rely on
pub trait VersionControl {
    /// Name of the remote pushes go to
    fn remote_name(&self) -> &str;

    fn has_staged_changes(&self) -> Result<bool, GitError>;

    /// Diff of staged changes against HEAD
    fn staged_diff(&self) -> Result<String, GitError>;

    fn current_branch(&self) -> Result<String, GitError>;

    fn default_branch(&self) -> Result<String, GitError>;

    fn commits_ahead(&self, base: &str) -> Result<Vec<CommitRef>, GitError>;

    /// Diff from the tip of `base` to HEAD
    fn branch_diff(&self, base: &str) -> Result<String, GitError>;

    fn remote_url(&self) -> Result<String, GitError>;

    fn needs_push(&self) -> Result<bool, GitError>;

    fn push(&self, token: &str) -> Result<(), GitError>;

    /// Commit the index; returns the short hash of the new commit
    fn commit(&self, message: &str) -> Result<String, GitError>;
}
