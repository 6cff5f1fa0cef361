use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NoRepository(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path} from the object store: {source}")]
    StorageRead {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("HEAD is not on a branch (detached HEAD)")]
    DetachedHead,

    #[error("Could not determine default branch (no main or master found)")]
    NoDefaultBranch,

    #[error("Failed to find base branch {0}")]
    BaseBranchNotFound(String),

    #[error("Remote '{0}' is not configured or has no URL")]
    NoRemote(String),

    #[error("Remote '{remote}' ({url}) is not an HTTPS URL; pushing with GITHUB_TOKEN needs one\n\nSwitch it with:\n  git remote set-url {remote} https://github.com/<owner>/<repo>.git")]
    TokenPushNeedsHttps { remote: String, url: String },

    #[error("Push of {refname} was rejected: {message}")]
    PushRejected { refname: String, message: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),
}

impl GitError {
    pub(crate) fn storage_read(path: impl Into<String>, source: git2::Error) -> Self {
        if source.code() == git2::ErrorCode::NotFound {
            GitError::NotFound(path.into())
        } else {
            GitError::StorageRead {
                path: path.into(),
                source,
            }
        }
    }
}
