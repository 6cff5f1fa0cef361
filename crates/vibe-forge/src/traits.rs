use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ForgeError, RepoInfo};

/// Everything needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestDraft {
    pub repo: RepoInfo,
    /// Branch the changes merge into
    pub base: String,
    /// Branch holding the changes
    pub head: String,
    pub title: String,
    pub body: String,
}

/// A pull request that exists on the forge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

/// A code host that accepts pull requests
#[async_trait]
pub trait Forge: Send + Sync {
    fn name(&self) -> &str;

    async fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest, ForgeError>;
}
