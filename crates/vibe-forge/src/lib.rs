//! # vibe-forge
//!
//! Code hosting integration for vibe.
//!
//! ## Key Types
//!
//! - [`Forge`] - Opens pull requests
//! - [`GitHubClient`] - GitHub REST adapter
//! - [`RepoInfo`] - Owner/name pair parsed from a remote URL
//!
//! Only GitHub remotes are recognised; see [`parse_remote_url`].

mod error;
mod github;
mod remote;
mod traits;

pub use error::ForgeError;
pub use github::{classify_github_error, GitHubClient, DEFAULT_GITHUB_API};
pub use remote::{parse_remote_url, RepoInfo};
pub use traits::{Forge, PullRequest, PullRequestDraft};
