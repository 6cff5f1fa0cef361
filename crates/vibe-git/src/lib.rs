//! # vibe-git
//!
//! Repository access for vibe.
//!
//! This crate turns repository object state into the text a language model
//! sees, and performs the few write operations vibe needs.
//!
//! ## Overview
//!
//! - Staged changes are read from the index and the HEAD tree directly
//!   (no `git diff` subprocess) and rendered as a simplified diff document
//! - Branch changes are a real tree-to-tree diff against the base branch tip
//! - Branch helpers find the current branch, a default base branch and the
//!   commits ahead of it
//!
//! ## Key Types
//!
//! - [`GitRepository`] - Discovered repository, implements [`VersionControl`]
//! - [`ChangeSetBuilder`] - Staged and branch diff synthesis
//! - [`BranchResolver`] - Branch and commit range queries
//! - [`ObjectStore`] - Read-only blob access
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vibe_git::{GitRepository, VersionControl};
//! use std::path::Path;
//!
//! let repo = GitRepository::discover(Path::new("."))?;
//! if repo.has_staged_changes()? {
//!     println!("{}", repo.staged_diff()?);
//! }
//! ```
//!
//! ## Diff Format
//!
//! The staged diff is NOT a unified diff. Modified files use a line-presence
//! comparison: removed lines first, then added lines, with no hunk headers.
//! See [`presence_diff`].

mod branch;
mod changeset;
mod diff;
mod error;
mod object_store;
mod repo;
mod status;
mod traits;

pub use branch::{BranchResolver, CommitRef};
pub use changeset::{presence_diff, ChangeKind, ChangeSet, FileChange};
pub use diff::ChangeSetBuilder;
pub use error::GitError;
pub use object_store::ObjectStore;
pub use repo::{GitRepository, Identity};
pub use status::StagingState;
pub use traits::VersionControl;
