use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("no staged changes\n\nStage your changes first:\n  git add <files>")]
    NoStagedChanges,

    #[error("the staged diff is empty - nothing to describe")]
    EmptyDiff,

    #[error("cannot create PR from {0} branch\n\nCreate a feature branch first:\n  git checkout -b feature/my-feature")]
    OnBaseBranch(String),

    #[error("no commits ahead of {base}\n\nMake some commits first, then run vibe pr again.")]
    NoCommitsAhead { base: String },

    #[error("no changes found compared to {base}")]
    NoChanges { base: String },

    #[error("the pull request title is empty")]
    EmptyTitle,

    #[error("confirmation returned a {found} where a {expected} was expected")]
    ContentMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no forge configured for pull requests")]
    NoForge,

    #[error("Git error: {0}")]
    Git(#[from] vibe_git::GitError),

    #[error("Generation failed: {0}")]
    Generation(#[from] vibe_llm::GenerationError),

    #[error("Forge error: {0}")]
    Forge(#[from] vibe_forge::ForgeError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] crate::PromptError),
}
