use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Remote URL is not a GitHub repository: {0}")]
    UnsupportedRemote(String),

    #[error(
        "GITHUB_TOKEN is not set\n\nCreate a token with the 'repo' scope at https://github.com/settings/tokens and export it:\n  export GITHUB_TOKEN=ghp_..."
    )]
    MissingToken,

    #[error("GitHub rejected the token - check that GITHUB_TOKEN is valid and has the 'repo' scope")]
    Unauthorized,

    #[error("GitHub could not create the pull request: {0}")]
    Validation(String),

    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error talking to GitHub: {0}")]
    Network(String),

    #[error("Unexpected response from GitHub: {0}")]
    InvalidResponse(String),
}
