/// Longest diff sent to the model, in characters
pub const MAX_DIFF_CHARS: usize = 10_000;

/// Appended when a diff is cut at [`MAX_DIFF_CHARS`]
pub const TRUNCATION_MARKER: &str = "\n\n[diff truncated due to length]";

/// Prompt templates for commit messages and pull requests
pub struct Prompts;

impl Prompts {
    pub const COMMIT_SYSTEM: &'static str = r#"You are a helpful assistant that generates concise git commit messages.

Rules:
1. Write in imperative mood (e.g., "Add feature" not "Added feature")
2. Keep the message under 72 characters
3. Focus on WHAT changed and WHY, not HOW
4. Be specific but concise
5. Do not include any prefixes like "feat:", "fix:", etc.
6. Return ONLY the commit message, nothing else
7. Do not wrap the message in quotes

Examples of good commit messages:
- Add user authentication with JWT tokens
- Fix memory leak in connection pool
- Update dependencies to latest versions
- Refactor database queries for better performance"#;

    pub const PR_SYSTEM: &'static str = r#"You are a helpful assistant that generates GitHub Pull Request titles and descriptions.

Rules:
1. Title should be concise (under 72 characters) and in imperative mood
2. Description should include:
   - A brief summary (1-2 sentences)
   - Key changes as bullet points
   - Any breaking changes or important notes (if applicable)
3. Be specific and helpful for reviewers
4. Format your response as:
   Title: <title here>

   Description:
   <description here>

Example response:
Title: Add user authentication system

Description:
This PR introduces JWT-based authentication for the API.

Key changes:
- Add auth middleware for protected routes
- Implement login and logout endpoints
- Add user session management"#;

    /// Build the user prompt for a commit message
    pub fn build_commit_prompt(diff: &str) -> String {
        format!(
            "Generate a commit message for the following changes:\n\n{diff}",
            diff = truncate_diff(diff),
        )
    }

    /// Build the user prompt for a pull request title and description
    pub fn build_pr_prompt(commits: &str, diff: &str) -> String {
        format!(
            "Generate a PR title and description for the following changes.\n\nCommits:\n{commits}\n\nDiff:\n{diff}",
            commits = commits,
            diff = truncate_diff(diff),
        )
    }
}

/// Cut a diff to [`MAX_DIFF_CHARS`] characters and mark the cut
pub fn truncate_diff(diff: &str) -> std::borrow::Cow<'_, str> {
    match diff.char_indices().nth(MAX_DIFF_CHARS) {
        None => std::borrow::Cow::Borrowed(diff),
        Some((cut, _)) => std::borrow::Cow::Owned(format!("{}{}", &diff[..cut], TRUNCATION_MARKER)),
    }
}
