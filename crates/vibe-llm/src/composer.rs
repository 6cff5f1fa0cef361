use tracing::{debug, info};

use crate::interpret::{parse_commit_message, parse_pr_content, ParsedPr};
use crate::{CompletionRequest, GenerationError, Generator, Prompts};

const TEMPERATURE: f32 = 0.3;
const COMMIT_MAX_TOKENS: u32 = 200;
const PR_MAX_TOKENS: u32 = 500;

/// Turns diffs into commit messages and pull request text via a [`Generator`]
pub struct MessageComposer<'a> {
    generator: &'a dyn Generator,
}

impl<'a> MessageComposer<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self { generator }
    }

    pub async fn commit_message(&self, diff: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            system: Prompts::COMMIT_SYSTEM.to_string(),
            user: Prompts::build_commit_prompt(diff),
            max_tokens: COMMIT_MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(
            generator = self.generator.name(),
            diff_len = diff.len(),
            "Generating commit message"
        );

        let reply = self.generator.complete(&request).await?;
        // `"  Add x  "` becomes `Add x`, inner padding included
        let message = parse_commit_message(&reply);
        if message.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        info!(message_len = message.len(), "Commit message generated");
        Ok(message)
    }

    /// `commits` is one `<short hash> <subject>` line per commit
    pub async fn pull_request(&self, commits: &str, diff: &str) -> Result<ParsedPr, GenerationError> {
        let request = CompletionRequest {
            system: Prompts::PR_SYSTEM.to_string(),
            user: Prompts::build_pr_prompt(commits, diff),
            max_tokens: PR_MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(
            generator = self.generator.name(),
            diff_len = diff.len(),
            "Generating pull request content"
        );

        let reply = self.generator.complete(&request).await?;
        let parsed = parse_pr_content(&reply);
        if parsed.content.title.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        info!(rule = ?parsed.rule, "Pull request content generated");
        Ok(parsed)
    }
}
