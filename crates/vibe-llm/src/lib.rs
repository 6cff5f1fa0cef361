//! # vibe-llm
//!
//! Language-model access for vibe.
//!
//! ## Key Types
//!
//! - [`Generator`] - Prompt in, free text out
//! - [`OpenAiGenerator`] - OpenAI-compatible chat completions adapter
//! - [`MessageComposer`] - Builds prompts from diffs and interprets replies
//! - [`Prompts`] - Prompt templates
//!
//! Replies are interpreted by [`parse_commit_message`] and
//! [`parse_pr_content`], which never fail.

mod composer;
mod interpret;
mod openai;
mod prompts;
mod traits;

pub use composer::MessageComposer;
pub use interpret::{parse_commit_message, parse_pr_content, ParsedPr, PrContent, TitleRule};
pub use openai::{classify_api_error, OpenAiGenerator};
pub use prompts::{truncate_diff, Prompts, MAX_DIFF_CHARS, TRUNCATION_MARKER};
pub use traits::{CompletionRequest, GenerationError, Generator, GeneratorConfig};
